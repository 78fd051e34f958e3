use crate::dns::chain::QueryStage;
use crate::dns::forwarding::MessageBuilder;
use hickory_proto::op::{Message, MessageType, OpCode, ResponseCode};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Turns raw query bytes into raw response bytes by running the chain.
#[derive(Clone)]
pub struct DnsServerHandler {
    chain: Arc<dyn QueryStage>,
}

impl DnsServerHandler {
    pub fn new(chain: Arc<dyn QueryStage>) -> Self {
        Self { chain }
    }

    /// Returns `None` when the datagram should be dropped without a reply.
    pub async fn handle(&self, query_bytes: &[u8], client_ip: IpAddr) -> Option<(Message, Message)> {
        let request = match Message::from_vec(query_bytes) {
            Ok(message) => message,
            Err(e) => {
                debug!(client = %client_ip, error = %e, "Dropping undecodable query");
                return None;
            }
        };

        if request.message_type() != MessageType::Query {
            debug!(client = %client_ip, id = request.id(), "Dropping non-query message");
            return None;
        }

        if request.op_code() != OpCode::Query {
            debug!(client = %client_ip, op_code = ?request.op_code(), "Unsupported opcode");
            let response = MessageBuilder::failure(&request, ResponseCode::NotImp);
            return Some((request, response));
        }

        if request.queries().is_empty() {
            debug!(client = %client_ip, "Query without question section");
            let response = MessageBuilder::failure(&request, ResponseCode::FormErr);
            return Some((request, response));
        }

        let mut response = match self.chain.serve(&request).await {
            Ok(response) => response,
            Err(e) if e.is_client_error() => {
                warn!(client = %client_ip, error = %e, "Malformed query");
                MessageBuilder::failure(&request, ResponseCode::FormErr)
            }
            Err(e) => {
                error!(client = %client_ip, error = %e, "Query resolution failed");
                MessageBuilder::failure(&request, ResponseCode::ServFail)
            }
        };
        response.set_id(request.id());

        Some((request, response))
    }

    pub async fn handle_udp(&self, query_bytes: &[u8], client_ip: IpAddr) -> Option<Vec<u8>> {
        let (request, response) = self.handle(query_bytes, client_ip).await?;
        Self::encode(MessageBuilder::serialize_for_udp(&response, &request))
    }

    pub async fn handle_tcp(&self, query_bytes: &[u8], client_ip: IpAddr) -> Option<Vec<u8>> {
        let (_, response) = self.handle(query_bytes, client_ip).await?;
        Self::encode(MessageBuilder::serialize(&response))
    }

    fn encode(bytes: Result<Vec<u8>, mesh_dns_domain::DomainError>) -> Option<Vec<u8>> {
        match bytes {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                error!(error = %e, "Failed to serialize response");
                None
            }
        }
    }
}
