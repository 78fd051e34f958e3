use super::QueryStage;
use crate::dns::forwarding::{MessageBuilder, ResponseParser};
use crate::dns::transport::{DnsTransport, TcpTransport, UdpTransport};
use async_trait::async_trait;
use hickory_proto::op::Message;
use mesh_dns_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{debug, warn};

struct Upstream {
    addr: SocketAddr,
    udp: UdpTransport,
    tcp: TcpTransport,
}

/// Last stage of a chain: sends the query to upstream resolvers in order and
/// returns the first answer unchanged apart from the message id.
pub struct ForwardStage {
    upstreams: Vec<Upstream>,
    timeout: Duration,
}

impl ForwardStage {
    pub const NAME: &'static str = "forward";

    pub fn new(upstreams: Vec<SocketAddr>, timeout: Duration) -> Self {
        Self {
            upstreams: upstreams
                .into_iter()
                .map(|addr| Upstream {
                    addr,
                    udp: UdpTransport::new(addr),
                    tcp: TcpTransport::new(addr),
                })
                .collect(),
            timeout,
        }
    }

    async fn exchange(
        &self,
        upstream: &Upstream,
        query_bytes: &[u8],
        query_id: u16,
    ) -> Result<Message, DomainError> {
        let udp = upstream.udp.send(query_bytes, self.timeout).await?;
        let response = ResponseParser::parse(&udp.bytes, query_id)?;

        if !response.truncated() {
            debug!(server = %upstream.addr, protocol = udp.protocol_used, "Upstream answered");
            return Ok(response);
        }

        debug!(
            server = %upstream.addr,
            retry = upstream.tcp.protocol_name(),
            "Truncated UDP response, retrying"
        );
        let tcp = upstream.tcp.send(query_bytes, self.timeout).await?;
        let response = ResponseParser::parse(&tcp.bytes, query_id)?;
        debug!(server = %upstream.addr, protocol = tcp.protocol_used, "Upstream answered");
        Ok(response)
    }
}

#[async_trait]
impl QueryStage for ForwardStage {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn serve(&self, request: &Message) -> Result<Message, DomainError> {
        // Upstream sees a fresh id; the client's id is put back on the reply
        let query_id = fastrand::u16(..);
        let mut outbound = request.clone();
        outbound.set_id(query_id);
        let query_bytes = MessageBuilder::serialize(&outbound)?;

        for upstream in &self.upstreams {
            match self.exchange(upstream, &query_bytes, query_id).await {
                Ok(mut response) => {
                    response.set_id(request.id());
                    return Ok(response);
                }
                Err(e) => {
                    warn!(server = %upstream.addr, error = %e, "Upstream query failed");
                }
            }
        }

        Err(DomainError::TransportAllServersUnreachable)
    }
}
