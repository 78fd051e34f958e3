use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::AAAA;
use hickory_proto::rr::{RData, Record};
use mesh_dns_domain::DomainError;
use mesh_dns_infrastructure::dns::QueryStage;
use std::net::Ipv6Addr;
use std::sync::Mutex;

#[derive(Default)]
enum Outcome {
    #[default]
    NxDomain,
    Answers(Vec<Ipv6Addr>),
    Fail,
}

/// Next-stage stand-in: records what it was handed and answers NXDOMAIN,
/// or a fixed answer set, or fails.
#[derive(Default)]
pub struct StubStage {
    seen: Mutex<Vec<Message>>,
    outcome: Outcome,
}

impl StubStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answering(addresses: Vec<Ipv6Addr>) -> Self {
        Self {
            outcome: Outcome::Answers(addresses),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            outcome: Outcome::Fail,
            ..Self::default()
        }
    }

    pub fn seen(&self) -> Vec<Message> {
        self.seen.lock().unwrap().clone()
    }

    pub fn reply_for(request: &Message) -> Message {
        let mut response = Message::new();
        response
            .set_id(request.id())
            .set_message_type(MessageType::Response)
            .set_response_code(ResponseCode::NXDomain);
        response.add_queries(request.queries().iter().cloned());
        response
    }

    pub fn answer_for(request: &Message, addresses: &[Ipv6Addr]) -> Message {
        let mut response = Self::reply_for(request);
        response.set_response_code(ResponseCode::NoError);
        if let Some(query) = request.queries().first() {
            for address in addresses {
                response.add_answer(Record::from_rdata(
                    query.name().clone(),
                    60,
                    RData::AAAA(AAAA(*address)),
                ));
            }
        }
        response
    }
}

#[async_trait]
impl QueryStage for StubStage {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn serve(&self, request: &Message) -> Result<Message, DomainError> {
        self.seen.lock().unwrap().push(request.clone());
        match &self.outcome {
            Outcome::NxDomain => Ok(Self::reply_for(request)),
            Outcome::Answers(addresses) => Ok(Self::answer_for(request, addresses)),
            Outcome::Fail => Err(DomainError::TransportAllServersUnreachable),
        }
    }
}
