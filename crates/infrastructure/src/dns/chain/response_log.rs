use super::QueryStage;
use crate::dns::forwarding::ResponseParser;
use async_trait::async_trait;
use hickory_proto::op::Message;
use mesh_dns_domain::DomainError;
use std::sync::Arc;
use tracing::{info, warn};

/// Logs every response the wrapped stage produces, then passes it on as is.
pub struct ResponseLogStage {
    inner: Arc<dyn QueryStage>,
}

impl ResponseLogStage {
    pub const NAME: &'static str = "log";

    pub fn new(inner: Arc<dyn QueryStage>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl QueryStage for ResponseLogStage {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn serve(&self, request: &Message) -> Result<Message, DomainError> {
        let result = self.inner.serve(request).await;

        let (qname, qtype) = request
            .queries()
            .first()
            .map(|q| (q.name().to_ascii(), q.query_type().to_string()))
            .unwrap_or_default();

        match &result {
            Ok(response) => info!(
                stage = self.inner.name(),
                qname = %qname,
                qtype = %qtype,
                rcode = %ResponseParser::rcode_to_status(response.response_code()),
                answers = response.answers().len(),
                "DNS response"
            ),
            Err(e) => warn!(
                stage = self.inner.name(),
                qname = %qname,
                qtype = %qtype,
                error = %e,
                "DNS query failed"
            ),
        }

        result
    }
}
