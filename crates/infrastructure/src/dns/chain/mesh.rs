use super::{next_or_failure, QueryStage};
use crate::dns::forwarding::{MessageBuilder, RecordTypeMapper};
use async_trait::async_trait;
use hickory_proto::op::Message;
use mesh_dns_application::use_cases::{MeshAnswer, ResolveMeshQueryUseCase};
use mesh_dns_domain::{DnsQuery, DomainError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error};

/// Answers names found in the mesh membership store and delegates the rest.
pub struct MeshStage {
    use_case: Arc<ResolveMeshQueryUseCase>,
    next: Option<Arc<dyn QueryStage>>,
    ready: bool,
    requests: AtomicU64,
}

impl MeshStage {
    pub const NAME: &'static str = "data-mesher";

    pub fn new(use_case: Arc<ResolveMeshQueryUseCase>, next: Option<Arc<dyn QueryStage>>) -> Self {
        Self {
            use_case,
            next,
            ready: true,
            requests: AtomicU64::new(0),
        }
    }

    fn question(request: &Message) -> Result<DnsQuery, DomainError> {
        let query = request
            .queries()
            .first()
            .ok_or_else(|| DomainError::MalformedQuery("no question section".to_string()))?;

        Ok(DnsQuery::new(
            query.name().to_ascii(),
            RecordTypeMapper::from_hickory(query.query_type()),
        ))
    }
}

#[async_trait]
impl QueryStage for MeshStage {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn serve(&self, request: &Message) -> Result<Message, DomainError> {
        self.requests.fetch_add(1, Ordering::Relaxed);

        let query = Self::question(request)?;
        let use_case = Arc::clone(&self.use_case);
        let lookup = query.clone();

        // Store reads are plain blocking file I/O
        let answer = tokio::task::spawn_blocking(move || use_case.execute(&lookup))
            .await
            .map_err(|e| DomainError::IoError(format!("Mesh store read task failed: {}", e)))?;

        match answer {
            MeshAnswer::Matched(records) => {
                debug!(
                    domain = %query.domain,
                    record_type = %query.record_type,
                    answers = records.len(),
                    "Answering from mesh store"
                );
                MessageBuilder::authoritative_answer(request, &records)
            }
            MeshAnswer::NoMatch => {
                debug!(domain = %query.domain, "Delegating to next stage");
                next_or_failure(Self::NAME, self.next.as_ref(), request).await
            }
            MeshAnswer::StoreError(e) => {
                error!(domain = %query.domain, error = %e, "Mesh store unavailable");
                Err(DomainError::Store(e))
            }
        }
    }

    fn ready(&self) -> bool {
        self.ready
    }

    fn request_count(&self) -> Option<u64> {
        Some(self.requests.load(Ordering::Relaxed))
    }
}
