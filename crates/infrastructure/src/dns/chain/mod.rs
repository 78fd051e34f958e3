//! Resolution chain.
//!
//! Each stage either answers a query itself or hands it, unmodified, to the
//! next stage and returns whatever that stage produced.

pub mod builder;
pub mod forward;
pub mod mesh;
pub mod response_log;

use async_trait::async_trait;
use hickory_proto::op::Message;
use mesh_dns_domain::DomainError;
use std::sync::Arc;

pub use builder::ResolutionChain;
pub use forward::ForwardStage;
pub use mesh::MeshStage;
pub use response_log::ResponseLogStage;

#[async_trait]
pub trait QueryStage: Send + Sync {
    fn name(&self) -> &'static str;

    /// Resolve `request` or delegate it.
    ///
    /// `Err` means the query failed at this stage or behind it; the server
    /// turns it into a failure response.
    async fn serve(&self, request: &Message) -> Result<Message, DomainError>;

    /// Readiness as seen by the health endpoint.
    fn ready(&self) -> bool {
        true
    }

    /// Queries seen by this stage, for stages that count them.
    fn request_count(&self) -> Option<u64> {
        None
    }
}

/// Hands `request` to `next`, or fails when the chain ends here.
pub async fn next_or_failure(
    stage: &'static str,
    next: Option<&Arc<dyn QueryStage>>,
    request: &Message,
) -> Result<Message, DomainError> {
    match next {
        Some(next) => next.serve(request).await,
        None => Err(DomainError::NoNextStage(stage)),
    }
}
