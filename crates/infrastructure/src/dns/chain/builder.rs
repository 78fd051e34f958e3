use super::{ForwardStage, MeshStage, QueryStage, ResponseLogStage};
use mesh_dns_application::ports::HostRecordSource;
use mesh_dns_application::use_cases::ResolveMeshQueryUseCase;
use mesh_dns_domain::{ConfigError, Directive};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// The assembled stage chain, head first.
pub struct ResolutionChain {
    head: Arc<dyn QueryStage>,
    stages: Vec<Arc<dyn QueryStage>>,
}

impl ResolutionChain {
    /// Builds stages back to front so each one owns its successor.
    pub fn build(
        directives: &[Directive],
        store: Arc<dyn HostRecordSource>,
        upstream_timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let mut next: Option<Arc<dyn QueryStage>> = None;
        let mut stages: Vec<Arc<dyn QueryStage>> = Vec::with_capacity(directives.len());

        for directive in directives.iter().rev() {
            let stage: Arc<dyn QueryStage> = match directive {
                Directive::DataMesher => {
                    let use_case = Arc::new(ResolveMeshQueryUseCase::new(Arc::clone(&store)));
                    Arc::new(MeshStage::new(use_case, next.take()))
                }
                Directive::Forward(upstreams) => {
                    if next.is_some() {
                        return Err(ConfigError::Directive {
                            directive: Directive::FORWARD,
                            reason: "must be the last directive in the chain".to_string(),
                        });
                    }
                    Arc::new(ForwardStage::new(upstreams.clone(), upstream_timeout))
                }
                Directive::Log => {
                    let inner = next.take().ok_or_else(|| ConfigError::Directive {
                        directive: Directive::LOG,
                        reason: "needs at least one directive after it to wrap".to_string(),
                    })?;
                    Arc::new(ResponseLogStage::new(inner))
                }
            };
            stages.push(Arc::clone(&stage));
            next = Some(stage);
        }

        let head = next.ok_or_else(|| {
            ConfigError::Validation("Resolution chain has no directives".to_string())
        })?;
        stages.reverse();

        info!(
            stages = ?stages.iter().map(|s| s.name()).collect::<Vec<_>>(),
            "Resolution chain ready"
        );

        Ok(Self { head, stages })
    }

    pub fn head(&self) -> Arc<dyn QueryStage> {
        Arc::clone(&self.head)
    }

    pub fn stages(&self) -> &[Arc<dyn QueryStage>] {
        &self.stages
    }

    pub fn is_ready(&self) -> bool {
        self.stages.iter().all(|stage| stage.ready())
    }
}
