use mesh_dns_domain::Config;
use mesh_dns_infrastructure::dns::ResolutionChain;
use mesh_dns_infrastructure::store::JsonLinesHostStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub fn build_chain(config: &Config) -> anyhow::Result<ResolutionChain> {
    let directives = config.directives()?;
    let store = Arc::new(JsonLinesHostStore::new(config.mesh.state_dir.clone()));

    info!(
        store = %config.mesh.store_path().display(),
        "Mesh store configured"
    );

    let chain = ResolutionChain::build(
        &directives,
        store,
        Duration::from_millis(config.upstream.query_timeout_ms),
    )?;
    Ok(chain)
}
