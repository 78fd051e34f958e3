use clap::Parser;
use mesh_dns_domain::CliOverrides;
use mesh_dns_infrastructure::dns::DnsServerHandler;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

#[derive(Parser, Debug)]
#[command(name = "mesh-dns")]
#[command(version)]
#[command(about = "Mesh DNS - answers AAAA queries for mesh peers, forwards the rest")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Health endpoint port
    #[arg(long)]
    health_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Directory holding the mesh membership store (dns.json)
    #[arg(long, value_name = "DIR")]
    state_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            dns_port: self.dns_port,
            health_port: self.health_port,
            bind_address: self.bind.clone(),
            state_dir: self.state_dir.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = bootstrap::load_config(cli.config.as_deref(), cli.overrides())?;

    bootstrap::init_logging(&config);

    info!("Starting Mesh DNS v{}", env!("CARGO_PKG_VERSION"));

    let chain = Arc::new(di::build_chain(&config)?);
    let handler = DnsServerHandler::new(chain.head());

    let dns_addr = config.server.dns_addr()?;
    let health_addr = config.server.health_addr()?;

    tokio::select! {
        result = server::start_dns_server(dns_addr, handler) => {
            if let Err(e) = &result {
                error!(error = %e, "DNS server error");
            }
            result?;
        }
        result = server::start_health_server(health_addr, chain) => {
            if let Err(e) = &result {
                error!(error = %e, "Health server error");
            }
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
