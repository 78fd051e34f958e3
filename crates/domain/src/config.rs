pub mod directive;
pub mod errors;
pub mod logging;
pub mod mesh;
pub mod root;
pub mod server;
pub mod upstream;

pub use directive::Directive;
pub use errors::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use mesh::{MeshConfig, MESH_STORE_FILE};
pub use root::{CliOverrides, Config};
pub use server::ServerConfig;
pub use upstream::UpstreamConfig;
