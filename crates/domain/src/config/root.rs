use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::directive::Directive;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::mesh::MeshConfig;
use super::server::ServerConfig;
use super::upstream::UpstreamConfig;

const LOCAL_CONFIG_PATH: &str = "mesh-dns.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/mesh-dns/config.toml";

/// Main configuration structure for Mesh DNS
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Server configuration (ports, bind address)
    #[serde(default)]
    pub server: ServerConfig,

    /// Location of the mesh membership store
    #[serde(default)]
    pub mesh: MeshConfig,

    /// Forwarding behaviour
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Resolution chain, first entry sees the query first
    #[serde(default = "default_chain")]
    pub chain: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            mesh: MeshConfig::default(),
            upstream: UpstreamConfig::default(),
            logging: LoggingConfig::default(),
            chain: default_chain(),
        }
    }
}

fn default_chain() -> Vec<String> {
    vec![
        Directive::DATA_MESHER.to_string(),
        "forward 1.1.1.1 1.0.0.1".to_string(),
    ]
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. mesh-dns.toml in current directory
    /// 3. /etc/mesh-dns/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::get_config_path() {
                Some(found) => Self::from_file(&found)?,
                None => Self::default(),
            },
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(port) = overrides.health_port {
            self.server.health_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(dir) = overrides.state_dir {
            self.mesh.state_dir = dir;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Parsed resolution chain
    pub fn directives(&self) -> Result<Vec<Directive>, ConfigError> {
        Directive::parse_chain(&self.chain)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.dns_port == 0 {
            return Err(ConfigError::Validation("DNS port cannot be 0".to_string()));
        }

        if self.server.health_port == 0 {
            return Err(ConfigError::Validation(
                "Health port cannot be 0".to_string(),
            ));
        }

        self.server.bind_ip()?;

        if self.upstream.query_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "Upstream query timeout cannot be 0".to_string(),
            ));
        }

        self.directives().map(|_| ())
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        [LOCAL_CONFIG_PATH, SYSTEM_CONFIG_PATH]
            .into_iter()
            .find(|candidate| Path::new(candidate).exists())
            .map(str::to_string)
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub health_port: Option<u16>,
    pub bind_address: Option<String>,
    pub state_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}
