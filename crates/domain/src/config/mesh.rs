use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File name the mesh daemon writes inside its state directory.
pub const MESH_STORE_FILE: &str = "dns.json";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MeshConfig {
    /// State directory of the mesh membership daemon
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
}

impl MeshConfig {
    pub fn store_path(&self) -> PathBuf {
        self.state_dir.join(MESH_STORE_FILE)
    }
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
        }
    }
}

fn default_state_dir() -> PathBuf {
    PathBuf::from("/var/lib/data-mesher")
}
