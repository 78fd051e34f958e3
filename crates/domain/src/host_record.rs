use serde::{Deserialize, Serialize};

/// One line of the mesh membership store.
///
/// ```json
/// {"hostname":"peer1.mesh","ips":["fd00::1","fd00::2"]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HostRecord {
    /// Unqualified mesh name, without the trailing root label.
    pub hostname: String,

    /// Address literals in store order. Not deduplicated.
    #[serde(rename = "ips", default)]
    pub addresses: Vec<String>,
}

impl HostRecord {
    pub fn new(hostname: impl Into<String>, addresses: Vec<String>) -> Self {
        Self {
            hostname: hostname.into(),
            addresses,
        }
    }

    /// True when `query_name` is this hostname followed by the root label.
    /// The comparison is byte-exact: no case folding, no trimming.
    pub fn matches(&self, query_name: &str) -> bool {
        query_name
            .strip_suffix('.')
            .is_some_and(|name| name == self.hostname)
    }
}
