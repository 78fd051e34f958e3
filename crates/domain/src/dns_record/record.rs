use super::RecordType;
use std::net::Ipv6Addr;
use std::sync::Arc;

/// TTL applied to every answer built from the mesh store.
pub const MESH_RECORD_TTL: u32 = 60;

/// One answer record produced from a mesh host entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    /// Owner name, exactly as the client asked for it.
    pub domain: Arc<str>,

    pub record_type: RecordType,

    pub address: Ipv6Addr,

    pub ttl: u32,
}

impl DnsRecord {
    pub fn aaaa(domain: impl Into<Arc<str>>, address: Ipv6Addr) -> Self {
        Self {
            domain: domain.into(),
            record_type: RecordType::AAAA,
            address,
            ttl: MESH_RECORD_TTL,
        }
    }
}
