use crate::ports::HostRecordSource;
use mesh_dns_domain::{DnsQuery, DnsRecord, HostRecord, RecordType, StoreError};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of looking a query up in the mesh store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshAnswer {
    /// The name exists in the store. Empty when the query type is not AAAA
    /// or the host lists no usable address.
    Matched(Vec<DnsRecord>),

    /// The store was read completely and holds no such name.
    NoMatch,

    /// The store could not be opened at all.
    StoreError(StoreError),
}

pub struct ResolveMeshQueryUseCase {
    store: Arc<dyn HostRecordSource>,
}

impl ResolveMeshQueryUseCase {
    pub fn new(store: Arc<dyn HostRecordSource>) -> Self {
        Self { store }
    }

    /// Re-reads the store and resolves `query` against it. Blocking.
    pub fn execute(&self, query: &DnsQuery) -> MeshAnswer {
        match self.store.open() {
            Ok(records) => resolve(query, records),
            Err(e) => MeshAnswer::StoreError(e),
        }
    }
}

/// Scans `records` for the first host whose name matches the query.
///
/// Iteration stops at the first hit; later records are never pulled.
pub fn resolve<I>(query: &DnsQuery, records: I) -> MeshAnswer
where
    I: IntoIterator<Item = HostRecord>,
{
    let Some(host) = records.into_iter().find(|r| r.matches(&query.domain)) else {
        debug!(domain = %query.domain, "Name not in mesh store");
        return MeshAnswer::NoMatch;
    };

    if query.record_type != RecordType::AAAA {
        debug!(
            domain = %query.domain,
            record_type = %query.record_type,
            "Mesh host matched, no records of requested type"
        );
        return MeshAnswer::Matched(Vec::new());
    }

    let records: Vec<DnsRecord> = host
        .addresses
        .iter()
        .filter_map(|literal| {
            let address = parse_address(literal);
            if address.is_none() {
                warn!(
                    hostname = %host.hostname,
                    address = %literal,
                    "Skipping invalid address in mesh store"
                );
            }
            address
        })
        .map(|address| DnsRecord::aaaa(query.domain.clone(), address))
        .collect();

    debug!(domain = %query.domain, answers = records.len(), "Mesh host matched");
    MeshAnswer::Matched(records)
}

/// IPv6 literals are used as-is; IPv4 literals become IPv4-mapped IPv6.
fn parse_address(literal: &str) -> Option<Ipv6Addr> {
    literal.parse::<Ipv6Addr>().ok().or_else(|| {
        literal
            .parse::<Ipv4Addr>()
            .ok()
            .map(|v4| v4.to_ipv6_mapped())
    })
}
