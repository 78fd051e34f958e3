mod host_record_source;

pub use host_record_source::{HostRecordSource, HostRecords};

// Re-export for convenience
pub use mesh_dns_domain::{DnsQuery, HostRecord, StoreError};
