//! Mesh DNS Domain Layer
pub mod config;
pub mod dns_query;
pub mod dns_record;
pub mod errors;
pub mod host_record;

pub use config::{CliOverrides, Config, ConfigError, Directive};
pub use dns_query::DnsQuery;
pub use dns_record::{DnsRecord, RecordType, MESH_RECORD_TTL};
pub use errors::{DomainError, StoreError};
pub use host_record::HostRecord;
