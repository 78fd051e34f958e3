pub mod record;
pub mod record_type;

pub use record::{DnsRecord, MESH_RECORD_TTL};
pub use record_type::RecordType;
