use mesh_dns_domain::{HostRecord, StoreError};
use std::path::PathBuf;

/// Lazy, single-pass sequence of host records in store order.
pub type HostRecords = Box<dyn Iterator<Item = HostRecord> + Send>;

/// Read access to the mesh membership store.
///
/// Every call to [`open`](HostRecordSource::open) starts a fresh read of the
/// current on-disk state; nothing is cached between calls.
pub trait HostRecordSource: Send + Sync {
    fn open(&self) -> Result<HostRecords, StoreError>;

    /// Path the next `open` will read.
    fn location(&self) -> PathBuf;
}
