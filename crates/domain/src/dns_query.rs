use super::RecordType;
use std::sync::Arc;

/// A single question as received from the client.
///
/// `domain` keeps the fully-qualified form (trailing root label) and the
/// original letter case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuery {
    pub domain: Arc<str>,
    pub record_type: RecordType,
}

impl DnsQuery {
    pub fn new(domain: impl Into<Arc<str>>, record_type: RecordType) -> Self {
        Self {
            domain: domain.into(),
            record_type,
        }
    }
}
