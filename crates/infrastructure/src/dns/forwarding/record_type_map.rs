//! Mapping from `hickory_proto::rr::RecordType` to `mesh_dns_domain::RecordType`.
//!
//! Both sides agree on the IANA code, so the conversion goes through `u16`
//! and never loses a type the domain does not name.

use hickory_proto::rr::RecordType as HickoryRecordType;
use mesh_dns_domain::RecordType;

pub struct RecordTypeMapper;

impl RecordTypeMapper {
    pub fn from_hickory(hickory_type: HickoryRecordType) -> RecordType {
        RecordType::from_u16(u16::from(hickory_type))
    }
}
