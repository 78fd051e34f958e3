//! DNS Message Builder
//!
//! Builds response messages for the resolution chain and serializes them to
//! wire format using `hickory-proto`.

use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::AAAA;
use hickory_proto::rr::{Name, RData, Record};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use mesh_dns_domain::{DnsRecord, DomainError};

/// Largest UDP response allowed when the client sent no EDNS(0) OPT record
pub const MAX_PLAIN_UDP_SIZE: usize = 512;

pub struct MessageBuilder;

impl MessageBuilder {
    /// Empty reply mirroring the request: same id, opcode, RD and CD flags,
    /// and the question section copied over.
    pub fn reply_to(request: &Message) -> Message {
        let mut response = Message::new();
        response
            .set_id(request.id())
            .set_message_type(MessageType::Response)
            .set_op_code(request.op_code())
            .set_recursion_desired(request.recursion_desired())
            .set_checking_disabled(request.checking_disabled());
        response.add_queries(request.queries().iter().cloned());
        response
    }

    /// Authoritative NOERROR reply carrying `records`, which may be empty.
    pub fn authoritative_answer(
        request: &Message,
        records: &[DnsRecord],
    ) -> Result<Message, DomainError> {
        let mut response = Self::reply_to(request);
        response
            .set_authoritative(true)
            .set_response_code(ResponseCode::NoError);

        for record in records {
            response.add_answer(Self::aaaa_record(record)?);
        }

        Ok(response)
    }

    pub fn failure(request: &Message, code: ResponseCode) -> Message {
        let mut response = Self::reply_to(request);
        response.set_response_code(code);
        response
    }

    fn aaaa_record(record: &DnsRecord) -> Result<Record, DomainError> {
        let name = Name::from_ascii(&*record.domain).map_err(|e| {
            DomainError::InvalidDomainName(format!("Invalid owner name '{}': {}", record.domain, e))
        })?;

        Ok(Record::from_rdata(
            name,
            record.ttl,
            RData::AAAA(AAAA(record.address)),
        ))
    }

    /// Serialize a Message to wire format bytes
    pub fn serialize(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }

    /// Serialize for a UDP reply to `request`.
    ///
    /// When the encoded response exceeds what the client can receive, the
    /// record sections are dropped and TC is set so the client retries over TCP.
    pub fn serialize_for_udp(response: &Message, request: &Message) -> Result<Vec<u8>, DomainError> {
        let max_size = request
            .extensions()
            .as_ref()
            .map_or(MAX_PLAIN_UDP_SIZE, |edns| {
                (edns.max_payload() as usize).max(MAX_PLAIN_UDP_SIZE)
            });

        let bytes = Self::serialize(response)?;
        if bytes.len() <= max_size {
            return Ok(bytes);
        }

        let mut truncated = response.clone();
        truncated.take_answers();
        truncated.take_name_servers();
        truncated.take_additionals();
        truncated.set_truncated(true);
        Self::serialize(&truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_proto::op::{OpCode, Query};
    use hickory_proto::rr::RecordType;
    use std::str::FromStr;

    fn request(name: &str, record_type: RecordType) -> Message {
        let mut message = Message::new();
        message
            .set_id(4242)
            .set_message_type(MessageType::Query)
            .set_op_code(OpCode::Query)
            .set_recursion_desired(true);
        message.add_query(Query::query(Name::from_str(name).unwrap(), record_type));
        message
    }

    #[test]
    fn test_reply_mirrors_request() {
        let req = request("peer.mesh.", RecordType::AAAA);
        let reply = MessageBuilder::reply_to(&req);

        assert_eq!(reply.id(), 4242);
        assert_eq!(reply.message_type(), MessageType::Response);
        assert!(reply.recursion_desired());
        assert_eq!(reply.queries(), req.queries());
    }

    #[test]
    fn test_authoritative_answer_sets_aa_and_noerror() {
        let req = request("peer.mesh.", RecordType::AAAA);
        let records = vec![DnsRecord::aaaa("peer.mesh.", "fd00::1".parse().unwrap())];

        let reply = MessageBuilder::authoritative_answer(&req, &records).unwrap();

        assert!(reply.authoritative());
        assert_eq!(reply.response_code(), ResponseCode::NoError);
        assert_eq!(reply.answers().len(), 1);
        assert_eq!(reply.answers()[0].ttl(), 60);
        assert_eq!(reply.answers()[0].record_type(), RecordType::AAAA);
    }

    #[test]
    fn test_serialized_reply_parses_back() {
        let req = request("peer.mesh.", RecordType::AAAA);
        let records = vec![DnsRecord::aaaa("peer.mesh.", "fd00::1".parse().unwrap())];
        let reply = MessageBuilder::authoritative_answer(&req, &records).unwrap();

        let bytes = MessageBuilder::serialize(&reply).unwrap();
        let parsed = Message::from_vec(&bytes).unwrap();

        assert_eq!(parsed.id(), 4242);
        assert_eq!(parsed.answers().len(), 1);
    }

    #[test]
    fn test_oversized_udp_reply_is_truncated() {
        let req = request("big.mesh.", RecordType::AAAA);
        let records: Vec<DnsRecord> = (1..=40u16)
            .map(|i| DnsRecord::aaaa("big.mesh.", format!("fd00::{:x}", i).parse().unwrap()))
            .collect();
        let reply = MessageBuilder::authoritative_answer(&req, &records).unwrap();

        let bytes = MessageBuilder::serialize_for_udp(&reply, &req).unwrap();
        let parsed = Message::from_vec(&bytes).unwrap();

        assert!(bytes.len() <= MAX_PLAIN_UDP_SIZE);
        assert!(parsed.truncated());
        assert!(parsed.answers().is_empty());
    }
}
