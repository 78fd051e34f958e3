use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{Name, RecordType};
use hickory_proto::serialize::binary::BinEncodable;
use std::path::Path;
use std::str::FromStr;

pub fn query(name: &str, record_type: RecordType) -> Message {
    let mut message = Message::new();
    message
        .set_id(fastrand::u16(..))
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true);
    message.add_query(Query::query(Name::from_str(name).unwrap(), record_type));
    message
}

pub fn query_bytes(name: &str, record_type: RecordType) -> Vec<u8> {
    query(name, record_type).to_vec().unwrap()
}

/// Writes `lines` as `dns.json` under `state_dir`.
pub fn write_store(state_dir: &Path, lines: &[&str]) {
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(state_dir.join("dns.json"), content).unwrap();
}
