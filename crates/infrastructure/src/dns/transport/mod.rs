pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use mesh_dns_domain::DomainError;
use std::time::Duration;

pub use tcp::{read_with_length_prefix, send_with_length_prefix, TcpTransport};
pub use udp::UdpTransport;

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Vec<u8>,

    pub protocol_used: &'static str,
}

#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError>;

    fn protocol_name(&self) -> &'static str;
}
