use hickory_proto::op::{Message, MessageType};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record};
use hickory_proto::serialize::binary::BinEncodable;
use mesh_dns_infrastructure::dns::transport::{read_with_length_prefix, send_with_length_prefix};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::{TcpListener, UdpSocket};

pub const UPSTREAM_ANSWER: Ipv4Addr = Ipv4Addr::new(192, 0, 2, 7);

#[derive(Clone, Copy)]
pub enum UpstreamBehavior {
    /// One A record over UDP.
    Answer,
    /// TC-flagged empty reply over UDP, full answer over TCP.
    TruncateUdp,
    /// Never replies.
    Silent,
}

/// Upstream resolver on loopback serving the same port over UDP and TCP.
pub struct MockUpstream {
    addr: SocketAddr,
    udp_queries: Arc<AtomicUsize>,
    tcp_queries: Arc<AtomicUsize>,
}

impl MockUpstream {
    pub async fn start(behavior: UpstreamBehavior) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let socket = UdpSocket::bind(addr).await.unwrap();

        let udp_queries = Arc::new(AtomicUsize::new(0));
        let tcp_queries = Arc::new(AtomicUsize::new(0));

        let udp_count = Arc::clone(&udp_queries);
        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];
            while let Ok((len, peer)) = socket.recv_from(&mut buf).await {
                udp_count.fetch_add(1, Ordering::SeqCst);
                let request = Message::from_vec(&buf[..len]).unwrap();
                let reply = match behavior {
                    UpstreamBehavior::Answer => answer(&request, false),
                    UpstreamBehavior::TruncateUdp => answer(&request, true),
                    UpstreamBehavior::Silent => continue,
                };
                let _ = socket.send_to(&reply.to_vec().unwrap(), peer).await;
            }
        });

        let tcp_count = Arc::clone(&tcp_queries);
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                tcp_count.fetch_add(1, Ordering::SeqCst);
                let Ok(bytes) = read_with_length_prefix(&mut stream).await else {
                    continue;
                };
                let request = Message::from_vec(&bytes).unwrap();
                let reply = answer(&request, false).to_vec().unwrap();
                let _ = send_with_length_prefix(&mut stream, &reply).await;
            }
        });

        Self {
            addr,
            udp_queries,
            tcp_queries,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_queries(&self) -> usize {
        self.udp_queries.load(Ordering::SeqCst)
    }

    pub fn tcp_queries(&self) -> usize {
        self.tcp_queries.load(Ordering::SeqCst)
    }
}

fn answer(request: &Message, truncated: bool) -> Message {
    let mut response = Message::new();
    response
        .set_id(request.id())
        .set_message_type(MessageType::Response)
        .set_op_code(request.op_code())
        .set_recursion_desired(request.recursion_desired())
        .set_recursion_available(true);
    response.add_queries(request.queries().iter().cloned());

    if truncated {
        response.set_truncated(true);
    } else if let Some(query) = request.queries().first() {
        response.add_answer(Record::from_rdata(
            query.name().clone(),
            300,
            RData::A(A(UPSTREAM_ANSWER)),
        ));
    }
    response
}
