use mesh_dns_infrastructure::dns::transport::{read_with_length_prefix, send_with_length_prefix};
use mesh_dns_infrastructure::dns::DnsServerHandler;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tracing::{debug, error, info, warn};

const TCP_IDLE_TIMEOUT: Duration = Duration::from_secs(10);
const UDP_RECV_BUFFER: usize = 4096;

pub async fn start_dns_server(bind_addr: SocketAddr, handler: DnsServerHandler) -> anyhow::Result<()> {
    let domain = if bind_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let udp_socket = Arc::new(create_udp_socket(domain, bind_addr)?);
    let tcp_listener = create_tcp_listener(domain, bind_addr)?;

    info!(bind_address = %bind_addr, "DNS server listening on UDP and TCP");

    let handler = Arc::new(handler);
    tokio::try_join!(
        run_udp(udp_socket, Arc::clone(&handler)),
        run_tcp(tcp_listener, handler),
    )?;
    Ok(())
}

async fn run_udp(socket: Arc<UdpSocket>, handler: Arc<DnsServerHandler>) -> anyhow::Result<()> {
    let mut recv_buf = [0u8; UDP_RECV_BUFFER];

    loop {
        let (n, from) = match socket.recv_from(&mut recv_buf).await {
            Ok(received) => received,
            Err(e) => {
                warn!(error = %e, "UDP recv error");
                continue;
            }
        };

        let query: Arc<[u8]> = Arc::from(&recv_buf[..n]);
        let handler = Arc::clone(&handler);
        let socket = Arc::clone(&socket);
        tokio::spawn(async move {
            if let Some(response) = handler.handle_udp(&query, from.ip()).await {
                if let Err(e) = socket.send_to(&response, from).await {
                    debug!(client = %from, error = %e, "Failed to send UDP response");
                }
            }
        });
    }
}

async fn run_tcp(listener: TcpListener, handler: Arc<DnsServerHandler>) -> anyhow::Result<()> {
    loop {
        let (stream, from) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!(error = %e, "TCP accept error");
                continue;
            }
        };

        let handler = Arc::clone(&handler);
        tokio::spawn(async move {
            serve_tcp_connection(stream, from, handler).await;
        });
    }
}

/// Serves length-prefixed queries on one connection until the client goes
/// quiet or hangs up.
async fn serve_tcp_connection(mut stream: TcpStream, from: SocketAddr, handler: Arc<DnsServerHandler>) {
    loop {
        let query = match tokio::time::timeout(TCP_IDLE_TIMEOUT, read_with_length_prefix(&mut stream)).await {
            Ok(Ok(query)) => query,
            Ok(Err(e)) => {
                debug!(client = %from, error = %e, "TCP connection closed");
                return;
            }
            Err(_) => {
                debug!(client = %from, "TCP connection idle, closing");
                return;
            }
        };

        let Some(response) = handler.handle_tcp(&query, from.ip()).await else {
            return;
        };

        if let Err(e) = send_with_length_prefix(&mut stream, &response).await {
            debug!(client = %from, error = %e, "Failed to send TCP response");
            return;
        }
    }
}

fn create_udp_socket(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.set_recv_buffer_size(512 * 1024)?;
    socket.set_send_buffer_size(512 * 1024)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}

fn create_tcp_listener(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<TcpListener> {
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;
    let std_listener: std::net::TcpListener = socket.into();
    Ok(TcpListener::from_std(std_listener)?)
}
