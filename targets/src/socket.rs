//! Socket-based request/reply target

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use ratebench_core::{Reply, Request, Target, TargetError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};

use crate::transport::Transport;

/// Result code for a non-empty reply
pub const CODE_OK: u16 = 0;

/// Result code for a zero-length reply
pub const CODE_EMPTY: u16 = 1;

/// Largest datagram we expect back
const MAX_DATAGRAM: usize = 65_535;

/// Sends each request payload to a fixed address and waits for one reply
///
/// The reply body is not interpreted; only its size and whether it was empty
/// are reported back to the engine.
#[derive(Debug, Clone)]
pub struct SocketTarget {
    name: String,
    addr: SocketAddr,
    transport: Transport,
}

impl SocketTarget {
    /// Create a target for an already resolved address
    pub fn new(addr: SocketAddr, transport: Transport) -> Self {
        Self {
            name: format!("{transport}://{addr}"),
            addr,
            transport,
        }
    }

    /// Resolve `host:port` and create a target for the first address found
    pub async fn resolve(server: &str, transport: Transport) -> io::Result<Self> {
        let addr = tokio::net::lookup_host(server)
            .await?
            .next()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no address found for {server}"),
                )
            })?;

        tracing::debug!(server, addr = %addr, transport = %transport, "Resolved target address");
        Ok(Self::new(addr, transport))
    }

    /// Remote address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Transport in use
    pub fn transport(&self) -> Transport {
        self.transport
    }

    async fn exchange(&self, payload: &[u8]) -> Result<usize, TargetError> {
        match self.transport {
            Transport::Udp => Ok(exchange_udp(self.addr, payload).await?),
            Transport::Tcp => exchange_tcp(self.addr, payload).await,
        }
    }
}

#[async_trait]
impl Target for SocketTarget {
    fn name(&self) -> &str {
        &self.name
    }

    async fn perform(&self, request: &Request, timeout: Duration) -> Result<Reply, TargetError> {
        let size = tokio::time::timeout(timeout, self.exchange(request.payload()))
            .await
            .map_err(|_| TargetError::Timeout(timeout))??;

        let code = if size == 0 { CODE_EMPTY } else { CODE_OK };
        Ok(Reply::new(code, size))
    }

    fn code_label(&self, code: u16) -> String {
        match code {
            CODE_OK => "OK".to_string(),
            CODE_EMPTY => "EMPTY".to_string(),
            other => other.to_string(),
        }
    }
}

async fn exchange_udp(addr: SocketAddr, payload: &[u8]) -> io::Result<usize> {
    let local: SocketAddr = if addr.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };

    let socket = UdpSocket::bind(local).await?;
    socket.connect(addr).await?;
    socket.send(payload).await?;

    let mut buf = vec![0u8; MAX_DATAGRAM];
    socket.recv(&mut buf).await
}

async fn exchange_tcp(addr: SocketAddr, payload: &[u8]) -> Result<usize, TargetError> {
    let len = u16::try_from(payload.len()).map_err(|_| {
        TargetError::Malformed(format!(
            "payload of {} bytes does not fit a 16-bit frame",
            payload.len()
        ))
    })?;

    let mut stream = TcpStream::connect(addr).await?;
    stream.set_nodelay(true)?;

    let mut frame = Vec::with_capacity(payload.len() + 2);
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(payload);
    stream.write_all(&frame).await?;

    let reply_len = usize::from(stream.read_u16().await?);
    let mut body = vec![0u8; reply_len];
    stream.read_exact(&mut body).await?;

    Ok(reply_len)
}
