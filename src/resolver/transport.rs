use std::io;
use std::net::SocketAddr;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::net::{lookup_host, UdpSocket};
use tracing::{debug, instrument};

use crate::config::Config;

/// Moves single datagrams between the resolver and nameservers.
/// No retries happen at this level, and waiting is bounded by the caller.
#[async_trait]
pub trait Transport: Send {
    /// Sends one request to `server`, which is a host name or an address
    async fn send(&mut self, server: &str, request: &[u8]) -> io::Result<()>;

    /// Waits for the next datagram addressed to us
    async fn receive(&mut self) -> io::Result<Bytes>;
}

pub struct UdpTransport {
    sock: UdpSocket,
    port: u16,
    buf: Vec<u8>,
}

impl UdpTransport {
    pub async fn bind(config: &Config) -> io::Result<Self> {
        let sock = UdpSocket::bind(config.bind).await?;

        Ok(Self {
            sock,
            port: config.port,
            buf: vec![0; config.max_response_size],
        })
    }

    async fn server_addr(&self, server: &str) -> io::Result<SocketAddr> {
        let addrs: Vec<SocketAddr> = lookup_host((server, self.port)).await?.collect();

        // The socket is bound to an IPv4 wildcard
        addrs
            .iter()
            .find(|addr| addr.is_ipv4())
            .or_else(|| addrs.first())
            .copied()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no address found for {server}"),
                )
            })
    }
}

#[async_trait]
impl Transport for UdpTransport {
    #[instrument(level = "trace", skip(self, request))]
    async fn send(&mut self, server: &str, request: &[u8]) -> io::Result<()> {
        let addr = self.server_addr(server).await?;
        debug!(%addr, len = request.len(), "sending query");

        self.sock.send_to(request, addr).await?;
        Ok(())
    }

    async fn receive(&mut self) -> io::Result<Bytes> {
        let len = self.sock.recv(&mut self.buf).await?;
        Ok(Bytes::copy_from_slice(&self.buf[..len]))
    }
}
