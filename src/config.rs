use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// There are 13 root servers, listed at https://www.iana.org/domains/root/servers
pub const ROOT_SERVER: &str = "l.root-servers.net";

pub const DNS_PORT: u16 = 53;

#[derive(Debug, Clone)]
pub struct Config {
    /// Where every lookup starts when no nameserver is cached for a zone
    pub root_server: String,
    pub port: u16,
    /// How long a single query may wait for its response
    pub timeout: Duration,
    pub max_response_size: usize,
    pub bind: SocketAddr,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_server: ROOT_SERVER.to_owned(),
            port: DNS_PORT,
            timeout: Duration::from_secs(2),
            max_response_size: 8192,
            bind: (Ipv4Addr::UNSPECIFIED, 0).into(),
        }
    }
}
