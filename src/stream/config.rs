use crate::conn::DEFAULT_READ_CHUNK;
use std::net::SocketAddr;

/// Configuration for stream servers
///
/// # Examples
///
/// ```
/// use framesrv::stream::StreamConfig;
///
/// let config = StreamConfig {
///     bind_addr: "127.0.0.1:8080".parse().unwrap(),
///     max_connections: 100,
///     read_chunk: 4096,
/// };
/// ```
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Maximum number of concurrent connections
    pub max_connections: usize,
    /// Upper bound on a single read from a connection
    pub read_chunk: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            max_connections: 100,
            read_chunk: DEFAULT_READ_CHUNK,
        }
    }
}
