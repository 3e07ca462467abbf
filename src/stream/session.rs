use crate::Result;
use crate::conn::SeqConn;
use async_trait::async_trait;
use tokio::net::TcpStream;

/// A per-connection protocol driver.
///
/// The server hands each accepted connection to exactly one session, which
/// owns it for its whole lifetime. The connection is dropped when `serve`
/// returns, so the transport is closed exactly once on every exit path,
/// normal or failed.
#[async_trait]
pub trait Session: Send + Sync + 'static {
    /// Drives the protocol on `conn` until the session terminates.
    async fn serve(&self, conn: SeqConn<TcpStream>) -> Result<()>;
}
