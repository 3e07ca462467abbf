use crate::Result;
use crate::buffer::DynBuf;
use crate::conn::SeqConn;
use crate::stream::Session;
use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::debug;

const PREFIX: &[u8] = b"Echo: ";
const QUIT_MESSAGE: &[u8] = b"quit\n";
const QUIT_REPLY: &[u8] = b"Bye.\n";

/// Extracts one newline-terminated message from `buf`, terminator included.
///
/// Returns `None` while no terminator has been buffered yet; unconsumed
/// bytes stay in place for the next attempt.
pub fn extract_message(buf: &mut DynBuf) -> Result<Option<Bytes>> {
    match buf.unconsumed().iter().position(|&b| b == b'\n') {
        Some(idx) => Ok(Some(buf.consume(idx + 1)?)),
        None => Ok(None),
    }
}

/// Serves the echo protocol on `conn` until the peer closes the stream or
/// sends the quit message.
pub async fn serve<S>(conn: &mut SeqConn<S>) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    let mut buf = DynBuf::new();

    loop {
        while let Some(message) = extract_message(&mut buf)? {
            debug!(len = message.len(), "echoing message");
            if message.as_ref() == QUIT_MESSAGE {
                conn.write(QUIT_REPLY).await?;
                return Ok(());
            }
            let mut reply = Vec::with_capacity(PREFIX.len() + message.len());
            reply.extend_from_slice(PREFIX);
            reply.extend_from_slice(&message);
            conn.write(&reply).await?;
        }

        let chunk = conn.read().await?;
        if chunk.is_empty() {
            // graceful peer close
            return Ok(());
        }
        buf.append(&chunk);
    }
}

/// Echo protocol session for the stream server
pub struct EchoSession;

#[async_trait]
impl Session for EchoSession {
    async fn serve(&self, mut conn: SeqConn<TcpStream>) -> Result<()> {
        serve(&mut conn).await
    }
}
