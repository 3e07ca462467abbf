use super::session::extract_message;
use crate::buffer::DynBuf;
use crate::conn::SeqConn;
use crate::{FrameError, Result};
use bytes::Bytes;
use std::net::SocketAddr;
use tokio::net::TcpStream;

/// Line-protocol client for the echo server.
///
/// Reassembles replies through the crate's own buffer and framing, so a
/// reply split across several stream chunks is still returned whole.
pub struct EchoClient {
    conn: SeqConn<TcpStream>,
    buf: DynBuf,
}

impl EchoClient {
    /// Connects to an echo server at the given address.
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self {
            conn: SeqConn::new(stream),
            buf: DynBuf::new(),
        })
    }

    /// Sends one newline-terminated message and waits for the full reply line.
    pub async fn send(&mut self, message: &[u8]) -> Result<Bytes> {
        self.conn.write(message).await?;
        loop {
            if let Some(reply) = extract_message(&mut self.buf)? {
                return Ok(reply);
            }
            let chunk = self.conn.read().await?;
            if chunk.is_empty() {
                return Err(FrameError::UnexpectedEof(
                    "server closed before replying".to_string(),
                ));
            }
            self.buf.append(&chunk);
        }
    }

    /// Sends a string message, appending the terminator, and decodes the reply.
    pub async fn send_line(&mut self, line: &str) -> Result<String> {
        let mut message = line.as_bytes().to_vec();
        message.push(b'\n');
        let reply = self.send(&message).await?;
        String::from_utf8(reply.to_vec())
            .map_err(|e| FrameError::Protocol(format!("reply is not valid utf-8: {e}")))
    }
}
