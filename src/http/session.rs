use super::body::RequestBody;
use super::handler::Handler;
use super::request::HttpRequest;
use super::response::write_response;
use crate::Result;
use crate::buffer::DynBuf;
use crate::conn::SeqConn;
use crate::stream::Session;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::debug;

const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Cuts the request-line+headers block, terminator included.
///
/// Returns `None` while the head is still incomplete; already-buffered body
/// bytes past the terminator are left in place for the body strategies.
pub fn cut_head(buf: &mut DynBuf) -> Result<Option<Bytes>> {
    match find(buf.unconsumed(), HEAD_TERMINATOR) {
        Some(idx) => Ok(Some(buf.consume(idx + HEAD_TERMINATOR.len())?)),
        None => Ok(None),
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Serves HTTP requests on `conn` until the peer closes the stream or an
/// HTTP/1.0 exchange completes.
pub async fn serve<S, H>(conn: &mut SeqConn<S>, handler: &H) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
    H: Handler,
{
    let mut buf = DynBuf::new();

    loop {
        let head = loop {
            if let Some(head) = cut_head(&mut buf)? {
                break head;
            }
            let chunk = conn.read().await?;
            if chunk.is_empty() {
                // graceful peer close between requests
                return Ok(());
            }
            buf.append(&chunk);
        };

        let req = HttpRequest::parse(head)?;
        debug!(method = %req.method, path = %req.path, version = %req.version, "framed request");
        let version = req.version.clone();

        // TODO: drain an unread request body before reusing the connection
        let body = RequestBody::from_request(&req)?;
        let mut res = handler.handle(req, body).await?;
        write_response(conn, &mut buf, &mut res).await?;

        if version == "HTTP/1.0" {
            return Ok(());
        }
    }
}

/// HTTP session for the stream server
pub struct HttpSession<H: Handler> {
    handler: Arc<H>,
}

impl<H: Handler> HttpSession<H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }
}

#[async_trait]
impl<H: Handler> Session for HttpSession<H> {
    async fn serve(&self, mut conn: SeqConn<TcpStream>) -> Result<()> {
        serve(&mut conn, self.handler.as_ref()).await
    }
}
