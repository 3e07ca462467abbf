use super::request::HttpRequest;
use crate::buffer::DynBuf;
use crate::conn::SeqConn;
use crate::{FrameError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite};

/// Declared entity length of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyLength {
    /// Exact byte count known up front; emitted as `Content-Length`.
    Known(usize),
    /// No declared length; emitted with chunked transfer-encoding.
    Unknown,
}

/// A suspendable producer of response body fragments.
///
/// Fragments are pulled strictly one at a time, never concurrently; an
/// empty fragment terminates the body.
#[async_trait]
pub trait FragmentSource: Send {
    async fn next_fragment(&mut self) -> Result<Bytes>;
}

/// Reads the request entity from the connection, one fragment at a time.
///
/// The strategy — fixed-length, chunked decode, or read-to-connection-end —
/// is picked once from the request head; callers drive all three through the
/// same [`next_fragment`](RequestBody::next_fragment) contract. The
/// connection and the shared buffer are passed in on every call rather than
/// captured, so the producer can be handed to a response writer that also
/// needs them.
#[derive(Debug)]
pub struct RequestBody {
    kind: BodyKind,
}

#[derive(Debug)]
enum BodyKind {
    Fixed { total: usize, remaining: usize },
    Chunked { state: ChunkState },
    UntilClose { done: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkState {
    /// Expecting a `\r\n`-terminated hex chunk-size line
    Size,
    /// Streaming out the current chunk's bytes
    Data { remaining: usize },
    /// Expecting the `\r\n` that closes the current chunk
    DataEnd,
    /// Final chunk seen; the body is complete
    Done,
}

impl RequestBody {
    /// Picks the body strategy for a parsed request head.
    ///
    /// GET and HEAD requests must not carry an entity: a positive
    /// `Content-Length` or any chunked transfer-encoding on those methods is
    /// a protocol error. A present `Content-Length` wins over
    /// `Transfer-Encoding: chunked`; with neither, the entity runs to
    /// connection close.
    pub fn from_request(req: &HttpRequest) -> Result<Self> {
        let content_length = match req.header_value("Content-Length") {
            Some(value) => Some(value.parse::<usize>().map_err(|_| {
                FrameError::Protocol(format!("invalid Content-Length: {value:?}"))
            })?),
            None => None,
        };
        let chunked = req
            .header_value("Transfer-Encoding")
            .is_some_and(|value| value.eq_ignore_ascii_case("chunked"));

        let body_allowed = !(req.method == "GET" || req.method == "HEAD");
        if !body_allowed && (chunked || content_length.is_some_and(|len| len > 0)) {
            return Err(FrameError::Protocol(format!(
                "body not allowed on {} request",
                req.method
            )));
        }

        let kind = match content_length {
            Some(total) => BodyKind::Fixed {
                total,
                remaining: total,
            },
            None if chunked => BodyKind::Chunked {
                state: ChunkState::Size,
            },
            None => BodyKind::UntilClose { done: false },
        };
        Ok(Self { kind })
    }

    /// Declared length of the entity.
    pub fn declared_len(&self) -> BodyLength {
        match &self.kind {
            BodyKind::Fixed { total, .. } => BodyLength::Known(*total),
            _ => BodyLength::Unknown,
        }
    }

    /// Produces the next fragment of the entity; an empty fragment means the
    /// body is complete, and completion is idempotent.
    pub async fn next_fragment<S>(
        &mut self,
        conn: &mut SeqConn<S>,
        buf: &mut DynBuf,
    ) -> Result<Bytes>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send,
    {
        match &mut self.kind {
            BodyKind::Fixed { remaining, .. } => {
                if *remaining == 0 {
                    return Ok(Bytes::new());
                }
                if buf.is_empty() {
                    let chunk = conn.read().await?;
                    if chunk.is_empty() {
                        return Err(FrameError::UnexpectedEof(
                            "stream ended inside a fixed-length body".to_string(),
                        ));
                    }
                    buf.append(&chunk);
                }
                // the buffer may already hold bytes of the next pipelined
                // request; never consume past the declared length
                let take = buf.len().min(*remaining);
                *remaining -= take;
                buf.consume(take)
            }
            BodyKind::Chunked { state } => next_chunked_fragment(state, conn, buf).await,
            BodyKind::UntilClose { done } => {
                if *done {
                    return Ok(Bytes::new());
                }
                if buf.is_empty() {
                    let chunk = conn.read().await?;
                    if chunk.is_empty() {
                        // no declared length: end-of-stream is end-of-body
                        *done = true;
                        return Ok(Bytes::new());
                    }
                    buf.append(&chunk);
                }
                buf.consume(buf.len())
            }
        }
    }
}

async fn next_chunked_fragment<S>(
    state: &mut ChunkState,
    conn: &mut SeqConn<S>,
    buf: &mut DynBuf,
) -> Result<Bytes>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    loop {
        match *state {
            ChunkState::Size => {
                let line = read_line(conn, buf).await?;
                let size = parse_chunk_size(&line)?;
                if size == 0 {
                    consume_crlf(conn, buf).await?;
                    *state = ChunkState::Done;
                    return Ok(Bytes::new());
                }
                *state = ChunkState::Data { remaining: size };
            }
            ChunkState::Data { remaining } => {
                if buf.is_empty() {
                    fill(conn, buf).await?;
                }
                let take = buf.len().min(remaining);
                *state = if take == remaining {
                    ChunkState::DataEnd
                } else {
                    ChunkState::Data {
                        remaining: remaining - take,
                    }
                };
                return buf.consume(take);
            }
            ChunkState::DataEnd => {
                consume_crlf(conn, buf).await?;
                *state = ChunkState::Size;
            }
            ChunkState::Done => return Ok(Bytes::new()),
        }
    }
}

/// Pulls one more chunk of stream data into `buf`; an empty read while the
/// body still owes bytes is an unexpected end of stream.
async fn fill<S>(conn: &mut SeqConn<S>, buf: &mut DynBuf) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    let chunk = conn.read().await?;
    if chunk.is_empty() {
        return Err(FrameError::UnexpectedEof(
            "stream ended inside a chunked body".to_string(),
        ));
    }
    buf.append(&chunk);
    Ok(())
}

/// Reads up to and including the next `\r\n`, returning the line without it.
async fn read_line<S>(conn: &mut SeqConn<S>, buf: &mut DynBuf) -> Result<Bytes>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    loop {
        if let Some(idx) = find_crlf(buf.unconsumed()) {
            let line = buf.consume(idx + 2)?;
            return Ok(line.slice(..idx));
        }
        fill(conn, buf).await?;
    }
}

async fn consume_crlf<S>(conn: &mut SeqConn<S>, buf: &mut DynBuf) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    while buf.len() < 2 {
        fill(conn, buf).await?;
    }
    let crlf = buf.consume(2)?;
    if &crlf[..] != b"\r\n" {
        return Err(FrameError::Protocol(
            "chunk not terminated by CRLF".to_string(),
        ));
    }
    Ok(())
}

fn find_crlf(haystack: &[u8]) -> Option<usize> {
    haystack.windows(2).position(|window| window == b"\r\n")
}

fn parse_chunk_size(line: &[u8]) -> Result<usize> {
    let text = std::str::from_utf8(line)
        .map_err(|_| FrameError::Protocol("chunk size line is not valid utf-8".to_string()))?;
    usize::from_str_radix(text, 16)
        .map_err(|_| FrameError::Protocol(format!("invalid chunk size line: {text:?}")))
}
