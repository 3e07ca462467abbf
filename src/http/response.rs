use super::body::{BodyLength, FragmentSource, RequestBody};
use crate::Result;
use crate::buffer::DynBuf;
use crate::conn::SeqConn;
use bytes::Bytes;
use http::StatusCode;
use tokio::io::{AsyncRead, AsyncWrite};

/// An HTTP response: status, verbatim header lines, and a body producer.
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: Vec<String>,
    pub body: ResponseBody,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: ResponseBody) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body,
        }
    }

    /// Appends a verbatim header line.
    pub fn with_header(mut self, line: impl Into<String>) -> Self {
        self.headers.push(line.into());
        self
    }
}

/// Body strategies a handler can respond with.
pub enum ResponseBody {
    /// No entity; declared length 0
    Empty,
    /// A complete in-memory entity; declared length known
    Full(Bytes),
    /// Forward the request entity; length as declared by its strategy
    Request(RequestBody),
    /// A streamed entity of unknown length, sent chunked
    Stream(Box<dyn FragmentSource>),
}

impl ResponseBody {
    fn declared_len(&self) -> BodyLength {
        match self {
            ResponseBody::Empty => BodyLength::Known(0),
            ResponseBody::Full(data) => BodyLength::Known(data.len()),
            ResponseBody::Request(body) => body.declared_len(),
            ResponseBody::Stream(_) => BodyLength::Unknown,
        }
    }
}

/// Writes `res` to the connection: status line, headers, then the body.
///
/// A known declared length is emitted as `Content-Length` with the
/// fragments written verbatim; an unknown one as `Transfer-Encoding:
/// chunked` with each fragment chunk-framed and a zero-length final chunk
/// closing the body.
pub async fn write_response<S>(
    conn: &mut SeqConn<S>,
    buf: &mut DynBuf,
    res: &mut HttpResponse,
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    let length = res.body.declared_len();

    let mut head = format!(
        "HTTP/1.1 {} {}\r\n",
        res.status.as_u16(),
        res.status.canonical_reason().unwrap_or("Unknown"),
    );
    for header in &res.headers {
        head.push_str(header);
        head.push_str("\r\n");
    }
    match length {
        BodyLength::Known(len) => {
            head.push_str(&format!("Content-Length: {len}\r\n"));
        }
        BodyLength::Unknown => {
            head.push_str("Transfer-Encoding: chunked\r\n");
        }
    }
    head.push_str("\r\n");
    conn.write(head.as_bytes()).await?;

    loop {
        let fragment = match &mut res.body {
            ResponseBody::Empty => Bytes::new(),
            // taking leaves an empty entity behind, terminating the next turn
            ResponseBody::Full(data) => std::mem::take(data),
            ResponseBody::Request(body) => body.next_fragment(conn, buf).await?,
            ResponseBody::Stream(source) => source.next_fragment().await?,
        };

        if fragment.is_empty() {
            if length == BodyLength::Unknown {
                conn.write(b"0\r\n\r\n").await?;
            }
            return Ok(());
        }

        match length {
            BodyLength::Known(_) => conn.write(&fragment).await?,
            BodyLength::Unknown => {
                let mut framed = format!("{:x}\r\n", fragment.len()).into_bytes();
                framed.extend_from_slice(&fragment);
                framed.extend_from_slice(b"\r\n");
                conn.write(&framed).await?;
            }
        }
    }
}
