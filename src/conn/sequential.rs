use crate::{FrameError, Result};
use bytes::{Bytes, BytesMut};
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Default upper bound on a single read from the underlying stream.
pub const DEFAULT_READ_CHUNK: usize = 4096;

/// Wraps an async byte stream into a strictly sequential read/write contract.
///
/// At most one read can be outstanding at a time; the exclusive borrow taken
/// by [`read`](SeqConn::read) makes a second concurrent read unrepresentable.
/// Terminal states are latched, never reset: once the peer ends the stream
/// every further read returns an empty chunk without touching the transport,
/// and once the transport errors every further read or write fails with that
/// error.
///
/// Backpressure is structural — the transport is only polled while a read is
/// awaited, so no data is pulled faster than the caller consumes it.
#[derive(Debug)]
pub struct SeqConn<S> {
    stream: S,
    read_chunk: usize,
    err: Option<(io::ErrorKind, String)>,
    ended: bool,
}

impl<S> SeqConn<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps `stream` with the default read chunk size.
    pub fn new(stream: S) -> Self {
        Self::with_read_chunk(stream, DEFAULT_READ_CHUNK)
    }

    /// Wraps `stream`, pulling at most `read_chunk` bytes per read.
    pub fn with_read_chunk(stream: S, read_chunk: usize) -> Self {
        Self {
            stream,
            read_chunk,
            err: None,
            ended: false,
        }
    }

    /// Waits for the next chunk of stream data.
    ///
    /// An empty chunk signals end-of-stream. The end is latched: every
    /// subsequent call keeps returning an empty chunk immediately.
    pub async fn read(&mut self) -> Result<Bytes> {
        if let Some(err) = self.latched_err() {
            return Err(err);
        }
        if self.ended {
            return Ok(Bytes::new());
        }

        let mut chunk = BytesMut::with_capacity(self.read_chunk);
        match self.stream.read_buf(&mut chunk).await {
            Ok(0) => {
                self.ended = true;
                Ok(Bytes::new())
            }
            Ok(_) => Ok(chunk.freeze()),
            Err(err) => Err(self.latch(err)),
        }
    }

    /// Writes `data` to the stream and waits until the transport accepted it.
    pub async fn write(&mut self, data: &[u8]) -> Result<()> {
        if let Some(err) = self.latched_err() {
            return Err(err);
        }
        if let Err(err) = self.stream.write_all(data).await {
            return Err(self.latch(err));
        }
        if let Err(err) = self.stream.flush().await {
            return Err(self.latch(err));
        }
        Ok(())
    }

    fn latch(&mut self, err: io::Error) -> FrameError {
        self.err = Some((err.kind(), err.to_string()));
        FrameError::Transport(err)
    }

    fn latched_err(&self) -> Option<FrameError> {
        self.err
            .as_ref()
            .map(|(kind, msg)| FrameError::Transport(io::Error::new(*kind, msg.clone())))
    }
}
