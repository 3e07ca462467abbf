use thiserror::Error;

/// Error types for the framesrv library
#[derive(Error, Debug)]
pub enum FrameError {
    /// Failures surfaced by the underlying byte stream (accept, read, write)
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// API misuse, e.g. consuming more bytes than are buffered
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Malformed wire data: bad request line, bad lengths, disallowed bodies
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The stream ended while more bytes were still promised
    #[error("unexpected eof: {0}")]
    UnexpectedEof(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for the framesrv library
pub type Result<T> = std::result::Result<T, FrameError>;

pub mod buffer;
pub mod conn;
pub mod echo;
pub mod http;
pub mod stream;

// Re-export main types for convenience
pub use buffer::DynBuf;
pub use conn::SeqConn;
pub use echo::{EchoClient, EchoSession};
pub use crate::http::{DefaultHandler, Handler, HttpRequest, HttpResponse, HttpSession, RequestBody};
pub use stream::{Session, StreamConfig, StreamServer};
