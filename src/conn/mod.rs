//! Sequential connection handling over async byte streams
//!
//! This module wraps an async stream into the strictly sequential
//! read/write contract the framing loops are written against.

pub mod sequential;

pub use sequential::{SeqConn, DEFAULT_READ_CHUNK};
