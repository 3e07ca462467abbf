//! HTTP/1.1 subset server implementation
//!
//! This module provides head framing, request parsing, the request-body
//! strategies (fixed-length, chunked transfer-encoding, read-to-close) and
//! response writing for a subset of HTTP/1.1.

pub mod body;
pub mod handler;
pub mod request;
pub mod response;
pub mod session;


pub use body::{BodyLength, FragmentSource, RequestBody};
pub use handler::{DefaultHandler, Handler};
pub use request::HttpRequest;
pub use response::{HttpResponse, ResponseBody};
pub use session::HttpSession;
