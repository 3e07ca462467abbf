//! Newline-delimited echo protocol
//!
//! Messages are arbitrary bytes terminated by a single `\n`. Replies carry
//! an `Echo: ` prefix; the message `quit\n` ends the session with `Bye.\n`.

pub mod client;
pub mod session;


pub use client::EchoClient;
pub use session::EchoSession;
