//! Generic stream server functionality
//!
//! This module provides the TCP accept loop that drives one protocol
//! session per accepted connection.

pub mod config;
pub mod server;
pub mod session;

pub use config::StreamConfig;
pub use server::StreamServer;
pub use session::Session;
