//! Growable byte accumulation for stream reassembly
//!
//! This module provides the incrementally growable buffer that framing code
//! scans for complete messages while partial stream data keeps arriving.

pub mod dynamic;

pub use dynamic::{DynBuf, MIN_CAPACITY};
