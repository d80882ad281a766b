//! Recorded contact traces
//!
//! A trace is a stream of [`ContactSample`](crate::types::ContactSample)s
//! captured from a device, stored as NDJSON (one sample per line) or as a JSON
//! array. Traces can be validated and replayed through a fresh classifier.

mod adapter;
mod replay;

pub use adapter::*;
pub use replay::*;
