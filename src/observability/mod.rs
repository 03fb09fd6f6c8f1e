//! Observability for trendgate
//!
//! Structured JSON logging only. The gateway is stateless per request, so
//! there is nothing to meter beyond the log stream.
//!
//! # Principles
//!
//! 1. One log line = one event
//! 2. Deterministic key ordering
//! 3. Synchronous, no buffering
//! 4. Warehouse failure detail is logged here and never sent to callers

mod logger;

pub use logger::{Logger, Severity};
