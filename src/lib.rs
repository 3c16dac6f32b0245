//! attendq - patient queue and calling engine.
//!
//! This library exposes the queue coordinator and HTTP surface for testing
//! and embedding.

pub mod config;
pub mod http;
pub mod queue;
pub mod telemetry;
