#![deny(missing_docs)]

//! Core library for the document cabinet gateway.

/// HTTP routing and REST handlers.
pub mod api;
/// Outbound client for the document cabinet protocol.
pub mod cabinet;
/// Environment-driven configuration management.
pub mod config;
/// Document gateway service: listing, upload staging, search-then-delete.
pub mod gateway;
/// Structured logging and tracing setup.
pub mod logging;
/// Request counters exposed for observability.
pub mod metrics;
