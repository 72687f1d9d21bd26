//! Observability for Axum Explorer: structured logging and optional
//! OpenTelemetry span export.

pub mod tracing_setup;

pub use tracing_setup::{LogFormat, init_tracing, init_tracing_with_filter, shutdown_tracing};
