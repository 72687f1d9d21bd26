//! HTTP/REST API layer for Axum Explorer.
//!
//! Axum-based REST API under `/api/` with bearer token authentication,
//! a `{success, data, message}` envelope, and CORS support.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod response;
pub mod router;
