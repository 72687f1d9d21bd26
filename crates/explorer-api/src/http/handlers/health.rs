//! Liveness endpoint.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: String,
    pub service: &'static str,
    pub version: &'static str,
}

/// GET /api/health - Simple health check endpoint (no auth required).
pub async fn health_check() -> Json<Health> {
    Json(Health {
        status: "OK",
        timestamp: chrono::Utc::now().to_rfc3339(),
        service: "Axum Explorer API",
        version: env!("CARGO_PKG_VERSION"),
    })
}
