//! Axum router configuration with middleware.
//!
//! All routes are under `/api/`.
//! Middleware: CORS (origin from config), request tracing.

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post, put};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server.cors_origin);

    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/profile", get(handlers::auth::profile));

    let provider_routes = Router::new()
        .route("/", get(handlers::provider::list_providers))
        .route("/register", post(handlers::provider::register_provider))
        .route("/profile/me", get(handlers::provider::my_profile))
        .route(
            "/profile/me/commissions",
            get(handlers::provider::my_commissions),
        )
        .route("/profile/me/revenue", get(handlers::provider::my_revenue))
        .route("/{id}", get(handlers::provider::get_provider));

    let booking_routes = Router::new()
        .route("/", post(handlers::booking::create_booking))
        .route("/package", post(handlers::booking::create_package_booking))
        .route("/user", get(handlers::booking::my_bookings))
        .route("/{id}", get(handlers::booking::get_booking))
        .route(
            "/{id}/commissions",
            get(handlers::booking::booking_commissions),
        )
        .route("/{id}/confirm", put(handlers::booking::confirm_booking))
        .route("/{id}/cancel", put(handlers::booking::cancel_booking));

    let admin_routes = Router::new()
        // Providers and users
        .route(
            "/providers/pending",
            get(handlers::admin::pending_providers),
        )
        .route(
            "/providers/{id}/verify",
            put(handlers::admin::verify_provider),
        )
        .route(
            "/providers/{id}/reject",
            put(handlers::admin::reject_provider),
        )
        .route("/users/{id}/verify", put(handlers::admin::verify_user))
        // Bookings
        .route("/bookings", get(handlers::admin::list_bookings))
        .route("/bookings/{id}/start", put(handlers::admin::start_booking))
        .route(
            "/bookings/{id}/complete",
            put(handlers::admin::complete_booking),
        )
        // Commissions and revenue
        .route(
            "/commissions/pending",
            get(handlers::admin::pending_commissions),
        )
        .route(
            "/commissions/{id}/pay",
            put(handlers::admin::pay_commission),
        )
        .route(
            "/commissions/{id}/cancel",
            put(handlers::admin::cancel_commission),
        )
        .route("/revenue", get(handlers::admin::platform_revenue));

    let api_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/auth", auth_routes)
        .nest("/providers", provider_routes)
        .nest("/bookings", booking_routes)
        .nest("/admin", admin_routes);

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for a single configured origin, or any origin for `*`.
fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = if origin.trim() == "*" {
        AllowOrigin::from(Any)
    } else {
        match HeaderValue::from_str(origin.trim()) {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::warn!(origin, "invalid CORS origin, allowing any origin");
                AllowOrigin::from(Any)
            }
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}
