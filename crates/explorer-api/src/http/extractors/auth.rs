//! Bearer token authentication extractors.
//!
//! Tokens are read from `Authorization: Bearer <token>` and checked with the
//! user service's token issuer. The claims are trusted as-is; the database
//! is not consulted per request.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use explorer_types::user::{UserId, UserRole};

use crate::http::error::AppError;
use crate::state::AppState;

/// The authenticated caller, extracted from a valid bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Allow the owner of a resource or any admin.
    pub fn ensure_owner_or_admin(&self, owner: &UserId, what: &str) -> Result<(), AppError> {
        if self.is_admin() || &self.id == owner {
            Ok(())
        } else {
            tracing::warn!(user = %self.email, resource = what, "ownership check failed");
            Err(AppError::Forbidden(format!("Access denied to this {what}")))
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(parts)?;

        let claims = state.user_service.verify_token(token).map_err(|e| {
            tracing::warn!(error = %e, "rejected bearer token");
            AppError::Unauthorized("Invalid token".to_string())
        })?;

        let id = claims
            .sub
            .parse::<UserId>()
            .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))?;

        Ok(AuthUser {
            id,
            email: claims.email,
            role: claims.role,
        })
    }
}

/// An authenticated caller holding the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            tracing::warn!(user_id = %user.id, "non-admin attempted admin route");
            return Err(AppError::Forbidden(
                "Access denied. Insufficient permissions.".to_string(),
            ));
        }
        Ok(AdminUser(user))
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
fn extract_bearer(parts: &Parts) -> Result<&str, AppError> {
    let header = parts.headers.get(AUTHORIZATION).ok_or_else(|| {
        AppError::Unauthorized("Access denied. No token provided.".to_string())
    })?;

    let value = header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header encoding".to_string()))?;

    match value.strip_prefix("Bearer ").map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AppError::Unauthorized(
            "Access denied. No token provided.".to_string(),
        )),
    }
}
