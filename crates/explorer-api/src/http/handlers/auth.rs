//! Account registration, login and profile handlers.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use explorer_types::user::{AuthSession, LoginRequest, RegisterUserRequest, UserProfile};

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionData {
    pub user: UserProfile,
    pub token: String,
}

impl From<AuthSession> for SessionData {
    fn from(session: AuthSession) -> Self {
        Self {
            user: UserProfile::from(&session.user),
            token: session.token,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserData {
    pub user: UserProfile,
}

/// POST /api/auth/register - Create a tourist or provider account.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterUserRequest>,
) -> Result<ApiResponse<SessionData>, AppError> {
    let session = state.user_service.register_user(body).await?;
    Ok(ApiResponse::created(session.into()))
}

/// POST /api/auth/login - Exchange credentials for a token.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiResponse<SessionData>, AppError> {
    let session = state
        .user_service
        .authenticate_user(&body.email, &body.password)
        .await?;
    Ok(ApiResponse::success(session.into()))
}

/// GET /api/auth/profile - The caller's own profile.
pub async fn profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<ApiResponse<UserData>, AppError> {
    let user = state.user_service.get_user_profile(&auth.id).await?;
    Ok(ApiResponse::success(UserData {
        user: UserProfile::from(&user),
    }))
}
