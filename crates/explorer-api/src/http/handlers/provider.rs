//! Service provider handlers: registration, discovery, and a provider's own
//! profile, commissions and revenue.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Serialize;

use explorer_types::commission::Commission;
use explorer_types::provider::{ProviderId, RegisterProviderRequest, ServiceProvider};

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::http::extractors::query::{ProviderListQuery, RevenueQuery};
use crate::http::handlers::parse_id;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProviderData {
    pub provider: ServiceProvider,
}

#[derive(Debug, Serialize)]
pub struct ProvidersData {
    pub providers: Vec<ServiceProvider>,
}

#[derive(Debug, Serialize)]
pub struct CommissionsData {
    pub commissions: Vec<Commission>,
}

#[derive(Debug, Serialize)]
pub struct RevenueData {
    pub revenue: f64,
}

/// POST /api/providers/register - Create the caller's provider profile.
pub async fn register_provider(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<RegisterProviderRequest>,
) -> Result<ApiResponse<ProviderData>, AppError> {
    let provider = state
        .provider_service
        .register_provider(&auth.id, body)
        .await?;
    Ok(ApiResponse::created(ProviderData { provider })
        .with_message("Service provider registered. Awaiting verification."))
}

/// GET /api/providers?type=&verified= - Discover active providers.
pub async fn list_providers(
    State(state): State<AppState>,
    Query(query): Query<ProviderListQuery>,
) -> Result<ApiResponse<ProvidersData>, AppError> {
    let providers = state
        .provider_service
        .list_providers(query.service_type()?, query.verified_only())
        .await?;
    Ok(ApiResponse::success(ProvidersData { providers }))
}

/// GET /api/providers/{id}
pub async fn get_provider(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<ProviderData>, AppError> {
    let id: ProviderId = parse_id(&id, "provider")?;
    let provider = state.provider_service.get_provider_by_id(&id).await?;
    Ok(ApiResponse::success(ProviderData { provider }))
}

/// GET /api/providers/profile/me
pub async fn my_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<ApiResponse<ProviderData>, AppError> {
    let provider = state
        .provider_service
        .get_provider_by_user_id(&auth.id)
        .await?;
    Ok(ApiResponse::success(ProviderData { provider }))
}

/// GET /api/providers/profile/me/commissions
pub async fn my_commissions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<ApiResponse<CommissionsData>, AppError> {
    let provider = state
        .provider_service
        .get_provider_by_user_id(&auth.id)
        .await?;
    let commissions = state
        .commission_service
        .get_provider_commissions(&provider.id)
        .await?;
    Ok(ApiResponse::success(CommissionsData { commissions }))
}

/// GET /api/providers/profile/me/revenue?from=&to= - Paid provider earnings.
pub async fn my_revenue(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<RevenueQuery>,
) -> Result<ApiResponse<RevenueData>, AppError> {
    let range = query.range()?;
    let provider = state
        .provider_service
        .get_provider_by_user_id(&auth.id)
        .await?;
    let revenue = state
        .commission_service
        .get_provider_revenue(&provider.id, &range)
        .await?;
    Ok(ApiResponse::success(RevenueData { revenue }))
}
