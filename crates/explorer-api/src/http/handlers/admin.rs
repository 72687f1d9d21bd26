//! Admin-only handlers: provider and user verification, booking lifecycle,
//! commission settlement and platform revenue.

use axum::extract::{Path, Query, State};
use serde::Serialize;

use explorer_types::booking::BookingId;
use explorer_types::commission::{Commission, CommissionId};
use explorer_types::provider::{ProviderId, VerificationStatus};
use explorer_types::user::{UserId, UserProfile};

use crate::http::error::AppError;
use crate::http::extractors::auth::AdminUser;
use crate::http::extractors::query::{BookingListQuery, RevenueQuery};
use crate::http::handlers::auth::UserData;
use crate::http::handlers::booking::{BookingData, BookingsData};
use crate::http::handlers::parse_id;
use crate::http::handlers::provider::{CommissionsData, ProviderData, ProvidersData, RevenueData};
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CommissionData {
    pub commission: Commission,
}

/// GET /api/admin/providers/pending
pub async fn pending_providers(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<ApiResponse<ProvidersData>, AppError> {
    let providers = state
        .provider_service
        .get_providers_by_status(VerificationStatus::Pending)
        .await?;
    Ok(ApiResponse::success(ProvidersData { providers }))
}

/// PUT /api/admin/providers/{id}/verify
pub async fn verify_provider(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<ProviderData>, AppError> {
    let id: ProviderId = parse_id(&id, "provider")?;
    let provider = state.provider_service.verify_provider(&id).await?;
    Ok(ApiResponse::success(ProviderData { provider }).with_message("Provider verified successfully"))
}

/// PUT /api/admin/providers/{id}/reject
pub async fn reject_provider(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<ProviderData>, AppError> {
    let id: ProviderId = parse_id(&id, "provider")?;
    let provider = state.provider_service.reject_provider(&id).await?;
    Ok(ApiResponse::success(ProviderData { provider }).with_message("Provider rejected successfully"))
}

/// PUT /api/admin/users/{id}/verify
pub async fn verify_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<UserData>, AppError> {
    let id: UserId = parse_id(&id, "user")?;
    let user = state.user_service.verify_user(&id).await?;
    Ok(ApiResponse::success(UserData {
        user: UserProfile::from(&user),
    })
    .with_message("User verified successfully"))
}

/// GET /api/admin/bookings?status=
pub async fn list_bookings(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<BookingListQuery>,
) -> Result<ApiResponse<BookingsData>, AppError> {
    let bookings = state.booking_service.list_bookings(query.status()?).await?;
    Ok(ApiResponse::success(BookingsData { bookings }))
}

/// PUT /api/admin/bookings/{id}/start
pub async fn start_booking(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<BookingData>, AppError> {
    let id: BookingId = parse_id(&id, "booking")?;
    let booking = state.booking_service.start_booking(&id).await?;
    Ok(ApiResponse::success(BookingData { booking }))
}

/// PUT /api/admin/bookings/{id}/complete
pub async fn complete_booking(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<BookingData>, AppError> {
    let id: BookingId = parse_id(&id, "booking")?;
    let booking = state.booking_service.complete_booking(&id).await?;
    Ok(ApiResponse::success(BookingData { booking }))
}

/// GET /api/admin/commissions/pending
pub async fn pending_commissions(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<ApiResponse<CommissionsData>, AppError> {
    let commissions = state.commission_service.get_pending_commissions().await?;
    Ok(ApiResponse::success(CommissionsData { commissions }))
}

/// PUT /api/admin/commissions/{id}/pay
pub async fn pay_commission(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<CommissionData>, AppError> {
    let id: CommissionId = parse_id(&id, "commission")?;
    let commission = state.commission_service.mark_commission_as_paid(&id).await?;
    Ok(ApiResponse::success(CommissionData { commission }).with_message("Commission marked as paid"))
}

/// PUT /api/admin/commissions/{id}/cancel
pub async fn cancel_commission(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<CommissionData>, AppError> {
    let id: CommissionId = parse_id(&id, "commission")?;
    let commission = state.commission_service.cancel_commission(&id).await?;
    Ok(ApiResponse::success(CommissionData { commission }))
}

/// GET /api/admin/revenue?from=&to= - Platform earnings over paid commissions.
pub async fn platform_revenue(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<RevenueQuery>,
) -> Result<ApiResponse<RevenueData>, AppError> {
    let range = query.range()?;
    let revenue = state.commission_service.get_platform_revenue(&range).await?;
    Ok(ApiResponse::success(RevenueData { revenue }))
}
