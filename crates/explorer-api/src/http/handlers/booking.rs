//! Booking handlers for tourists. Single-booking routes are limited to the
//! booking's owner and admins.

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use explorer_types::booking::{
    Booking, BookingId, CreateBookingRequest, CreatePackageBookingRequest,
};

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::http::handlers::parse_id;
use crate::http::handlers::provider::CommissionsData;
use crate::http::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct BookingData {
    pub booking: Booking,
}

#[derive(Debug, Serialize)]
pub struct BookingsData {
    pub bookings: Vec<Booking>,
}

/// Load a booking and check the caller may act on it.
async fn owned_booking(state: &AppState, auth: &AuthUser, raw_id: &str) -> Result<Booking, AppError> {
    let id: BookingId = parse_id(raw_id, "booking")?;
    let booking = state.booking_service.get_booking_by_id(&id).await?;
    auth.ensure_owner_or_admin(&booking.user_id, "booking")?;
    Ok(booking)
}

/// POST /api/bookings - Book explicitly priced services.
pub async fn create_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateBookingRequest>,
) -> Result<ApiResponse<BookingData>, AppError> {
    let booking = state.booking_service.create_booking(&auth.id, body).await?;
    Ok(ApiResponse::created(BookingData { booking }))
}

/// POST /api/bookings/package - Book services priced from daily rates.
pub async fn create_package_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreatePackageBookingRequest>,
) -> Result<ApiResponse<BookingData>, AppError> {
    let booking = state
        .booking_service
        .create_package_booking(&auth.id, body)
        .await?;
    Ok(ApiResponse::created(BookingData { booking }))
}

/// GET /api/bookings/user - The caller's bookings, newest first.
pub async fn my_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<ApiResponse<BookingsData>, AppError> {
    let bookings = state.booking_service.get_user_bookings(&auth.id).await?;
    Ok(ApiResponse::success(BookingsData { bookings }))
}

/// GET /api/bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<BookingData>, AppError> {
    let booking = owned_booking(&state, &auth, &id).await?;
    Ok(ApiResponse::success(BookingData { booking }))
}

/// GET /api/bookings/{id}/commissions
pub async fn booking_commissions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<CommissionsData>, AppError> {
    let booking = owned_booking(&state, &auth, &id).await?;
    let commissions = state
        .commission_service
        .get_booking_commissions(&booking.id)
        .await?;
    Ok(ApiResponse::success(CommissionsData { commissions }))
}

/// PUT /api/bookings/{id}/confirm
pub async fn confirm_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<BookingData>, AppError> {
    let booking = owned_booking(&state, &auth, &id).await?;
    let booking = state.booking_service.confirm_booking(&booking.id).await?;
    Ok(ApiResponse::success(BookingData { booking }).with_message("Booking confirmed"))
}

/// PUT /api/bookings/{id}/cancel - Cancel and void pending commissions.
pub async fn cancel_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<ApiResponse<BookingData>, AppError> {
    let booking = owned_booking(&state, &auth, &id).await?;
    let booking = state.booking_service.cancel_booking(&booking.id).await?;
    Ok(ApiResponse::success(BookingData { booking }).with_message("Booking cancelled"))
}
