//! Booking service.
//!
//! Creates bookings (explicitly priced or priced from daily rates), writes
//! each booking together with one commission per booked service, and drives
//! the booking lifecycle.

use std::sync::Arc;

use chrono::Utc;
use explorer_types::booking::{
    BookedService, Booking, BookingId, BookingStatus, CreateBookingRequest,
    CreatePackageBookingRequest, billable_days,
};
use explorer_types::commission::{Commission, CommissionRates};
use explorer_types::config::PricingConfig;
use explorer_types::error::{BookingError, RepositoryError};
use explorer_types::user::UserId;

use crate::repository::SortOrder;
use crate::repository::booking::{BookingFilter, BookingRepository};
use crate::repository::commission::CommissionRepository;
use crate::service::commission::CommissionService;

fn storage(e: RepositoryError) -> BookingError {
    BookingError::StorageError(e.to_string())
}

/// Service orchestrating booking creation and status transitions.
///
/// Commission records are prepared by the shared `CommissionService` and
/// persisted by the booking repository in the same transaction as the
/// booking itself.
pub struct BookingService<B: BookingRepository, C: CommissionRepository> {
    repo: B,
    commissions: Arc<CommissionService<C>>,
    pricing: PricingConfig,
}

impl<B: BookingRepository, C: CommissionRepository> BookingService<B, C> {
    pub fn new(repo: B, commissions: Arc<CommissionService<C>>, pricing: PricingConfig) -> Self {
        Self {
            repo,
            commissions,
            pricing,
        }
    }

    fn rates(&self) -> &CommissionRates {
        self.commissions.rates()
    }

    /// Validate and persist a booking with one pending commission per service.
    pub async fn create_booking(
        &self,
        user_id: &UserId,
        request: CreateBookingRequest,
    ) -> Result<Booking, BookingError> {
        let booking = Booking::create(user_id.clone(), request, self.rates())?;

        let commissions: Vec<Commission> = booking
            .services
            .iter()
            .map(|s| {
                self.commissions.prepare_commission(
                    &booking.id,
                    &s.service_provider_id,
                    s.service_type(),
                    s.price,
                )
            })
            .collect();

        let booking = self
            .repo
            .create_with_commissions(&booking, &commissions)
            .await
            .map_err(storage)?;

        tracing::info!(
            booking_id = %booking.id,
            user_id = %user_id,
            services = booking.services.len(),
            total_cost = booking.total_cost,
            "booking created"
        );
        Ok(booking)
    }

    /// Price each service from its rate and dates, then create the booking.
    ///
    /// A service's price is its daily rate (nightly for hotels) times the
    /// number of started days it spans. Missing rates fall back to the
    /// configured defaults. The booking runs from the first service's start
    /// to the last service's end.
    pub async fn create_package_booking(
        &self,
        user_id: &UserId,
        request: CreatePackageBookingRequest,
    ) -> Result<Booking, BookingError> {
        let (Some(first), Some(last)) = (request.services.first(), request.services.last()) else {
            return Err(BookingError::Validation(
                "at least one service is required".to_string(),
            ));
        };
        let start_date = first.start_date;
        let end_date = last.end_date;

        let mut services = Vec::with_capacity(request.services.len());
        for item in request.services {
            if item.start_date >= item.end_date {
                return Err(BookingError::InvalidDateRange);
            }
            let rate = item
                .details
                .rate()
                .unwrap_or_else(|| self.pricing.default_rate(item.details.service_type()));
            let days = billable_days(item.start_date, item.end_date);
            services.push(BookedService {
                service_provider_id: item.service_provider_id,
                details: item.details,
                price: rate * days as f64,
            });
        }

        self.create_booking(
            user_id,
            CreateBookingRequest {
                package_name: request.package_name,
                services,
                start_date,
                end_date,
                traveler_count: request.traveler_count,
                special_requests: request.special_requests,
            },
        )
        .await
    }

    pub async fn get_booking_by_id(&self, id: &BookingId) -> Result<Booking, BookingError> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or(BookingError::NotFound)
    }

    /// A user's bookings, newest first.
    pub async fn get_user_bookings(&self, user_id: &UserId) -> Result<Vec<Booking>, BookingError> {
        self.repo
            .list(BookingFilter {
                user_id: Some(user_id.clone()),
                status: None,
                sort_order: Some(SortOrder::Desc),
            })
            .await
            .map_err(storage)
    }

    pub async fn list_bookings(
        &self,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, BookingError> {
        self.repo
            .list(BookingFilter {
                user_id: None,
                status,
                sort_order: Some(SortOrder::Desc),
            })
            .await
            .map_err(storage)
    }

    pub async fn confirm_booking(&self, id: &BookingId) -> Result<Booking, BookingError> {
        self.transition(id, Booking::confirm).await
    }

    pub async fn start_booking(&self, id: &BookingId) -> Result<Booking, BookingError> {
        self.transition(id, Booking::start).await
    }

    pub async fn complete_booking(&self, id: &BookingId) -> Result<Booking, BookingError> {
        self.transition(id, Booking::complete).await
    }

    /// Cancel a booking and void its pending commissions.
    ///
    /// Completed and already-cancelled bookings cannot be cancelled.
    pub async fn cancel_booking(&self, id: &BookingId) -> Result<Booking, BookingError> {
        loop {
            let mut booking = self.get_booking_by_id(id).await?;
            let from = booking.status;
            booking.cancel()?;

            let cancelled = self
                .repo
                .cancel_with_commissions(id, from, booking.updated_at)
                .await
                .map_err(storage)?;

            if let Some(booking) = cancelled {
                tracing::info!(booking_id = %id, %from, "booking cancelled");
                return Ok(booking);
            }
            tracing::debug!(booking_id = %id, %from, "booking changed during cancel, re-reading");
        }
    }

    /// Apply `apply` to the stored booking and persist the new status only if
    /// the stored status is unchanged. A lost race re-reads the booking, so
    /// the transition is re-checked against what the winner wrote. Statuses
    /// only move forward, so the loop ends.
    async fn transition(
        &self,
        id: &BookingId,
        apply: fn(&mut Booking) -> Result<(), BookingError>,
    ) -> Result<Booking, BookingError> {
        loop {
            let mut booking = self.get_booking_by_id(id).await?;
            let from = booking.status;
            apply(&mut booking)?;

            let updated = self
                .repo
                .update_status(id, from, booking.status, Utc::now())
                .await
                .map_err(storage)?;

            if let Some(booking) = updated {
                tracing::info!(booking_id = %id, %from, to = %booking.status, "booking status changed");
                return Ok(booking);
            }
            tracing::debug!(booking_id = %id, %from, "booking changed concurrently, re-reading");
        }
    }
}
