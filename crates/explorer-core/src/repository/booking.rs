//! Booking repository trait definition.

use chrono::{DateTime, Utc};
use explorer_types::booking::{Booking, BookingId, BookingStatus};
use explorer_types::commission::Commission;
use explorer_types::error::RepositoryError;
use explorer_types::user::UserId;

use super::SortOrder;

/// Filter criteria for listing bookings.
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub user_id: Option<UserId>,
    pub status: Option<BookingStatus>,
    pub sort_order: Option<SortOrder>,
}

/// Repository trait for booking persistence.
///
/// Bookings own their commission rows: creation and cancellation touch both
/// tables and must do so atomically.
pub trait BookingRepository: Send + Sync {
    /// Persist a booking together with its commission rows in one transaction.
    fn create_with_commissions(
        &self,
        booking: &Booking,
        commissions: &[Commission],
    ) -> impl std::future::Future<Output = Result<Booking, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &BookingId,
    ) -> impl std::future::Future<Output = Result<Option<Booking>, RepositoryError>> + Send;

    fn list(
        &self,
        filter: BookingFilter,
    ) -> impl std::future::Future<Output = Result<Vec<Booking>, RepositoryError>> + Send;

    /// Move a booking from `from` to `to`. The write only applies while the
    /// stored status is still `from`; returns `None` when no row matched
    /// (missing booking or a concurrent status change).
    fn update_status(
        &self,
        id: &BookingId,
        from: BookingStatus,
        to: BookingStatus,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<Option<Booking>, RepositoryError>> + Send;

    /// Cancel a booking whose stored status is still `from`, together with
    /// its still-pending commissions, in one transaction. Returns `None` when
    /// no row matched.
    fn cancel_with_commissions(
        &self,
        id: &BookingId,
        from: BookingStatus,
        at: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<Option<Booking>, RepositoryError>> + Send;
}
