//! Commission repository trait definition.

use explorer_types::booking::BookingId;
use explorer_types::commission::{Commission, CommissionId, CommissionStatus, RevenueRange};
use explorer_types::error::RepositoryError;
use explorer_types::provider::ProviderId;

/// Filter criteria for listing commissions.
#[derive(Debug, Clone, Default)]
pub struct CommissionFilter {
    pub booking_id: Option<BookingId>,
    pub provider_id: Option<ProviderId>,
    pub status: Option<CommissionStatus>,
}

/// Repository trait for commission persistence and revenue aggregation.
pub trait CommissionRepository: Send + Sync {
    fn create(
        &self,
        commission: &Commission,
    ) -> impl std::future::Future<Output = Result<Commission, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &CommissionId,
    ) -> impl std::future::Future<Output = Result<Option<Commission>, RepositoryError>> + Send;

    /// List commissions matching the filter, oldest first.
    fn list(
        &self,
        filter: CommissionFilter,
    ) -> impl std::future::Future<Output = Result<Vec<Commission>, RepositoryError>> + Send;

    /// Store the status, payment date and `updated_at` of `commission`, but
    /// only while the stored status is still `from`. Returns `None` when no
    /// row matched (missing commission or a concurrent status change).
    fn update_status(
        &self,
        commission: &Commission,
        from: CommissionStatus,
    ) -> impl std::future::Future<Output = Result<Option<Commission>, RepositoryError>> + Send;

    /// Sum of `platform_earnings` over paid commissions whose payment date
    /// falls inside the (inclusive) range.
    fn platform_earnings(
        &self,
        range: &RevenueRange,
    ) -> impl std::future::Future<Output = Result<f64, RepositoryError>> + Send;

    /// Sum of `provider_earnings` over one provider's paid commissions whose
    /// payment date falls inside the (inclusive) range.
    fn provider_earnings(
        &self,
        provider_id: &ProviderId,
        range: &RevenueRange,
    ) -> impl std::future::Future<Output = Result<f64, RepositoryError>> + Send;
}
