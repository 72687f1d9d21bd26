//! Commission service.
//!
//! Computes the platform's share of each booked service, settles and voids
//! commission records, and aggregates revenue over paid records.

use chrono::Utc;
use explorer_types::booking::BookingId;
use explorer_types::commission::{
    Commission, CommissionId, CommissionRates, CommissionStatus, RevenueRange,
};
use explorer_types::error::{CommissionError, RepositoryError};
use explorer_types::provider::{ProviderId, ServiceType};

use crate::repository::commission::{CommissionFilter, CommissionRepository};

fn storage(e: RepositoryError) -> CommissionError {
    CommissionError::StorageError(e.to_string())
}

/// Service owning commission rates and commission record transitions.
pub struct CommissionService<C: CommissionRepository> {
    repo: C,
    rates: CommissionRates,
}

impl<C: CommissionRepository> CommissionService<C> {
    pub fn new(repo: C, rates: CommissionRates) -> Self {
        Self { repo, rates }
    }

    pub fn rates(&self) -> &CommissionRates {
        &self.rates
    }

    /// Configured platform rate for a service type.
    pub fn rate_for(&self, service_type: ServiceType) -> f64 {
        self.rates.rate_for(service_type)
    }

    /// Build a pending commission record without persisting it.
    pub fn prepare_commission(
        &self,
        booking_id: &BookingId,
        provider_id: &ProviderId,
        service_type: ServiceType,
        amount: f64,
    ) -> Commission {
        Commission::create(
            booking_id.clone(),
            provider_id.clone(),
            service_type,
            amount,
            self.rate_for(service_type),
        )
    }

    /// Build and persist a pending commission record.
    pub async fn create_commission(
        &self,
        booking_id: &BookingId,
        provider_id: &ProviderId,
        service_type: ServiceType,
        amount: f64,
    ) -> Result<Commission, CommissionError> {
        let commission = self.prepare_commission(booking_id, provider_id, service_type, amount);
        let commission = self.repo.create(&commission).await.map_err(storage)?;
        tracing::info!(
            commission_id = %commission.id,
            booking_id = %booking_id,
            platform_earnings = commission.platform_earnings,
            "commission created"
        );
        Ok(commission)
    }

    pub async fn get_commission(&self, id: &CommissionId) -> Result<Commission, CommissionError> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or(CommissionError::NotFound)
    }

    /// Settle a pending commission, stamping the payment date.
    pub async fn mark_commission_as_paid(
        &self,
        id: &CommissionId,
    ) -> Result<Commission, CommissionError> {
        let commission = self
            .transition(id, |c| c.mark_as_paid(Utc::now()))
            .await?;
        tracing::info!(commission_id = %id, "commission marked as paid");
        Ok(commission)
    }

    pub async fn cancel_commission(&self, id: &CommissionId) -> Result<Commission, CommissionError> {
        let commission = self.transition(id, Commission::cancel).await?;
        tracing::info!(commission_id = %id, "commission cancelled");
        Ok(commission)
    }

    /// Apply `apply` to the stored commission and persist it only while the
    /// stored status is unchanged, so a commission voided by a booking
    /// cancellation cannot be paid afterwards.
    async fn transition(
        &self,
        id: &CommissionId,
        apply: impl Fn(&mut Commission) -> Result<(), CommissionError>,
    ) -> Result<Commission, CommissionError> {
        loop {
            let mut commission = self.get_commission(id).await?;
            let from = commission.status;
            apply(&mut commission)?;

            if let Some(commission) = self
                .repo
                .update_status(&commission, from)
                .await
                .map_err(storage)?
            {
                return Ok(commission);
            }
            tracing::debug!(commission_id = %id, %from, "commission changed concurrently, re-reading");
        }
    }

    pub async fn get_provider_commissions(
        &self,
        provider_id: &ProviderId,
    ) -> Result<Vec<Commission>, CommissionError> {
        self.list(CommissionFilter {
            provider_id: Some(provider_id.clone()),
            ..Default::default()
        })
        .await
    }

    pub async fn get_booking_commissions(
        &self,
        booking_id: &BookingId,
    ) -> Result<Vec<Commission>, CommissionError> {
        self.list(CommissionFilter {
            booking_id: Some(booking_id.clone()),
            ..Default::default()
        })
        .await
    }

    pub async fn get_pending_commissions(&self) -> Result<Vec<Commission>, CommissionError> {
        self.list(CommissionFilter {
            status: Some(CommissionStatus::Pending),
            ..Default::default()
        })
        .await
    }

    async fn list(&self, filter: CommissionFilter) -> Result<Vec<Commission>, CommissionError> {
        tracing::debug!(?filter, "listing commissions");
        self.repo.list(filter).await.map_err(storage)
    }

    /// Total platform earnings over paid commissions in the range.
    pub async fn get_platform_revenue(&self, range: &RevenueRange) -> Result<f64, CommissionError> {
        if !range.is_valid() {
            return Err(CommissionError::InvalidRange);
        }
        self.repo.platform_earnings(range).await.map_err(storage)
    }

    /// Total provider earnings over one provider's paid commissions in the range.
    pub async fn get_provider_revenue(
        &self,
        provider_id: &ProviderId,
        range: &RevenueRange,
    ) -> Result<f64, CommissionError> {
        if !range.is_valid() {
            return Err(CommissionError::InvalidRange);
        }
        self.repo
            .provider_earnings(provider_id, range)
            .await
            .map_err(storage)
    }
}
