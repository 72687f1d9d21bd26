use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::booking::BookingId;
use crate::error::CommissionError;
use crate::provider::{ProviderId, ServiceType};

/// Unique identifier for a commission record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommissionId(pub Uuid);

impl CommissionId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for CommissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CommissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CommissionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Settlement state of a commission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommissionStatus {
    Pending,
    Paid,
    Cancelled,
}

impl fmt::Display for CommissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommissionStatus::Pending => write!(f, "pending"),
            CommissionStatus::Paid => write!(f, "paid"),
            CommissionStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for CommissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(CommissionStatus::Pending),
            "paid" => Ok(CommissionStatus::Paid),
            "cancelled" => Ok(CommissionStatus::Cancelled),
            other => Err(format!("invalid commission status: '{other}'")),
        }
    }
}

/// The platform's share of a single booked service.
///
/// One record exists per booked service. `provider_earnings` and
/// `platform_earnings` always add up to `amount`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commission {
    pub id: CommissionId,
    pub booking_id: BookingId,
    pub service_provider_id: ProviderId,
    pub service_type: ServiceType,
    /// Price of the booked service this record derives from.
    pub amount: f64,
    pub commission_rate: f64,
    pub provider_earnings: f64,
    pub platform_earnings: f64,
    pub status: CommissionStatus,
    pub payment_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Commission {
    /// Split `amount` between platform and provider at `commission_rate`.
    pub fn create(
        booking_id: BookingId,
        service_provider_id: ProviderId,
        service_type: ServiceType,
        amount: f64,
        commission_rate: f64,
    ) -> Self {
        let platform_earnings = amount * commission_rate;
        let provider_earnings = amount - platform_earnings;
        let now = Utc::now();

        Self {
            id: CommissionId::new(),
            booking_id,
            service_provider_id,
            service_type,
            amount,
            commission_rate,
            provider_earnings,
            platform_earnings,
            status: CommissionStatus::Pending,
            payment_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Settle the commission. Only pending records can be paid.
    pub fn mark_as_paid(&mut self, now: DateTime<Utc>) -> Result<(), CommissionError> {
        if self.status != CommissionStatus::Pending {
            return Err(CommissionError::InvalidTransition {
                from: self.status,
                to: CommissionStatus::Paid,
            });
        }
        self.status = CommissionStatus::Paid;
        self.payment_date = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Void the commission. Paid records cannot be cancelled.
    pub fn cancel(&mut self) -> Result<(), CommissionError> {
        if self.status != CommissionStatus::Pending {
            return Err(CommissionError::InvalidTransition {
                from: self.status,
                to: CommissionStatus::Cancelled,
            });
        }
        self.status = CommissionStatus::Cancelled;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Per-service-type platform commission rates (fractions, not percentages).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommissionRates {
    pub hotel: f64,
    pub car_rental: f64,
    pub guide: f64,
}

impl CommissionRates {
    pub const DEFAULT_HOTEL: f64 = 0.125;
    pub const DEFAULT_CAR_RENTAL: f64 = 0.10;
    pub const DEFAULT_GUIDE: f64 = 0.10;

    pub fn rate_for(&self, service_type: ServiceType) -> f64 {
        match service_type {
            ServiceType::Hotel => self.hotel,
            ServiceType::CarRental => self.car_rental,
            ServiceType::Guide => self.guide,
        }
    }

    /// Allowed band for each service type's rate.
    pub fn bounds(service_type: ServiceType) -> (f64, f64) {
        match service_type {
            ServiceType::Hotel => (0.10, 0.15),
            ServiceType::CarRental => (0.08, 0.12),
            ServiceType::Guide => (0.10, 0.10),
        }
    }

    /// Check every rate against its allowed band.
    pub fn validate(&self) -> Result<(), String> {
        for service_type in ServiceType::ALL {
            let rate = self.rate_for(service_type);
            let (min, max) = Self::bounds(service_type);
            if !rate.is_finite() || rate < min - f64::EPSILON || rate > max + f64::EPSILON {
                return Err(format!(
                    "{service_type} commission rate {rate} outside [{min}, {max}]"
                ));
            }
        }
        Ok(())
    }
}

impl Default for CommissionRates {
    fn default() -> Self {
        Self {
            hotel: Self::DEFAULT_HOTEL,
            car_rental: Self::DEFAULT_CAR_RENTAL,
            guide: Self::DEFAULT_GUIDE,
        }
    }
}

/// Optional inclusive payment-date window for revenue queries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl RevenueRange {
    pub fn is_valid(&self) -> bool {
        match (self.from, self.to) {
            (Some(from), Some(to)) => from <= to,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hotel_commission(amount: f64) -> Commission {
        Commission::create(
            BookingId::new(),
            ProviderId::new(),
            ServiceType::Hotel,
            amount,
            CommissionRates::default().rate_for(ServiceType::Hotel),
        )
    }

    #[test]
    fn test_hotel_split_example() {
        let c = hotel_commission(10_000.0);
        assert!((c.platform_earnings - 1250.0).abs() < 1e-9);
        assert!((c.provider_earnings - 8750.0).abs() < 1e-9);
        assert_eq!(c.status, CommissionStatus::Pending);
        assert!(c.payment_date.is_none());
    }

    #[test]
    fn test_earnings_sum_to_amount() {
        for amount in [0.0, 0.01, 333.33, 1999.99, 123_456.78] {
            for service_type in ServiceType::ALL {
                let rate = CommissionRates::default().rate_for(service_type);
                let c = Commission::create(
                    BookingId::new(),
                    ProviderId::new(),
                    service_type,
                    amount,
                    rate,
                );
                assert!((c.provider_earnings + c.platform_earnings - amount).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_mark_as_paid_stamps_date() {
        let mut c = hotel_commission(500.0);
        let now = Utc::now();
        c.mark_as_paid(now).unwrap();
        assert_eq!(c.status, CommissionStatus::Paid);
        assert_eq!(c.payment_date, Some(now));
    }

    #[test]
    fn test_paid_commission_cannot_be_cancelled_or_repaid() {
        let mut c = hotel_commission(500.0);
        c.mark_as_paid(Utc::now()).unwrap();
        assert!(matches!(
            c.cancel(),
            Err(CommissionError::InvalidTransition { .. })
        ));
        assert!(c.mark_as_paid(Utc::now()).is_err());
    }

    #[test]
    fn test_cancelled_commission_cannot_be_paid() {
        let mut c = hotel_commission(500.0);
        c.cancel().unwrap();
        assert_eq!(c.status, CommissionStatus::Cancelled);
        assert!(c.mark_as_paid(Utc::now()).is_err());
    }

    #[test]
    fn test_default_rates() {
        let rates = CommissionRates::default();
        assert_eq!(rates.rate_for(ServiceType::Hotel), 0.125);
        assert_eq!(rates.rate_for(ServiceType::CarRental), 0.10);
        assert_eq!(rates.rate_for(ServiceType::Guide), 0.10);
        assert!(rates.validate().is_ok());
    }

    #[test]
    fn test_rates_outside_bounds_rejected() {
        let rates = CommissionRates {
            hotel: 0.5,
            ..Default::default()
        };
        let err = rates.validate().unwrap_err();
        assert!(err.contains("hotel"));
    }

    #[test]
    fn test_revenue_range_validity() {
        let now = Utc::now();
        assert!(RevenueRange::default().is_valid());
        assert!(RevenueRange { from: Some(now), to: Some(now) }.is_valid());
        assert!(!RevenueRange {
            from: Some(now),
            to: Some(now - chrono::Duration::days(1)),
        }
        .is_valid());
    }
}
