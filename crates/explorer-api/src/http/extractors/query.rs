//! Query parameter extractors for list and revenue endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use explorer_types::booking::BookingStatus;
use explorer_types::commission::RevenueRange;
use explorer_types::provider::ServiceType;

use crate::http::error::AppError;

/// Query parameters for `GET /api/providers`.
#[derive(Debug, Deserialize, Default)]
pub struct ProviderListQuery {
    /// Filter by service type (hotel, car_rental, guide).
    #[serde(rename = "type")]
    pub service_type: Option<String>,
    /// Only verified providers (default true).
    pub verified: Option<bool>,
}

impl ProviderListQuery {
    pub fn service_type(&self) -> Result<Option<ServiceType>, AppError> {
        self.service_type
            .as_deref()
            .map(|s| s.parse::<ServiceType>().map_err(AppError::Validation))
            .transpose()
    }

    pub fn verified_only(&self) -> bool {
        self.verified.unwrap_or(true)
    }
}

/// Query parameters for `GET /api/admin/bookings`.
#[derive(Debug, Deserialize, Default)]
pub struct BookingListQuery {
    pub status: Option<String>,
}

impl BookingListQuery {
    pub fn status(&self) -> Result<Option<BookingStatus>, AppError> {
        self.status
            .as_deref()
            .map(|s| s.parse::<BookingStatus>().map_err(AppError::Validation))
            .transpose()
    }
}

/// Query parameters for revenue endpoints. Both bounds are optional and
/// accept RFC 3339 timestamps or plain `YYYY-MM-DD` dates.
#[derive(Debug, Deserialize, Default)]
pub struct RevenueQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl RevenueQuery {
    pub fn range(&self) -> Result<RevenueRange, AppError> {
        Ok(RevenueRange {
            from: self
                .from
                .as_deref()
                .map(|s| parse_bound(s, false))
                .transpose()
                .map_err(AppError::Validation)?,
            to: self
                .to
                .as_deref()
                .map(|s| parse_bound(s, true))
                .transpose()
                .map_err(AppError::Validation)?,
        })
    }
}

/// Parse a range bound. A bare date as the upper bound covers the whole day.
pub fn parse_bound(value: &str, end_of_day: bool) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("invalid date: '{value}'"))?;
    let time = if end_of_day {
        date.and_hms_micro_opt(23, 59, 59, 999_999)
    } else {
        date.and_hms_opt(0, 0, 0)
    };
    time.map(|t| t.and_utc())
        .ok_or_else(|| format!("invalid date: '{value}'"))
}
