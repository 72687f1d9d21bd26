use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::commission::CommissionRates;
use crate::error::BookingError;
use crate::provider::{ProviderId, ServiceType};
use crate::user::UserId;

/// Unique identifier for a booking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(pub Uuid);

impl BookingId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookingId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Booking lifecycle state.
///
/// `pending -> confirmed -> in_progress -> completed`, with `cancelled`
/// reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::InProgress => write!(f, "in_progress"),
            BookingStatus::Completed => write!(f, "completed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "in_progress" => Ok(BookingStatus::InProgress),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(format!("invalid booking status: '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HotelDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_type: Option<String>,
    /// Price per night.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rooms: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarRentalDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuideDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tour_name: Option<String>,
}

/// Type-specific details of a booked service, tagged by `service_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "service_type", rename_all = "snake_case")]
pub enum ServiceDetails {
    Hotel(HotelDetails),
    CarRental(CarRentalDetails),
    Guide(GuideDetails),
}

impl ServiceDetails {
    pub fn service_type(&self) -> ServiceType {
        match self {
            ServiceDetails::Hotel(_) => ServiceType::Hotel,
            ServiceDetails::CarRental(_) => ServiceType::CarRental,
            ServiceDetails::Guide(_) => ServiceType::Guide,
        }
    }

    /// Per-day (per-night for hotels) rate carried in the details, if any.
    pub fn rate(&self) -> Option<f64> {
        match self {
            ServiceDetails::Hotel(d) => d.room_rate,
            ServiceDetails::CarRental(d) => d.daily_rate,
            ServiceDetails::Guide(d) => d.daily_rate,
        }
    }
}

/// One line of a booking: a service reserved from a provider at a price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookedService {
    pub service_provider_id: ProviderId,
    pub details: ServiceDetails,
    pub price: f64,
}

impl BookedService {
    pub fn service_type(&self) -> ServiceType {
        self.details.service_type()
    }
}

/// A tourist's reservation of a package of services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub user_id: UserId,
    pub package_name: String,
    pub services: Vec<BookedService>,
    /// Sum of service prices at creation time.
    pub total_cost: f64,
    /// Platform share across all services at the rates in force at creation.
    pub commission_earned: f64,
    pub status: BookingStatus,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub traveler_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Validate the request and build a `pending` booking with computed totals.
    pub fn create(
        user_id: UserId,
        request: CreateBookingRequest,
        rates: &CommissionRates,
    ) -> Result<Self, BookingError> {
        request.validate()?;

        let total_cost = request.services.iter().map(|s| s.price).sum();
        let commission_earned = request
            .services
            .iter()
            .map(|s| s.price * rates.rate_for(s.service_type()))
            .sum();
        let now = Utc::now();

        Ok(Self {
            id: BookingId::new(),
            user_id,
            package_name: request.package_name.trim().to_string(),
            services: request.services,
            total_cost,
            commission_earned,
            status: BookingStatus::Pending,
            start_date: request.start_date,
            end_date: request.end_date,
            traveler_count: request.traveler_count,
            special_requests: request.special_requests,
            created_at: now,
            updated_at: now,
        })
    }

    fn transition(
        &mut self,
        allowed_from: &[BookingStatus],
        to: BookingStatus,
    ) -> Result<(), BookingError> {
        if !allowed_from.contains(&self.status) {
            return Err(BookingError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn confirm(&mut self) -> Result<(), BookingError> {
        self.transition(&[BookingStatus::Pending], BookingStatus::Confirmed)
    }

    pub fn start(&mut self) -> Result<(), BookingError> {
        self.transition(&[BookingStatus::Confirmed], BookingStatus::InProgress)
    }

    pub fn complete(&mut self) -> Result<(), BookingError> {
        self.transition(
            &[BookingStatus::Confirmed, BookingStatus::InProgress],
            BookingStatus::Completed,
        )
    }

    /// Completed and already-cancelled bookings cannot be cancelled.
    pub fn cancel(&mut self) -> Result<(), BookingError> {
        self.transition(
            &[
                BookingStatus::Pending,
                BookingStatus::Confirmed,
                BookingStatus::InProgress,
            ],
            BookingStatus::Cancelled,
        )
    }
}

/// Request to book an explicitly priced set of services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub package_name: String,
    pub services: Vec<BookedService>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub traveler_count: u32,
    #[serde(default)]
    pub special_requests: Option<String>,
}

impl CreateBookingRequest {
    pub fn validate(&self) -> Result<(), BookingError> {
        if self.start_date >= self.end_date {
            return Err(BookingError::InvalidDateRange);
        }
        if self.traveler_count < 1 {
            return Err(BookingError::InvalidTravelerCount);
        }
        if self.package_name.trim().is_empty() {
            return Err(BookingError::Validation(
                "package name must not be empty".to_string(),
            ));
        }
        if self.services.is_empty() {
            return Err(BookingError::Validation(
                "at least one service is required".to_string(),
            ));
        }
        if let Some(bad) = self
            .services
            .iter()
            .find(|s| !s.price.is_finite() || s.price < 0.0)
        {
            return Err(BookingError::Validation(format!(
                "invalid price {} for provider {}",
                bad.price, bad.service_provider_id
            )));
        }
        Ok(())
    }
}

/// One service in a package booking, priced from its rate and dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageServiceRequest {
    pub service_provider_id: ProviderId,
    pub details: ServiceDetails,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Request to book a package whose prices are derived from daily rates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePackageBookingRequest {
    pub package_name: String,
    pub services: Vec<PackageServiceRequest>,
    pub traveler_count: u32,
    #[serde(default)]
    pub special_requests: Option<String>,
}

/// Whole days billed for a stay, rounding any partial day up.
pub fn billable_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    const SECONDS_PER_DAY: i64 = 86_400;
    let seconds = (end - start).num_seconds();
    if seconds <= 0 {
        return 0;
    }
    (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, d, 12, 0, 0).unwrap()
    }

    fn hotel_line(price: f64) -> BookedService {
        BookedService {
            service_provider_id: ProviderId::new(),
            details: ServiceDetails::Hotel(HotelDetails {
                room_type: Some("double".to_string()),
                room_rate: Some(5000.0),
                rooms: Some(1),
            }),
            price,
        }
    }

    fn guide_line(price: f64) -> BookedService {
        BookedService {
            service_provider_id: ProviderId::new(),
            details: ServiceDetails::Guide(GuideDetails::default()),
            price,
        }
    }

    fn request(services: Vec<BookedService>) -> CreateBookingRequest {
        CreateBookingRequest {
            package_name: "Northern circuit".to_string(),
            services,
            start_date: day(1),
            end_date: day(3),
            traveler_count: 2,
            special_requests: None,
        }
    }

    #[test]
    fn test_create_computes_totals() {
        let booking = Booking::create(
            UserId::new(),
            request(vec![hotel_line(10_000.0), guide_line(3000.0)]),
            &CommissionRates::default(),
        )
        .unwrap();

        assert_eq!(booking.status, BookingStatus::Pending);
        assert!((booking.total_cost - 13_000.0).abs() < 1e-9);
        // 10000 * 0.125 + 3000 * 0.10
        assert!((booking.commission_earned - 1550.0).abs() < 1e-9);
    }

    #[test]
    fn test_create_rejects_inverted_dates() {
        let mut req = request(vec![hotel_line(100.0)]);
        req.end_date = req.start_date;
        let err = Booking::create(UserId::new(), req, &CommissionRates::default()).unwrap_err();
        assert!(matches!(err, BookingError::InvalidDateRange));
    }

    #[test]
    fn test_create_rejects_zero_travelers() {
        let mut req = request(vec![hotel_line(100.0)]);
        req.traveler_count = 0;
        let err = Booking::create(UserId::new(), req, &CommissionRates::default()).unwrap_err();
        assert!(matches!(err, BookingError::InvalidTravelerCount));
    }

    #[test]
    fn test_create_rejects_empty_services_and_negative_price() {
        let err = Booking::create(UserId::new(), request(vec![]), &CommissionRates::default())
            .unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));

        let err = Booking::create(
            UserId::new(),
            request(vec![hotel_line(-1.0)]),
            &CommissionRates::default(),
        )
        .unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut booking = Booking::create(
            UserId::new(),
            request(vec![hotel_line(100.0)]),
            &CommissionRates::default(),
        )
        .unwrap();

        assert!(booking.start().is_err());
        booking.confirm().unwrap();
        assert!(booking.confirm().is_err());
        booking.start().unwrap();
        assert_eq!(booking.status, BookingStatus::InProgress);
        booking.complete().unwrap();
        assert!(matches!(
            booking.cancel(),
            Err(BookingError::InvalidTransition {
                from: BookingStatus::Completed,
                to: BookingStatus::Cancelled,
            })
        ));
    }

    #[test]
    fn test_cancelled_booking_cannot_be_confirmed() {
        let mut booking = Booking::create(
            UserId::new(),
            request(vec![hotel_line(100.0)]),
            &CommissionRates::default(),
        )
        .unwrap();
        booking.cancel().unwrap();
        assert!(booking.status.is_terminal());
        assert!(booking.confirm().is_err());
        assert!(booking.cancel().is_err());
    }

    #[test]
    fn test_details_tagged_wire_format() {
        let json = serde_json::json!({
            "service_provider_id": ProviderId::new(),
            "details": { "service_type": "car_rental", "daily_rate": 2000.0 },
            "price": 4000.0
        });
        let line: BookedService = serde_json::from_value(json).unwrap();
        assert_eq!(line.service_type(), ServiceType::CarRental);
        assert_eq!(line.details.rate(), Some(2000.0));
    }

    #[test]
    fn test_status_display_matches_wire() {
        let json = serde_json::to_string(&BookingStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        assert_eq!(BookingStatus::InProgress.to_string(), "in_progress");
        assert_eq!(
            "in_progress".parse::<BookingStatus>().unwrap(),
            BookingStatus::InProgress
        );
    }

    #[test]
    fn test_billable_days_rounds_up() {
        assert_eq!(billable_days(day(1), day(3)), 2);
        assert_eq!(billable_days(day(1), day(1) + Duration::hours(25)), 2);
        assert_eq!(billable_days(day(1), day(1) + Duration::hours(1)), 1);
        assert_eq!(billable_days(day(3), day(1)), 0);
    }
}
