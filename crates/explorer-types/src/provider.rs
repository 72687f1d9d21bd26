use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::user::UserId;

/// Unique identifier for a service provider profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderId(pub Uuid);

impl ProviderId {
    /// Create a new ProviderId using UUID v7.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ProviderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProviderId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// The kind of service a provider offers and a booking line reserves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Hotel,
    CarRental,
    Guide,
}

impl ServiceType {
    pub const ALL: [ServiceType; 3] = [ServiceType::Hotel, ServiceType::CarRental, ServiceType::Guide];
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceType::Hotel => write!(f, "hotel"),
            ServiceType::CarRental => write!(f, "car_rental"),
            ServiceType::Guide => write!(f, "guide"),
        }
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hotel" => Ok(ServiceType::Hotel),
            "car_rental" => Ok(ServiceType::CarRental),
            "guide" => Ok(ServiceType::Guide),
            other => Err(format!("invalid service type: '{other}'")),
        }
    }
}

/// Admin verification state of a provider.
///
/// Only verified providers are visible to tourists by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationStatus::Pending => write!(f, "pending"),
            VerificationStatus::Verified => write!(f, "verified"),
            VerificationStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for VerificationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(VerificationStatus::Pending),
            "verified" => Ok(VerificationStatus::Verified),
            "rejected" => Ok(VerificationStatus::Rejected),
            other => Err(format!("invalid verification status: '{other}'")),
        }
    }
}

impl Default for VerificationStatus {
    fn default() -> Self {
        VerificationStatus::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub phone: String,
    pub email: String,
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Whether the coordinates are within WGS84 bounds.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A business offering hotel, car rental, or guide services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceProvider {
    pub id: ProviderId,
    /// Owning account. A user holds at most one provider profile.
    pub user_id: UserId,
    pub business_name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    pub contact_info: ContactInfo,
    pub verification_status: VerificationStatus,
    pub location: Location,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServiceProvider {
    /// Build a new active provider awaiting admin verification.
    pub fn create(
        user_id: UserId,
        business_name: String,
        description: String,
        service_type: ServiceType,
        contact_info: ContactInfo,
        location: Location,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ProviderId::new(),
            user_id,
            business_name,
            description,
            service_type,
            contact_info,
            verification_status: VerificationStatus::Pending,
            location,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn verify(&mut self) {
        self.verification_status = VerificationStatus::Verified;
        self.updated_at = Utc::now();
    }

    pub fn reject(&mut self) {
        self.verification_status = VerificationStatus::Rejected;
        self.updated_at = Utc::now();
    }

    pub fn is_verified(&self) -> bool {
        self.verification_status == VerificationStatus::Verified
    }
}

/// Request to register the caller as a service provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterProviderRequest {
    pub business_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    pub contact_info: ContactInfo,
    pub location: Location,
}
