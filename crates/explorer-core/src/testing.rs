//! In-memory test doubles shared by the service tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use explorer_types::booking::{Booking, BookingId, BookingStatus};
use explorer_types::commission::{
    Commission, CommissionId, CommissionStatus, RevenueRange,
};
use explorer_types::error::{RepositoryError, UserError};
use explorer_types::provider::{ProviderId, ServiceProvider};
use explorer_types::user::{TokenClaims, User, UserId};

use crate::repository::SortOrder;
use crate::repository::booking::{BookingFilter, BookingRepository};
use crate::repository::commission::{CommissionFilter, CommissionRepository};
use crate::repository::provider::{ProviderFilter, ProviderRepository};
use crate::repository::user::UserRepository;
use crate::service::auth::{PasswordHasher, TokenIssuer};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    providers: Vec<ServiceProvider>,
    bookings: Vec<Booking>,
    commissions: Vec<Commission>,
}

/// One shared in-memory store implementing every repository trait, so a
/// booking written through `BookingRepository` is visible through
/// `CommissionRepository`.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commissions(&self) -> Vec<Commission> {
        self.tables.lock().unwrap().commissions.clone()
    }

    pub fn bookings(&self) -> Vec<Booking> {
        self.tables.lock().unwrap().bookings.clone()
    }
}

fn in_range(date: Option<DateTime<Utc>>, range: &RevenueRange) -> bool {
    let Some(date) = date else {
        return false;
    };
    range.from.is_none_or(|from| date >= from) && range.to.is_none_or(|to| date <= to)
}

impl UserRepository for MemoryStore {
    async fn create(&self, user: &User) -> Result<User, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict(format!(
                "email '{}' already exists",
                user.email
            )));
        }
        tables.users.push(user.clone());
        Ok(user.clone())
    }

    async fn get_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| &u.id == id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.tables.lock().unwrap().users.clone())
    }

    async fn update(&self, user: &User) -> Result<User, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        let slot = tables
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = user.clone();
        Ok(user.clone())
    }
}

impl ProviderRepository for MemoryStore {
    async fn create(&self, provider: &ServiceProvider) -> Result<ServiceProvider, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.providers.iter().any(|p| p.user_id == provider.user_id) {
            return Err(RepositoryError::Conflict(
                "user already has a provider profile".to_string(),
            ));
        }
        tables.providers.push(provider.clone());
        Ok(provider.clone())
    }

    async fn get_by_id(&self, id: &ProviderId) -> Result<Option<ServiceProvider>, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.providers.iter().find(|p| &p.id == id).cloned())
    }

    async fn get_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<ServiceProvider>, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .providers
            .iter()
            .find(|p| &p.user_id == user_id)
            .cloned())
    }

    async fn list(&self, filter: ProviderFilter) -> Result<Vec<ServiceProvider>, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .providers
            .iter()
            .filter(|p| filter.service_type.is_none_or(|t| p.service_type == t))
            .filter(|p| {
                filter
                    .verification_status
                    .is_none_or(|s| p.verification_status == s)
            })
            .filter(|p| !filter.active_only || p.is_active)
            .cloned()
            .collect())
    }

    async fn update(&self, provider: &ServiceProvider) -> Result<ServiceProvider, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        let slot = tables
            .providers
            .iter_mut()
            .find(|p| p.id == provider.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = provider.clone();
        Ok(provider.clone())
    }
}

impl BookingRepository for MemoryStore {
    async fn create_with_commissions(
        &self,
        booking: &Booking,
        commissions: &[Commission],
    ) -> Result<Booking, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        tables.bookings.push(booking.clone());
        tables.commissions.extend_from_slice(commissions);
        Ok(booking.clone())
    }

    async fn get_by_id(&self, id: &BookingId) -> Result<Option<Booking>, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.bookings.iter().find(|b| &b.id == id).cloned())
    }

    async fn list(&self, filter: BookingFilter) -> Result<Vec<Booking>, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        let mut bookings: Vec<Booking> = tables
            .bookings
            .iter()
            .filter(|b| filter.user_id.as_ref().is_none_or(|u| &b.user_id == u))
            .filter(|b| filter.status.is_none_or(|s| b.status == s))
            .cloned()
            .collect();
        if filter.sort_order.unwrap_or_default() == SortOrder::Desc {
            bookings.reverse();
        }
        Ok(bookings)
    }

    async fn update_status(
        &self,
        id: &BookingId,
        from: BookingStatus,
        to: BookingStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Booking>, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables
            .bookings
            .iter_mut()
            .find(|b| &b.id == id && b.status == from)
            .map(|b| {
                b.status = to;
                b.updated_at = at;
                b.clone()
            }))
    }

    async fn cancel_with_commissions(
        &self,
        id: &BookingId,
        from: BookingStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Booking>, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(booking) = tables
            .bookings
            .iter_mut()
            .find(|b| &b.id == id && b.status == from)
        else {
            return Ok(None);
        };
        booking.status = BookingStatus::Cancelled;
        booking.updated_at = at;
        let booking = booking.clone();
        for c in tables
            .commissions
            .iter_mut()
            .filter(|c| &c.booking_id == id && c.status == CommissionStatus::Pending)
        {
            c.status = CommissionStatus::Cancelled;
            c.updated_at = at;
        }
        Ok(Some(booking))
    }
}

impl CommissionRepository for MemoryStore {
    async fn create(&self, commission: &Commission) -> Result<Commission, RepositoryError> {
        self.tables
            .lock()
            .unwrap()
            .commissions
            .push(commission.clone());
        Ok(commission.clone())
    }

    async fn get_by_id(&self, id: &CommissionId) -> Result<Option<Commission>, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.commissions.iter().find(|c| &c.id == id).cloned())
    }

    async fn list(&self, filter: CommissionFilter) -> Result<Vec<Commission>, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .commissions
            .iter()
            .filter(|c| filter.booking_id.as_ref().is_none_or(|b| &c.booking_id == b))
            .filter(|c| {
                filter
                    .provider_id
                    .as_ref()
                    .is_none_or(|p| &c.service_provider_id == p)
            })
            .filter(|c| filter.status.is_none_or(|s| c.status == s))
            .cloned()
            .collect())
    }

    async fn update_status(
        &self,
        commission: &Commission,
        from: CommissionStatus,
    ) -> Result<Option<Commission>, RepositoryError> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables
            .commissions
            .iter_mut()
            .find(|c| c.id == commission.id && c.status == from)
            .map(|slot| {
                *slot = commission.clone();
                slot.clone()
            }))
    }

    async fn platform_earnings(&self, range: &RevenueRange) -> Result<f64, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .commissions
            .iter()
            .filter(|c| c.status == CommissionStatus::Paid && in_range(c.payment_date, range))
            .map(|c| c.platform_earnings)
            .sum())
    }

    async fn provider_earnings(
        &self,
        provider_id: &ProviderId,
        range: &RevenueRange,
    ) -> Result<f64, RepositoryError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .commissions
            .iter()
            .filter(|c| &c.service_provider_id == provider_id)
            .filter(|c| c.status == CommissionStatus::Paid && in_range(c.payment_date, range))
            .map(|c| c.provider_earnings)
            .sum())
    }
}

/// Reversible "hash" so tests can assert on stored values.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash_password(&self, password: &str) -> Result<String, UserError> {
        Ok(format!("plain${password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> bool {
        hash.strip_prefix("plain$") == Some(password)
    }
}

/// Issues opaque tokens and remembers their claims.
#[derive(Default)]
pub struct MemoryTokens {
    issued: Mutex<HashMap<String, TokenClaims>>,
}

impl TokenIssuer for MemoryTokens {
    fn issue(&self, user: &User) -> Result<String, UserError> {
        let now = Utc::now().timestamp();
        let token = format!("tok-{}", uuid::Uuid::now_v7());
        let claims = TokenClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iat: now,
            exp: now + 3600,
        };
        self.issued.lock().unwrap().insert(token.clone(), claims);
        Ok(token)
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, UserError> {
        self.issued
            .lock()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or_else(|| UserError::InvalidToken("unknown token".to_string()))
    }
}
