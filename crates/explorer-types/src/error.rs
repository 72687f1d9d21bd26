use thiserror::Error;

use crate::booking::BookingStatus;
use crate::commission::CommissionStatus;

/// Errors related to user accounts and authentication.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("user not found")]
    NotFound,

    #[error("user with email '{0}' already exists")]
    EmailTaken(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("account not verified")]
    NotVerified,

    #[error("invalid user input: {0}")]
    Validation(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("password hashing failed")]
    HashingFailed,

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors related to service provider profiles.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider not found")]
    NotFound,

    #[error("user already has a service provider account")]
    AlreadyRegistered,

    #[error("invalid provider input: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors related to bookings.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("booking not found")]
    NotFound,

    #[error("end date must be after start date")]
    InvalidDateRange,

    #[error("traveler count must be at least 1")]
    InvalidTravelerCount,

    #[error("invalid booking input: {0}")]
    Validation(String),

    #[error("booking cannot transition from '{from}' to '{to}'")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors related to commission records.
#[derive(Debug, Error)]
pub enum CommissionError {
    #[error("commission not found")]
    NotFound,

    #[error("commission cannot transition from '{from}' to '{to}'")]
    InvalidTransition {
        from: CommissionStatus,
        to: CommissionStatus,
    },

    #[error("invalid date range: start is after end")]
    InvalidRange,

    #[error("storage error: {0}")]
    StorageError(String),
}

/// Errors that stop the configuration from being used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("auth.token_secret is {len} bytes; at least {min} are required")]
    WeakTokenSecret { len: usize, min: usize },
}

/// Errors from repository operations (used by trait definitions in explorer-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_display() {
        let err = UserError::EmailTaken("ana@example.com".to_string());
        assert_eq!(
            err.to_string(),
            "user with email 'ana@example.com' already exists"
        );
    }

    #[test]
    fn test_booking_transition_display() {
        let err = BookingError::InvalidTransition {
            from: BookingStatus::Cancelled,
            to: BookingStatus::Confirmed,
        };
        assert_eq!(
            err.to_string(),
            "booking cannot transition from 'cancelled' to 'confirmed'"
        );
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }
}
