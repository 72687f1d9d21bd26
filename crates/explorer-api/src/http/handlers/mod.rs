//! Request handlers, one module per route group.

use std::str::FromStr;

use crate::http::error::AppError;

pub mod admin;
pub mod auth;
pub mod booking;
pub mod health;
pub mod provider;

/// Parse a path identifier, rejecting malformed values with 400.
pub(crate) fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, AppError> {
    raw.parse::<T>()
        .map_err(|_| AppError::Validation(format!("invalid {what} id: '{raw}'")))
}
