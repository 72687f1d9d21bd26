//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use explorer_types::error::{BookingError, CommissionError, ProviderError, UserError};

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    User(UserError),
    Provider(ProviderError),
    Booking(BookingError),
    Commission(CommissionError),
    /// Missing or invalid credentials.
    Unauthorized(String),
    /// Authenticated, but not allowed to touch the resource.
    Forbidden(String),
    /// Malformed path or query input.
    Validation(String),
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        AppError::User(e)
    }
}

impl From<ProviderError> for AppError {
    fn from(e: ProviderError) -> Self {
        AppError::Provider(e)
    }
}

impl From<BookingError> for AppError {
    fn from(e: BookingError) -> Self {
        AppError::Booking(e)
    }
}

impl From<CommissionError> for AppError {
    fn from(e: CommissionError) -> Self {
        AppError::Commission(e)
    }
}

impl AppError {
    /// Status code and client-facing message.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::User(e) => match e {
                UserError::NotFound => (StatusCode::NOT_FOUND, "User not found".to_string()),
                UserError::EmailTaken(_) | UserError::Validation(_) => {
                    (StatusCode::BAD_REQUEST, e.to_string())
                }
                UserError::InvalidCredentials => {
                    (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
                }
                UserError::NotVerified => (
                    StatusCode::UNAUTHORIZED,
                    "Account not verified. Please contact an administrator.".to_string(),
                ),
                UserError::InvalidToken(_) => (StatusCode::UNAUTHORIZED, "Invalid token".to_string()),
                UserError::HashingFailed | UserError::StorageError(_) => internal(e),
            },
            AppError::Provider(e) => match e {
                ProviderError::NotFound => {
                    (StatusCode::NOT_FOUND, "Service provider not found".to_string())
                }
                ProviderError::AlreadyRegistered | ProviderError::Validation(_) => {
                    (StatusCode::BAD_REQUEST, e.to_string())
                }
                ProviderError::StorageError(_) => internal(e),
            },
            AppError::Booking(e) => match e {
                BookingError::NotFound => (StatusCode::NOT_FOUND, "Booking not found".to_string()),
                BookingError::StorageError(_) => internal(e),
                _ => (StatusCode::BAD_REQUEST, e.to_string()),
            },
            AppError::Commission(e) => match e {
                CommissionError::NotFound => {
                    (StatusCode::NOT_FOUND, "Commission not found".to_string())
                }
                CommissionError::StorageError(_) => internal(e),
                _ => (StatusCode::BAD_REQUEST, e.to_string()),
            },
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        }
    }
}

fn internal(e: &dyn std::error::Error) -> (StatusCode, String) {
    tracing::error!(error = %e, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        ApiResponse::error(status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use explorer_types::booking::BookingStatus;

    fn status(e: impl Into<AppError>) -> StatusCode {
        e.into().status_and_message().0
    }

    #[test]
    fn maps_domain_errors_to_status_codes() {
        assert_eq!(status(UserError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status(UserError::EmailTaken("a@example.com".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status(UserError::InvalidCredentials), StatusCode::UNAUTHORIZED);
        assert_eq!(status(UserError::NotVerified), StatusCode::UNAUTHORIZED);
        assert_eq!(status(ProviderError::AlreadyRegistered), StatusCode::BAD_REQUEST);
        assert_eq!(status(BookingError::InvalidDateRange), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(BookingError::InvalidTransition {
                from: BookingStatus::Cancelled,
                to: BookingStatus::Confirmed,
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status(CommissionError::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            status(BookingError::StorageError("disk full".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status(AppError::Forbidden("no".into())),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn storage_details_are_not_leaked() {
        let (_, message) =
            AppError::from(UserError::StorageError("database is locked".into())).status_and_message();
        assert_eq!(message, "Internal server error");
    }
}
