//! Storage ports for users, providers, bookings and commissions.
//!
//! `explorer-infra` implements these over SQLite; `crate::testing` has an
//! in-memory version for service tests.

pub mod booking;
pub mod commission;
pub mod provider;
pub mod user;

/// Order of list results by `created_at`. Newest first unless asked otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}
