//! Shared domain types for Axum Explorer.
//!
//! This crate contains the marketplace entities used across the platform:
//! User, ServiceProvider, Booking, Commission, plus their error and
//! configuration types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod booking;
pub mod commission;
pub mod config;
pub mod error;
pub mod provider;
pub mod user;
