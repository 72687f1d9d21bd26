//! Business logic services (use cases).
//!
//! Services orchestrate repository calls and business rules. They depend on
//! traits (ports) -- never on concrete infrastructure implementations.

pub mod auth;
pub mod booking;
pub mod commission;
pub mod provider;
pub mod user;
