//! Business logic and repository trait definitions for Axum Explorer.
//!
//! This crate defines the "ports" (repository traits) that the infrastructure
//! layer implements. It depends only on `explorer-types` -- never on
//! `explorer-infra` or any database/IO crate.

pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
