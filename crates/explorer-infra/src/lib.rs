//! Infrastructure layer for Axum Explorer.
//!
//! Contains implementations of the repository and auth traits defined in
//! `explorer-core`: SQLite storage, Argon2id password hashing, HS256 JWT
//! session tokens, plus configuration loading and data directory layout.

pub mod config;
pub mod crypto;
pub mod filesystem;
pub mod sqlite;
