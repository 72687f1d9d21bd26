//! Cryptographic operations for Axum Explorer.
//!
//! - `password`: Argon2id password hashing
//! - `token`: HS256 JWT session tokens

pub mod password;
pub mod token;
