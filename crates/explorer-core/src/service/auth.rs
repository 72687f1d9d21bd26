//! Password hashing and session token traits.
//!
//! Defined in explorer-core so `UserService` can hash passwords and issue
//! tokens without coupling to a specific algorithm. The Argon2 and
//! JWT adapters live in explorer-infra.

use explorer_types::error::UserError;
use explorer_types::user::{TokenClaims, User};

/// Abstraction over one-way password hashing.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing (PHC) string.
    fn hash_password(&self, password: &str) -> Result<String, UserError>;

    /// Check a plaintext password against a stored hash. Malformed hashes
    /// never match.
    fn verify_password(&self, password: &str, hash: &str) -> bool;
}

/// Abstraction over signed, expiring session tokens.
pub trait TokenIssuer: Send + Sync {
    /// Issue a token for the user carrying id, email and role.
    fn issue(&self, user: &User) -> Result<String, UserError>;

    /// Check signature and expiry and return the claims.
    ///
    /// Fails with `UserError::InvalidToken` for malformed, forged, or
    /// expired tokens.
    fn verify(&self, token: &str) -> Result<TokenClaims, UserError>;
}
