//! HS256 session tokens (JWT).
//!
//! Signing and signature checks go through `jsonwebtoken`. Only HS256 is
//! accepted. Expiry is checked against the caller's clock so it can be tested
//! at fixed instants.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};

use explorer_core::service::auth::TokenIssuer;
use explorer_types::error::UserError;
use explorer_types::user::{TokenClaims, User};

fn invalid(reason: &str) -> UserError {
    UserError::InvalidToken(reason.to_string())
}

/// Issues and verifies HS256 tokens with a shared secret.
pub struct JwtTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtTokenIssuer {
    /// - `secret`: signing key
    /// - `ttl_hours`: token lifetime
    pub fn new(secret: SecretString, ttl_hours: u64) -> Self {
        let key = secret.expose_secret().as_bytes();
        let ttl = i64::try_from(ttl_hours)
            .ok()
            .and_then(Duration::try_hours)
            .unwrap_or(Duration::MAX);

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(key),
            decoding_key: DecodingKey::from_secret(key),
            validation,
            ttl,
        }
    }

    pub fn issue_at(&self, user: &User, now: DateTime<Utc>) -> Result<String, UserError> {
        let claims = TokenClaims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: now
                .checked_add_signed(self.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
                .timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| UserError::InvalidToken(format!("failed to sign token: {e}")))
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, UserError> {
        let claims = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => invalid("bad signature"),
                ErrorKind::InvalidAlgorithm => invalid("unsupported algorithm"),
                _ => invalid("malformed token"),
            })?
            .claims;

        if claims.is_expired_at(now) {
            return Err(invalid("token expired"));
        }
        Ok(claims)
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user: &User) -> Result<String, UserError> {
        self.issue_at(user, Utc::now())
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, UserError> {
        self.verify_at(token, Utc::now())
    }
}
