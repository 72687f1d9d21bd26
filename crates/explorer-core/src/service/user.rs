//! User account and authentication service.
//!
//! Registration and login return an `AuthSession` carrying a signed token.
//! Public registration cannot create admins; those come from
//! `create_admin`, which the CLI uses.

use explorer_types::error::{RepositoryError, UserError};
use explorer_types::user::{
    AuthSession, RegisterUserRequest, TokenClaims, User, UserId, UserRole, normalize_email,
};

use crate::repository::user::UserRepository;
use crate::service::auth::{PasswordHasher, TokenIssuer};

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

fn storage(e: RepositoryError) -> UserError {
    UserError::StorageError(e.to_string())
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Service managing accounts, credentials and session tokens.
pub struct UserService<U: UserRepository, H: PasswordHasher, T: TokenIssuer> {
    repo: U,
    hasher: H,
    tokens: T,
    auto_verify: bool,
}

impl<U: UserRepository, H: PasswordHasher, T: TokenIssuer> UserService<U, H, T> {
    /// Create a new UserService.
    ///
    /// - `auto_verify`: mark self-registered accounts verified immediately
    pub fn new(repo: U, hasher: H, tokens: T, auto_verify: bool) -> Self {
        Self {
            repo,
            hasher,
            tokens,
            auto_verify,
        }
    }

    /// Register a tourist or provider account and issue a session token.
    pub async fn register_user(&self, request: RegisterUserRequest) -> Result<AuthSession, UserError> {
        if request.role == UserRole::Admin {
            return Err(UserError::Validation(
                "admin accounts cannot be self-registered".to_string(),
            ));
        }

        let user = self.insert_user(request, self.auto_verify).await?;
        let token = self.tokens.issue(&user)?;

        tracing::info!(user_id = %user.id, role = %user.role, "user registered");
        Ok(AuthSession { user, token })
    }

    /// Check credentials and issue a session token.
    ///
    /// Unknown emails and wrong passwords are indistinguishable to the caller.
    pub async fn authenticate_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, UserError> {
        let email = normalize_email(email);
        let Some(user) = self.repo.get_by_email(&email).await.map_err(storage)? else {
            tracing::warn!("login attempt for unknown email");
            return Err(UserError::InvalidCredentials);
        };

        if !self.hasher.verify_password(password, &user.password_hash) {
            tracing::warn!(user_id = %user.id, "login attempt with wrong password");
            return Err(UserError::InvalidCredentials);
        }
        if !user.is_verified {
            tracing::warn!(user_id = %user.id, "login attempt on unverified account");
            return Err(UserError::NotVerified);
        }

        let token = self.tokens.issue(&user)?;
        tracing::info!(user_id = %user.id, "user authenticated");
        Ok(AuthSession { user, token })
    }

    pub async fn get_user_profile(&self, id: &UserId) -> Result<User, UserError> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or(UserError::NotFound)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<User, UserError> {
        self.repo
            .get_by_email(&normalize_email(email))
            .await
            .map_err(storage)?
            .ok_or(UserError::NotFound)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.repo.list().await.map_err(storage)
    }

    pub async fn verify_user(&self, id: &UserId) -> Result<User, UserError> {
        let mut user = self.get_user_profile(id).await?;
        user.verify();
        let user = self.repo.update(&user).await.map_err(storage)?;
        tracing::info!(user_id = %id, "user verified");
        Ok(user)
    }

    /// Create a verified account of any role. Not exposed over HTTP.
    pub async fn create_verified_user(&self, request: RegisterUserRequest) -> Result<User, UserError> {
        let user = self.insert_user(request, true).await?;
        tracing::info!(user_id = %user.id, role = %user.role, "verified user created");
        Ok(user)
    }

    pub async fn create_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, UserError> {
        self.create_verified_user(RegisterUserRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: UserRole::Admin,
            phone: None,
        })
        .await
    }

    /// Validate a bearer token and return its claims.
    pub fn verify_token(&self, token: &str) -> Result<TokenClaims, UserError> {
        self.tokens.verify(token)
    }

    async fn insert_user(&self, request: RegisterUserRequest, verified: bool) -> Result<User, UserError> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(UserError::Validation("name must not be empty".to_string()));
        }
        let email = normalize_email(&request.email);
        if !looks_like_email(&email) {
            return Err(UserError::Validation(format!("invalid email '{email}'")));
        }
        if request.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(UserError::Validation(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }

        if self
            .repo
            .get_by_email(&email)
            .await
            .map_err(storage)?
            .is_some()
        {
            return Err(UserError::EmailTaken(email));
        }

        let password_hash = self.hasher.hash_password(&request.password)?;
        let phone = request
            .phone
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        let mut user = User::create(name, email.clone(), password_hash, request.role, phone);
        if verified {
            user.verify();
        }

        self.repo.create(&user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => UserError::EmailTaken(email),
            other => storage(other),
        })
    }
}
