//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! Services are generic over repository and auth traits; AppState pins them to
//! the SQLite, Argon2 and JWT implementations from explorer-infra.

use std::path::PathBuf;
use std::sync::Arc;

use secrecy::SecretString;

use explorer_core::service::booking::BookingService;
use explorer_core::service::commission::CommissionService;
use explorer_core::service::provider::ServiceProviderService;
use explorer_core::service::user::UserService;
use explorer_infra::config::load_config;
use explorer_infra::crypto::password::Argon2PasswordHasher;
use explorer_infra::crypto::token::JwtTokenIssuer;
use explorer_infra::filesystem::{ensure_data_dir, resolve_data_dir};
use explorer_infra::sqlite::booking::SqliteBookingRepository;
use explorer_infra::sqlite::commission::SqliteCommissionRepository;
use explorer_infra::sqlite::pool::{DatabasePool, default_database_url};
use explorer_infra::sqlite::provider::SqliteProviderRepository;
use explorer_infra::sqlite::user::SqliteUserRepository;
use explorer_types::config::ExplorerConfig;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteUserService =
    UserService<SqliteUserRepository, Argon2PasswordHasher, JwtTokenIssuer>;

pub type ConcreteProviderService = ServiceProviderService<SqliteProviderRepository>;

pub type ConcreteCommissionService = CommissionService<SqliteCommissionRepository>;

pub type ConcreteBookingService =
    BookingService<SqliteBookingRepository, SqliteCommissionRepository>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<ConcreteUserService>,
    pub provider_service: Arc<ConcreteProviderService>,
    pub booking_service: Arc<ConcreteBookingService>,
    pub commission_service: Arc<ConcreteCommissionService>,
    pub config: Arc<ExplorerConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load config, connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        ensure_data_dir(&data_dir).await?;

        let config = load_config(&data_dir).await?;
        let db_url = config
            .database
            .url
            .clone()
            .unwrap_or_else(|| format!("{}?mode=rwc", default_database_url(&data_dir)));
        let db_pool = DatabasePool::connect(&db_url, &config.database).await?;

        Ok(Self::from_parts(db_pool, config, data_dir))
    }

    /// Wire services over an already opened pool.
    pub fn from_parts(db_pool: DatabasePool, config: ExplorerConfig, data_dir: PathBuf) -> Self {
        let tokens = JwtTokenIssuer::new(
            SecretString::from(config.auth.token_secret.clone()),
            config.auth.token_ttl_hours,
        );
        let user_service = UserService::new(
            SqliteUserRepository::new(db_pool.clone()),
            Argon2PasswordHasher::new(),
            tokens,
            config.auth.auto_verify_users,
        );

        let provider_service =
            ServiceProviderService::new(SqliteProviderRepository::new(db_pool.clone()));

        // One commission service backs both booking creation and the commission endpoints.
        let commission_service = Arc::new(CommissionService::new(
            SqliteCommissionRepository::new(db_pool.clone()),
            config.commission.clone(),
        ));
        let booking_service = BookingService::new(
            SqliteBookingRepository::new(db_pool.clone()),
            Arc::clone(&commission_service),
            config.pricing.clone(),
        );

        Self {
            user_service: Arc::new(user_service),
            provider_service: Arc::new(provider_service),
            booking_service: Arc::new(booking_service),
            commission_service,
            config: Arc::new(config),
            data_dir,
            db_pool,
        }
    }
}
