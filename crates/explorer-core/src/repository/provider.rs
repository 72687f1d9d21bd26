//! Service provider repository trait definition.

use explorer_types::error::RepositoryError;
use explorer_types::provider::{ProviderId, ServiceProvider, ServiceType, VerificationStatus};
use explorer_types::user::UserId;

/// Filter criteria for listing providers.
#[derive(Debug, Clone, Default)]
pub struct ProviderFilter {
    pub service_type: Option<ServiceType>,
    pub verification_status: Option<VerificationStatus>,
    /// Exclude deactivated providers.
    pub active_only: bool,
}

/// Repository trait for service provider persistence.
pub trait ProviderRepository: Send + Sync {
    /// Create a provider profile. A second profile for the same user yields
    /// `RepositoryError::Conflict`.
    fn create(
        &self,
        provider: &ServiceProvider,
    ) -> impl std::future::Future<Output = Result<ServiceProvider, RepositoryError>> + Send;

    fn get_by_id(
        &self,
        id: &ProviderId,
    ) -> impl std::future::Future<Output = Result<Option<ServiceProvider>, RepositoryError>> + Send;

    fn get_by_user_id(
        &self,
        user_id: &UserId,
    ) -> impl std::future::Future<Output = Result<Option<ServiceProvider>, RepositoryError>> + Send;

    /// List providers matching the filter, newest first.
    fn list(
        &self,
        filter: ProviderFilter,
    ) -> impl std::future::Future<Output = Result<Vec<ServiceProvider>, RepositoryError>> + Send;

    fn update(
        &self,
        provider: &ServiceProvider,
    ) -> impl std::future::Future<Output = Result<ServiceProvider, RepositoryError>> + Send;
}
