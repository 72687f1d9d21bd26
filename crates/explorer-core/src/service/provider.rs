//! Service provider management.

use explorer_types::error::{ProviderError, RepositoryError};
use explorer_types::provider::{
    ProviderId, RegisterProviderRequest, ServiceProvider, ServiceType, VerificationStatus,
};
use explorer_types::user::UserId;

use crate::repository::provider::{ProviderFilter, ProviderRepository};

fn storage(e: RepositoryError) -> ProviderError {
    ProviderError::StorageError(e.to_string())
}

/// Service for registering providers and moving them through verification.
pub struct ServiceProviderService<P: ProviderRepository> {
    repo: P,
}

impl<P: ProviderRepository> ServiceProviderService<P> {
    pub fn new(repo: P) -> Self {
        Self { repo }
    }

    /// Register `user_id` as a provider, awaiting admin verification.
    pub async fn register_provider(
        &self,
        user_id: &UserId,
        request: RegisterProviderRequest,
    ) -> Result<ServiceProvider, ProviderError> {
        if self
            .repo
            .get_by_user_id(user_id)
            .await
            .map_err(storage)?
            .is_some()
        {
            return Err(ProviderError::AlreadyRegistered);
        }

        let business_name = request.business_name.trim().to_string();
        if business_name.is_empty() {
            return Err(ProviderError::Validation(
                "business name must not be empty".to_string(),
            ));
        }
        if !request.location.is_valid() {
            return Err(ProviderError::Validation(
                "location coordinates out of range".to_string(),
            ));
        }

        let provider = ServiceProvider::create(
            user_id.clone(),
            business_name,
            request.description,
            request.service_type,
            request.contact_info,
            request.location,
        );

        // A concurrent registration can still lose the race on the unique index.
        let provider = self.repo.create(&provider).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => ProviderError::AlreadyRegistered,
            other => storage(other),
        })?;

        tracing::info!(
            provider_id = %provider.id,
            user_id = %user_id,
            service_type = %provider.service_type,
            "service provider registered"
        );
        Ok(provider)
    }

    /// List active providers, optionally by type, and by default only
    /// verified ones.
    pub async fn list_providers(
        &self,
        service_type: Option<ServiceType>,
        verified_only: bool,
    ) -> Result<Vec<ServiceProvider>, ProviderError> {
        self.repo
            .list(ProviderFilter {
                service_type,
                verification_status: verified_only.then_some(VerificationStatus::Verified),
                active_only: true,
            })
            .await
            .map_err(storage)
    }

    pub async fn get_providers_by_status(
        &self,
        status: VerificationStatus,
    ) -> Result<Vec<ServiceProvider>, ProviderError> {
        self.repo
            .list(ProviderFilter {
                service_type: None,
                verification_status: Some(status),
                active_only: false,
            })
            .await
            .map_err(storage)
    }

    pub async fn get_provider_by_id(&self, id: &ProviderId) -> Result<ServiceProvider, ProviderError> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(storage)?
            .ok_or(ProviderError::NotFound)
    }

    pub async fn get_provider_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<ServiceProvider, ProviderError> {
        self.repo
            .get_by_user_id(user_id)
            .await
            .map_err(storage)?
            .ok_or(ProviderError::NotFound)
    }

    pub async fn verify_provider(&self, id: &ProviderId) -> Result<ServiceProvider, ProviderError> {
        let mut provider = self.get_provider_by_id(id).await?;
        provider.verify();
        let provider = self.repo.update(&provider).await.map_err(storage)?;
        tracing::info!(provider_id = %id, "service provider verified");
        Ok(provider)
    }

    pub async fn reject_provider(&self, id: &ProviderId) -> Result<ServiceProvider, ProviderError> {
        let mut provider = self.get_provider_by_id(id).await?;
        provider.reject();
        let provider = self.repo.update(&provider).await.map_err(storage)?;
        tracing::info!(provider_id = %id, "service provider rejected");
        Ok(provider)
    }
}
