//! SQLite service provider repository implementation.

use explorer_core::repository::provider::{ProviderFilter, ProviderRepository};
use explorer_types::error::RepositoryError;
use explorer_types::provider::{
    ContactInfo, Location, ProviderId, ServiceProvider, ServiceType, VerificationStatus,
};
use explorer_types::user::UserId;
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, is_unique_violation, parse_datetime, query_err};

/// SQLite-backed implementation of `ProviderRepository`.
///
/// Contact info and location are flattened into columns.
pub struct SqliteProviderRepository {
    pool: DatabasePool,
}

impl SqliteProviderRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct ProviderRow {
    id: String,
    user_id: String,
    business_name: String,
    description: String,
    service_type: String,
    contact_phone: String,
    contact_email: String,
    contact_address: String,
    verification_status: String,
    latitude: f64,
    longitude: f64,
    is_active: bool,
    created_at: String,
    updated_at: String,
}

impl ProviderRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            business_name: row.try_get("business_name")?,
            description: row.try_get("description")?,
            service_type: row.try_get("service_type")?,
            contact_phone: row.try_get("contact_phone")?,
            contact_email: row.try_get("contact_email")?,
            contact_address: row.try_get("contact_address")?,
            verification_status: row.try_get("verification_status")?,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_provider(self) -> Result<ServiceProvider, RepositoryError> {
        let id = self
            .id
            .parse::<ProviderId>()
            .map_err(|e| RepositoryError::Query(format!("invalid provider id: {e}")))?;
        let user_id = self
            .user_id
            .parse::<UserId>()
            .map_err(|e| RepositoryError::Query(format!("invalid user id: {e}")))?;
        let service_type: ServiceType = self
            .service_type
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let verification_status: VerificationStatus = self
            .verification_status
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;

        Ok(ServiceProvider {
            id,
            user_id,
            business_name: self.business_name,
            description: self.description,
            service_type,
            contact_info: ContactInfo {
                phone: self.contact_phone,
                email: self.contact_email,
                address: self.contact_address,
            },
            verification_status,
            location: Location {
                latitude: self.latitude,
                longitude: self.longitude,
            },
            is_active: self.is_active,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn map_row(row: &sqlx::sqlite::SqliteRow) -> Result<ServiceProvider, RepositoryError> {
    ProviderRow::from_row(row).map_err(query_err)?.into_provider()
}

impl ProviderRepository for SqliteProviderRepository {
    async fn create(&self, provider: &ServiceProvider) -> Result<ServiceProvider, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO service_providers (id, user_id, business_name, description, service_type, contact_phone, contact_email, contact_address, verification_status, latitude, longitude, is_active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(provider.id.to_string())
        .bind(provider.user_id.to_string())
        .bind(&provider.business_name)
        .bind(&provider.description)
        .bind(provider.service_type.to_string())
        .bind(&provider.contact_info.phone)
        .bind(&provider.contact_info.email)
        .bind(&provider.contact_info.address)
        .bind(provider.verification_status.to_string())
        .bind(provider.location.latitude)
        .bind(provider.location.longitude)
        .bind(provider.is_active)
        .bind(format_datetime(&provider.created_at))
        .bind(format_datetime(&provider.updated_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(provider.clone()),
            Err(e) if is_unique_violation(&e) => Err(RepositoryError::Conflict(format!(
                "user '{}' already has a provider profile",
                provider.user_id
            ))),
            Err(e) => Err(query_err(e)),
        }
    }

    async fn get_by_id(&self, id: &ProviderId) -> Result<Option<ServiceProvider>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM service_providers WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        row.as_ref().map(map_row).transpose()
    }

    async fn get_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<ServiceProvider>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM service_providers WHERE user_id = ?")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        row.as_ref().map(map_row).transpose()
    }

    async fn list(&self, filter: ProviderFilter) -> Result<Vec<ServiceProvider>, RepositoryError> {
        let mut sql = String::from("SELECT * FROM service_providers");
        let mut conditions: Vec<&str> = Vec::new();
        let mut binds: Vec<String> = Vec::new();

        if let Some(service_type) = filter.service_type {
            conditions.push("service_type = ?");
            binds.push(service_type.to_string());
        }
        if let Some(status) = filter.verification_status {
            conditions.push("verification_status = ?");
            binds.push(status.to_string());
        }
        if filter.active_only {
            conditions.push("is_active = 1");
        }

        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let mut query = sqlx::query(&sql);
        for value in &binds {
            query = query.bind(value);
        }

        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(query_err)?;

        rows.iter().map(map_row).collect()
    }

    async fn update(&self, provider: &ServiceProvider) -> Result<ServiceProvider, RepositoryError> {
        let result = sqlx::query(
            "UPDATE service_providers SET business_name = ?, description = ?, service_type = ?, contact_phone = ?, contact_email = ?, contact_address = ?, verification_status = ?, latitude = ?, longitude = ?, is_active = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&provider.business_name)
        .bind(&provider.description)
        .bind(provider.service_type.to_string())
        .bind(&provider.contact_info.phone)
        .bind(&provider.contact_info.email)
        .bind(&provider.contact_info.address)
        .bind(provider.verification_status.to_string())
        .bind(provider.location.latitude)
        .bind(provider.location.longitude)
        .bind(provider.is_active)
        .bind(format_datetime(&provider.updated_at))
        .bind(provider.id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(provider.clone())
    }
}
