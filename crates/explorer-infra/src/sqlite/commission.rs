//! SQLite commission repository implementation.

use explorer_core::repository::commission::{CommissionFilter, CommissionRepository};
use explorer_types::booking::BookingId;
use explorer_types::commission::{Commission, CommissionId, CommissionStatus, RevenueRange};
use explorer_types::error::RepositoryError;
use explorer_types::provider::{ProviderId, ServiceType};
use sqlx::Row;
use sqlx::sqlite::SqliteConnection;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_err};

/// SQLite-backed implementation of `CommissionRepository`.
pub struct SqliteCommissionRepository {
    pool: DatabasePool,
}

impl SqliteCommissionRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Insert one commission row on the given connection (which may be inside
/// a booking transaction).
pub(crate) async fn insert_commission(
    conn: &mut SqliteConnection,
    commission: &Commission,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO commissions (id, booking_id, service_provider_id, service_type, amount, commission_rate, provider_earnings, platform_earnings, status, payment_date, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(commission.id.to_string())
    .bind(commission.booking_id.to_string())
    .bind(commission.service_provider_id.to_string())
    .bind(commission.service_type.to_string())
    .bind(commission.amount)
    .bind(commission.commission_rate)
    .bind(commission.provider_earnings)
    .bind(commission.platform_earnings)
    .bind(commission.status.to_string())
    .bind(commission.payment_date.as_ref().map(format_datetime))
    .bind(format_datetime(&commission.created_at))
    .bind(format_datetime(&commission.updated_at))
    .execute(conn)
    .await?;
    Ok(())
}

struct CommissionRow {
    id: String,
    booking_id: String,
    service_provider_id: String,
    service_type: String,
    amount: f64,
    commission_rate: f64,
    provider_earnings: f64,
    platform_earnings: f64,
    status: String,
    payment_date: Option<String>,
    created_at: String,
    updated_at: String,
}

impl CommissionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            booking_id: row.try_get("booking_id")?,
            service_provider_id: row.try_get("service_provider_id")?,
            service_type: row.try_get("service_type")?,
            amount: row.try_get("amount")?,
            commission_rate: row.try_get("commission_rate")?,
            provider_earnings: row.try_get("provider_earnings")?,
            platform_earnings: row.try_get("platform_earnings")?,
            status: row.try_get("status")?,
            payment_date: row.try_get("payment_date")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_commission(self) -> Result<Commission, RepositoryError> {
        let id = self
            .id
            .parse::<CommissionId>()
            .map_err(|e| RepositoryError::Query(format!("invalid commission id: {e}")))?;
        let booking_id = self
            .booking_id
            .parse::<BookingId>()
            .map_err(|e| RepositoryError::Query(format!("invalid booking id: {e}")))?;
        let service_provider_id = self
            .service_provider_id
            .parse::<ProviderId>()
            .map_err(|e| RepositoryError::Query(format!("invalid provider id: {e}")))?;
        let service_type: ServiceType = self
            .service_type
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let status: CommissionStatus = self
            .status
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let payment_date = self
            .payment_date
            .as_deref()
            .map(parse_datetime)
            .transpose()?;

        Ok(Commission {
            id,
            booking_id,
            service_provider_id,
            service_type,
            amount: self.amount,
            commission_rate: self.commission_rate,
            provider_earnings: self.provider_earnings,
            platform_earnings: self.platform_earnings,
            status,
            payment_date,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn map_row(row: &sqlx::sqlite::SqliteRow) -> Result<Commission, RepositoryError> {
    CommissionRow::from_row(row).map_err(query_err)?.into_commission()
}

impl SqliteCommissionRepository {
    /// Sum a column over paid commissions in the payment-date range.
    async fn sum_paid(
        &self,
        column: &str,
        provider_id: Option<&ProviderId>,
        range: &RevenueRange,
    ) -> Result<f64, RepositoryError> {
        let mut sql = format!(
            "SELECT COALESCE(SUM({column}), 0.0) AS total FROM commissions
             WHERE status = 'paid'
               AND (?1 IS NULL OR payment_date >= ?1)
               AND (?2 IS NULL OR payment_date <= ?2)"
        );
        if provider_id.is_some() {
            sql.push_str(" AND service_provider_id = ?3");
        }

        let mut query = sqlx::query(&sql)
            .bind(range.from.as_ref().map(format_datetime))
            .bind(range.to.as_ref().map(format_datetime));
        if let Some(provider_id) = provider_id {
            query = query.bind(provider_id.to_string());
        }

        let row = query
            .fetch_one(&self.pool.reader)
            .await
            .map_err(query_err)?;
        row.try_get::<f64, _>("total").map_err(query_err)
    }
}

impl CommissionRepository for SqliteCommissionRepository {
    async fn create(&self, commission: &Commission) -> Result<Commission, RepositoryError> {
        let mut conn = self.pool.writer.acquire().await.map_err(query_err)?;
        insert_commission(&mut conn, commission)
            .await
            .map_err(query_err)?;
        Ok(commission.clone())
    }

    async fn get_by_id(&self, id: &CommissionId) -> Result<Option<Commission>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM commissions WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        row.as_ref().map(map_row).transpose()
    }

    async fn list(&self, filter: CommissionFilter) -> Result<Vec<Commission>, RepositoryError> {
        let mut sql = String::from("SELECT * FROM commissions");
        let mut conditions: Vec<&str> = Vec::new();
        let mut binds: Vec<String> = Vec::new();

        if let Some(ref booking_id) = filter.booking_id {
            conditions.push("booking_id = ?");
            binds.push(booking_id.to_string());
        }
        if let Some(ref provider_id) = filter.provider_id {
            conditions.push("service_provider_id = ?");
            binds.push(provider_id.to_string());
        }
        if let Some(status) = filter.status {
            conditions.push("status = ?");
            binds.push(status.to_string());
        }

        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at ASC, id ASC");

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

    async fn update_status(
        &self,
        commission: &Commission,
        from: CommissionStatus,
    ) -> Result<Option<Commission>, RepositoryError> {
        let result = sqlx::query(
            "UPDATE commissions SET status = ?, payment_date = ?, updated_at = ?
             WHERE id = ? AND status = ?",
        )
        .bind(commission.status.to_string())
        .bind(commission.payment_date.as_ref().map(format_datetime))
        .bind(format_datetime(&commission.updated_at))
        .bind(commission.id.to_string())
        .bind(from.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_err)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(commission.clone()))
    }

    async fn platform_earnings(&self, range: &RevenueRange) -> Result<f64, RepositoryError> {
        self.sum_paid("platform_earnings", None, range).await
    }

    async fn provider_earnings(
        &self,
        provider_id: &ProviderId,
        range: &RevenueRange,
    ) -> Result<f64, RepositoryError> {
        self.sum_paid("provider_earnings", Some(provider_id), range)
            .await
    }
}
