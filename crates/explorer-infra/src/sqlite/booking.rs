//! SQLite booking repository implementation.
//!
//! Booked services are stored as a JSON array on the booking row. Commission
//! rows are written and cancelled in the same transaction as their booking.

use chrono::{DateTime, Utc};
use explorer_core::repository::SortOrder;
use explorer_core::repository::booking::{BookingFilter, BookingRepository};
use explorer_types::booking::{BookedService, Booking, BookingId, BookingStatus};
use explorer_types::commission::Commission;
use explorer_types::error::RepositoryError;
use explorer_types::user::UserId;
use sqlx::Row;

use super::commission::insert_commission;
use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_err};

/// SQLite-backed implementation of `BookingRepository`.
pub struct SqliteBookingRepository {
    pool: DatabasePool,
}

impl SqliteBookingRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct BookingRow {
    id: String,
    user_id: String,
    package_name: String,
    services: String,
    total_cost: f64,
    commission_earned: f64,
    status: String,
    start_date: String,
    end_date: String,
    traveler_count: i64,
    special_requests: Option<String>,
    created_at: String,
    updated_at: String,
}

impl BookingRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            package_name: row.try_get("package_name")?,
            services: row.try_get("services")?,
            total_cost: row.try_get("total_cost")?,
            commission_earned: row.try_get("commission_earned")?,
            status: row.try_get("status")?,
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            traveler_count: row.try_get("traveler_count")?,
            special_requests: row.try_get("special_requests")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_booking(self) -> Result<Booking, RepositoryError> {
        let id = self
            .id
            .parse::<BookingId>()
            .map_err(|e| RepositoryError::Query(format!("invalid booking id: {e}")))?;
        let user_id = self
            .user_id
            .parse::<UserId>()
            .map_err(|e| RepositoryError::Query(format!("invalid user id: {e}")))?;
        let status: BookingStatus = self
            .status
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let services: Vec<BookedService> = serde_json::from_str(&self.services)
            .map_err(|e| RepositoryError::Query(format!("invalid services JSON: {e}")))?;
        let traveler_count = u32::try_from(self.traveler_count)
            .map_err(|e| RepositoryError::Query(format!("invalid traveler count: {e}")))?;

        Ok(Booking {
            id,
            user_id,
            package_name: self.package_name,
            services,
            total_cost: self.total_cost,
            commission_earned: self.commission_earned,
            status,
            start_date: parse_datetime(&self.start_date)?,
            end_date: parse_datetime(&self.end_date)?,
            traveler_count,
            special_requests: self.special_requests,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

fn map_row(row: &sqlx::sqlite::SqliteRow) -> Result<Booking, RepositoryError> {
    BookingRow::from_row(row).map_err(query_err)?.into_booking()
}

impl BookingRepository for SqliteBookingRepository {
    async fn create_with_commissions(
        &self,
        booking: &Booking,
        commissions: &[Commission],
    ) -> Result<Booking, RepositoryError> {
        let services_json = serde_json::to_string(&booking.services)
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut tx = self.pool.writer.begin().await.map_err(query_err)?;

        sqlx::query(
            "INSERT INTO bookings (id, user_id, package_name, services, total_cost, commission_earned, status, start_date, end_date, traveler_count, special_requests, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(booking.id.to_string())
        .bind(booking.user_id.to_string())
        .bind(&booking.package_name)
        .bind(&services_json)
        .bind(booking.total_cost)
        .bind(booking.commission_earned)
        .bind(booking.status.to_string())
        .bind(format_datetime(&booking.start_date))
        .bind(format_datetime(&booking.end_date))
        .bind(i64::from(booking.traveler_count))
        .bind(&booking.special_requests)
        .bind(format_datetime(&booking.created_at))
        .bind(format_datetime(&booking.updated_at))
        .execute(&mut *tx)
        .await
        .map_err(query_err)?;

        for commission in commissions {
            insert_commission(&mut *tx, commission)
                .await
                .map_err(query_err)?;
        }

        tx.commit().await.map_err(query_err)?;

        Ok(booking.clone())
    }

    async fn get_by_id(&self, id: &BookingId) -> Result<Option<Booking>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM bookings WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        row.as_ref().map(map_row).transpose()
    }

    async fn list(&self, filter: BookingFilter) -> Result<Vec<Booking>, RepositoryError> {
        let mut sql = String::from("SELECT * FROM bookings");
        let mut conditions: Vec<&str> = Vec::new();
        let mut binds: Vec<String> = Vec::new();

        if let Some(ref user_id) = filter.user_id {
            conditions.push("user_id = ?");
            binds.push(user_id.to_string());
        }
        if let Some(status) = filter.status {
            conditions.push("status = ?");
            binds.push(status.to_string());
        }

        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        let order = match filter.sort_order.unwrap_or_default() {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        sql.push_str(&format!(" ORDER BY created_at {order}, id {order}"));

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
        id: &BookingId,
        from: BookingStatus,
        to: BookingStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Booking>, RepositoryError> {
        let result = sqlx::query(
            "UPDATE bookings SET status = ?, updated_at = ? WHERE id = ? AND status = ?",
        )
        .bind(to.to_string())
        .bind(format_datetime(&at))
        .bind(id.to_string())
        .bind(from.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_err)?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    async fn cancel_with_commissions(
        &self,
        id: &BookingId,
        from: BookingStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Booking>, RepositoryError> {
        let at = format_datetime(&at);
        let mut tx = self.pool.writer.begin().await.map_err(query_err)?;

        let result = sqlx::query(
            "UPDATE bookings SET status = 'cancelled', updated_at = ? WHERE id = ? AND status = ?",
        )
        .bind(&at)
        .bind(id.to_string())
        .bind(from.to_string())
        .execute(&mut *tx)
        .await
        .map_err(query_err)?;

        if result.rows_affected() == 0 {
            // Dropping the transaction rolls it back.
            return Ok(None);
        }

        sqlx::query(
            "UPDATE commissions SET status = 'cancelled', updated_at = ?
             WHERE booking_id = ? AND status = 'pending'",
        )
        .bind(&at)
        .bind(id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(query_err)?;

        tx.commit().await.map_err(query_err)?;

        self.get_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::commission::SqliteCommissionRepository;
    use crate::sqlite::test_support::{insert_user, test_pool};
    use chrono::TimeZone;
    use explorer_core::repository::commission::{CommissionFilter, CommissionRepository};
    use explorer_types::booking::{
        CarRentalDetails, CreateBookingRequest, HotelDetails, ServiceDetails,
    };
    use explorer_core::service::booking::BookingService;
    use explorer_core::service::commission::CommissionService;
    use explorer_types::commission::{CommissionRates, CommissionStatus};
    use explorer_types::config::PricingConfig;
    use explorer_types::error::{BookingError, CommissionError};
    use explorer_types::provider::ProviderId;
    use explorer_types::user::UserRole;
    use std::sync::Arc;

    type Services = (
        Arc<BookingService<SqliteBookingRepository, SqliteCommissionRepository>>,
        Arc<CommissionService<SqliteCommissionRepository>>,
    );

    fn services(pool: &DatabasePool) -> Services {
        let commissions = Arc::new(CommissionService::new(
            SqliteCommissionRepository::new(pool.clone()),
            CommissionRates::default(),
        ));
        let bookings = Arc::new(BookingService::new(
            SqliteBookingRepository::new(pool.clone()),
            Arc::clone(&commissions),
            PricingConfig::default(),
        ));
        (bookings, commissions)
    }

    fn make_booking(user_id: &UserId) -> (Booking, Vec<Commission>) {
        let rates = CommissionRates::default();
        let booking = Booking::create(
            user_id.clone(),
            CreateBookingRequest {
                package_name: "Danakil expedition".to_string(),
                services: vec![
                    BookedService {
                        service_provider_id: ProviderId::new(),
                        details: ServiceDetails::Hotel(HotelDetails {
                            room_type: Some("twin".to_string()),
                            room_rate: Some(5000.0),
                            rooms: Some(1),
                        }),
                        price: 10_000.0,
                    },
                    BookedService {
                        service_provider_id: ProviderId::new(),
                        details: ServiceDetails::CarRental(CarRentalDetails {
                            vehicle_type: Some("4x4".to_string()),
                            daily_rate: Some(2000.0),
                            pickup_location: Some("Mekele".to_string()),
                        }),
                        price: 4000.0,
                    },
                ],
                start_date: Utc.with_ymd_and_hms(2026, 11, 2, 8, 0, 0).unwrap(),
                end_date: Utc.with_ymd_and_hms(2026, 11, 4, 8, 0, 0).unwrap(),
                traveler_count: 4,
                special_requests: Some("extra water".to_string()),
            },
            &rates,
        )
        .unwrap();

        let commissions = booking
            .services
            .iter()
            .map(|s| {
                Commission::create(
                    booking.id.clone(),
                    s.service_provider_id.clone(),
                    s.service_type(),
                    s.price,
                    rates.rate_for(s.service_type()),
                )
            })
            .collect();
        (booking, commissions)
    }

    #[tokio::test]
    async fn test_create_with_commissions_roundtrip() {
        let pool = test_pool().await;
        let user = insert_user(&pool, "traveler@example.com", UserRole::Tourist).await;
        let repo = SqliteBookingRepository::new(pool.clone());
        let commissions_repo = SqliteCommissionRepository::new(pool);

        let (booking, commissions) = make_booking(&user.id);
        repo.create_with_commissions(&booking, &commissions)
            .await
            .unwrap();

        let found = repo.get_by_id(&booking.id).await.unwrap().unwrap();
        assert_eq!(found.services, booking.services);
        assert_eq!(found.start_date, booking.start_date);
        assert_eq!(found.traveler_count, 4);
        assert_eq!(found.special_requests.as_deref(), Some("extra water"));
        assert!((found.total_cost - 14_000.0).abs() < 1e-9);

        let stored = commissions_repo
            .list(CommissionFilter {
                booking_id: Some(booking.id.clone()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_commission_insert_rolls_back_booking() {
        let pool = test_pool().await;
        let user = insert_user(&pool, "traveler@example.com", UserRole::Tourist).await;
        let repo = SqliteBookingRepository::new(pool);

        let (booking, mut commissions) = make_booking(&user.id);
        // Duplicate primary key makes the second insert fail.
        commissions[1].id = commissions[0].id.clone();

        assert!(
            repo.create_with_commissions(&booking, &commissions)
                .await
                .is_err()
        );
        assert!(repo.get_by_id(&booking.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_by_user_and_status() {
        let pool = test_pool().await;
        let ana = insert_user(&pool, "ana@example.com", UserRole::Tourist).await;
        let ben = insert_user(&pool, "ben@example.com", UserRole::Tourist).await;
        let repo = SqliteBookingRepository::new(pool);

        let (first, c1) = make_booking(&ana.id);
        let (second, c2) = make_booking(&ana.id);
        let (third, c3) = make_booking(&ben.id);
        repo.create_with_commissions(&first, &c1).await.unwrap();
        repo.create_with_commissions(&second, &c2).await.unwrap();
        repo.create_with_commissions(&third, &c3).await.unwrap();

        let anas = repo
            .list(BookingFilter {
                user_id: Some(ana.id.clone()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(anas.len(), 2);
        assert_eq!(anas[0].id, second.id);

        repo.update_status(
            &third.id,
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            Utc::now(),
        )
            .await
            .unwrap();
        let confirmed = repo
            .list(BookingFilter {
                status: Some(BookingStatus::Confirmed),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(confirmed.len(), 1);
        assert_eq!(confirmed[0].id, third.id);
    }

    #[tokio::test]
    async fn test_update_status_missing_returns_none() {
        let pool = test_pool().await;
        let repo = SqliteBookingRepository::new(pool);
        let result = repo
            .update_status(
                &BookingId::new(),
                BookingStatus::Pending,
                BookingStatus::Confirmed,
                Utc::now(),
            )
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_update_status_requires_expected_status() {
        let pool = test_pool().await;
        let user = insert_user(&pool, "traveler@example.com", UserRole::Tourist).await;
        let repo = SqliteBookingRepository::new(pool);

        let (booking, commissions) = make_booking(&user.id);
        repo.create_with_commissions(&booking, &commissions)
            .await
            .unwrap();
        repo.cancel_with_commissions(&booking.id, BookingStatus::Pending, Utc::now())
            .await
            .unwrap()
            .unwrap();

        let stale = repo
            .update_status(
                &booking.id,
                BookingStatus::Pending,
                BookingStatus::Confirmed,
                Utc::now(),
            )
            .await
            .unwrap();
        assert!(stale.is_none());

        let stored = repo.get_by_id(&booking.id).await.unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::Cancelled);

        let again = repo
            .cancel_with_commissions(&booking.id, BookingStatus::Pending, Utc::now())
            .await
            .unwrap();
        assert!(again.is_none());
    }

    #[tokio::test]
    async fn test_cancel_with_commissions_leaves_paid_rows() {
        let pool = test_pool().await;
        let user = insert_user(&pool, "traveler@example.com", UserRole::Tourist).await;
        let repo = SqliteBookingRepository::new(pool.clone());
        let commissions_repo = SqliteCommissionRepository::new(pool);

        let (booking, commissions) = make_booking(&user.id);
        repo.create_with_commissions(&booking, &commissions)
            .await
            .unwrap();

        let mut paid = commissions[0].clone();
        paid.mark_as_paid(Utc::now()).unwrap();
        commissions_repo
            .update_status(&paid, CommissionStatus::Pending)
            .await
            .unwrap()
            .unwrap();

        let cancelled = repo
            .cancel_with_commissions(&booking.id, BookingStatus::Pending, Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        let first = commissions_repo
            .get_by_id(&commissions[0].id)
            .await
            .unwrap()
            .unwrap();
        let second = commissions_repo
            .get_by_id(&commissions[1].id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.status, CommissionStatus::Paid);
        assert_eq!(second.status, CommissionStatus::Cancelled);

        assert!(
            repo.cancel_with_commissions(&BookingId::new(), BookingStatus::Pending, Utc::now())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_confirm_and_cancel_end_cancelled() {
        let pool = test_pool().await;
        let user = insert_user(&pool, "racer@example.com", UserRole::Tourist).await;
        let repo = SqliteBookingRepository::new(pool.clone());
        let commissions_repo = SqliteCommissionRepository::new(pool.clone());
        let (bookings, _) = services(&pool);

        for _ in 0..50 {
            let (booking, rows) = make_booking(&user.id);
            repo.create_with_commissions(&booking, &rows).await.unwrap();

            let confirm = tokio::spawn({
                let bookings = Arc::clone(&bookings);
                let id = booking.id.clone();
                async move { bookings.confirm_booking(&id).await }
            });
            let cancel = tokio::spawn({
                let bookings = Arc::clone(&bookings);
                let id = booking.id.clone();
                async move { bookings.cancel_booking(&id).await }
            });

            let confirm = confirm.await.unwrap();
            let cancel = cancel.await.unwrap();

            // Cancel is legal from both pending and confirmed, so it always lands.
            assert_eq!(cancel.unwrap().status, BookingStatus::Cancelled);
            if let Err(e) = confirm {
                assert!(matches!(
                    e,
                    BookingError::InvalidTransition {
                        from: BookingStatus::Cancelled,
                        ..
                    }
                ));
            }

            let stored = repo.get_by_id(&booking.id).await.unwrap().unwrap();
            assert_eq!(stored.status, BookingStatus::Cancelled);

            let rows = commissions_repo
                .list(CommissionFilter {
                    booking_id: Some(booking.id.clone()),
                    ..Default::default()
                })
                .await
                .unwrap();
            assert!(rows.iter().all(|c| c.status == CommissionStatus::Cancelled));
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_payout_and_cancel_agree() {
        let pool = test_pool().await;
        let user = insert_user(&pool, "payout@example.com", UserRole::Tourist).await;
        let repo = SqliteBookingRepository::new(pool.clone());
        let commissions_repo = SqliteCommissionRepository::new(pool.clone());
        let (bookings, commissions) = services(&pool);

        for _ in 0..50 {
            let (booking, rows) = make_booking(&user.id);
            repo.create_with_commissions(&booking, &rows).await.unwrap();
            let commission_id = rows[0].id.clone();

            let pay = tokio::spawn({
                let commissions = Arc::clone(&commissions);
                let id = commission_id.clone();
                async move { commissions.mark_commission_as_paid(&id).await }
            });
            let cancel = tokio::spawn({
                let bookings = Arc::clone(&bookings);
                let id = booking.id.clone();
                async move { bookings.cancel_booking(&id).await }
            });

            let pay = pay.await.unwrap();
            cancel.await.unwrap().unwrap();

            let stored = commissions_repo
                .get_by_id(&commission_id)
                .await
                .unwrap()
                .unwrap();
            match pay {
                Ok(_) => {
                    assert_eq!(stored.status, CommissionStatus::Paid);
                    assert!(stored.payment_date.is_some());
                }
                Err(e) => {
                    assert!(matches!(
                        e,
                        CommissionError::InvalidTransition {
                            from: CommissionStatus::Cancelled,
                            ..
                        }
                    ));
                    assert_eq!(stored.status, CommissionStatus::Cancelled);
                    assert!(stored.payment_date.is_none());
                }
            }
        }
    }
}
