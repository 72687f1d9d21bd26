//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod booking;
pub mod commission;
pub mod pool;
pub mod provider;
pub mod user;

use chrono::{DateTime, SecondsFormat, Utc};
use explorer_types::error::RepositoryError;

/// Parse a stored RFC3339 timestamp.
pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width UTC form, so string comparison in SQL orders chronologically.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn query_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.message().contains("UNIQUE"))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datetime_format_is_sortable_and_roundtrips() {
        let earlier = Utc::now();
        let later = earlier + chrono::Duration::milliseconds(1500);
        let (a, b) = (format_datetime(&earlier), format_datetime(&later));
        assert!(a < b);
        assert!(a.ends_with('Z'));
        let parsed = parse_datetime(&a).unwrap();
        assert_eq!(format_datetime(&parsed), a);
    }
}
