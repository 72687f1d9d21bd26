//! Data directory layout for Axum Explorer.
//!
//! The data directory holds `config.toml` and, unless a database URL is
//! configured, the SQLite database `explorer.db`.

use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "EXPLORER_DATA_DIR";

/// Resolve the data directory.
///
/// Priority: `EXPLORER_DATA_DIR`, then `~/.explorer`, then `./.explorer`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".explorer");
    }

    PathBuf::from(".explorer")
}

/// Create the data directory if it does not exist.
pub async fn ensure_data_dir(data_dir: &Path) -> Result<(), std::io::Error> {
    tokio::fs::create_dir_all(data_dir).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_ensure_data_dir_creates_nested() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_data_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
        // Idempotent
        ensure_data_dir(&nested).await.unwrap();
    }

    #[test]
    fn test_resolve_data_dir_from_env() {
        // SAFETY: This test is single-threaded and restores the env var immediately.
        unsafe {
            std::env::set_var(DATA_DIR_ENV, "/tmp/test-explorer");
        }
        let dir = resolve_data_dir();
        assert_eq!(dir, PathBuf::from("/tmp/test-explorer"));
        unsafe {
            std::env::remove_var(DATA_DIR_ENV);
        }
    }
}
