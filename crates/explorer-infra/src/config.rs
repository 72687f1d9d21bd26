//! Configuration loader for Axum Explorer.
//!
//! Reads `config.toml` from the data directory (`~/.explorer/` in production)
//! and deserializes it into [`ExplorerConfig`]. Falls back to defaults when
//! the file is missing or malformed, then applies environment overrides.

use std::path::Path;

use explorer_types::commission::CommissionRates;
use explorer_types::config::ExplorerConfig;
use explorer_types::error::ConfigError;

pub const TOKEN_SECRET_ENV: &str = "EXPLORER_TOKEN_SECRET";
pub const PORT_ENV: &str = "EXPLORER_PORT";
pub const DATABASE_URL_ENV: &str = "EXPLORER_DATABASE_URL";

/// Load configuration from `{data_dir}/config.toml` plus environment overrides.
///
/// - If the file does not exist, starts from [`ExplorerConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and uses the default.
/// - Out-of-bounds commission rates are replaced by the defaults.
///
/// # Errors
///
/// Fails when the configured token secret is shorter than
/// `MIN_TOKEN_SECRET_LEN` (32) bytes.
pub async fn load_config(data_dir: &Path) -> Result<ExplorerConfig, ConfigError> {
    let config = read_config_file(data_dir).await;
    let config = apply_env_overrides(config, |key| std::env::var(key).ok());
    let config = sanitize(config);
    check_secret(&config)?;
    Ok(config)
}

fn check_secret(config: &ExplorerConfig) -> Result<(), ConfigError> {
    config.auth.validate_secret()?;
    if config.auth.uses_default_secret() {
        tracing::warn!(
            "using the built-in token secret; set {TOKEN_SECRET_ENV} or auth.token_secret in production"
        );
    }
    Ok(())
}

async fn read_config_file(data_dir: &Path) -> ExplorerConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ExplorerConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ExplorerConfig::default();
        }
    };

    match toml::from_str::<ExplorerConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ExplorerConfig::default()
        }
    }
}

/// Apply `EXPLORER_*` overrides using `lookup` to read variables.
pub fn apply_env_overrides(
    mut config: ExplorerConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> ExplorerConfig {
    if let Some(secret) = lookup(TOKEN_SECRET_ENV).filter(|s| !s.is_empty()) {
        config.auth.token_secret = secret;
    }
    if let Some(port) = lookup(PORT_ENV) {
        match port.parse::<u16>() {
            Ok(port) => config.server.port = port,
            Err(err) => tracing::warn!("Ignoring {PORT_ENV}={port}: {err}"),
        }
    }
    if let Some(url) = lookup(DATABASE_URL_ENV).filter(|s| !s.is_empty()) {
        config.database.url = Some(url);
    }
    config
}

fn sanitize(mut config: ExplorerConfig) -> ExplorerConfig {
    if let Err(reason) = config.commission.validate() {
        tracing::warn!("{reason}, using default commission rates");
        config.commission = CommissionRates::default();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[tokio::test]
    async fn read_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = read_config_file(tmp.path()).await;
        assert_eq!(config.server.port, 3000);
        assert!(config.database.url.is_none());
    }

    #[tokio::test]
    async fn read_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[server]
host = "0.0.0.0"
port = 8088

[database]
url = "sqlite:///var/lib/explorer/data.db"

[auth]
token_ttl_hours = 24
"#,
        )
        .await
        .unwrap();

        let config = read_config_file(tmp.path()).await;
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8088);
        assert_eq!(
            config.database.url.as_deref(),
            Some("sqlite:///var/lib/explorer/data.db")
        );
        assert_eq!(config.auth.token_ttl_hours, 24);
    }

    #[tokio::test]
    async fn read_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = read_config_file(tmp.path()).await;
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn env_overrides_take_precedence() {
        let config = apply_env_overrides(
            ExplorerConfig::default(),
            env(&[
                (TOKEN_SECRET_ENV, "from-env"),
                (PORT_ENV, "9090"),
                (DATABASE_URL_ENV, "sqlite::memory:"),
            ]),
        );
        assert_eq!(config.auth.token_secret, "from-env");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.url.as_deref(), Some("sqlite::memory:"));
    }

    #[test]
    fn invalid_port_override_is_ignored() {
        let config = apply_env_overrides(ExplorerConfig::default(), env(&[(PORT_ENV, "http")]));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn out_of_bounds_rates_fall_back_to_defaults() {
        let mut config = ExplorerConfig::default();
        config.commission.guide = 0.5;
        let config = sanitize(config);
        assert_eq!(config.commission, CommissionRates::default());

        let mut config = ExplorerConfig::default();
        config.commission.hotel = 0.15;
        let config = sanitize(config);
        assert!((config.commission.hotel - 0.15).abs() < f64::EPSILON);
    }

    #[test]
    fn short_token_secret_is_rejected() {
        let config = apply_env_overrides(
            ExplorerConfig::default(),
            env(&[(TOKEN_SECRET_ENV, "too-short")]),
        );
        assert!(matches!(
            check_secret(&config),
            Err(ConfigError::WeakTokenSecret { len: 9, .. })
        ));

        let config = apply_env_overrides(
            ExplorerConfig::default(),
            env(&[(TOKEN_SECRET_ENV, "0123456789abcdef0123456789abcdef")]),
        );
        assert!(check_secret(&config).is_ok());
        assert!(check_secret(&ExplorerConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn load_config_fails_on_weak_file_secret() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            "[auth]\ntoken_secret = \"hunter2\"\n",
        )
        .await
        .unwrap();

        // Only meaningful when the environment does not override the secret.
        if std::env::var(TOKEN_SECRET_ENV).is_err() {
            assert!(load_config(tmp.path()).await.is_err());
        }
    }
}
