//! Direct PostgreSQL access. The pool connects lazily; a missing
//! `DATABASE_URL` means the relational backend is unavailable and repository
//! reads degrade to empty results while writes report a configuration error.

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use std::str::FromStr;

use crate::config::EnvConfig;
use crate::error::AppError;

/// Managed hosts whose certificates are not in the local trust store; for
/// them the connection encrypts without CA verification.
const MANAGED_HOSTS: &[&str] = &["supabase.co", "supabase.com", "neon.tech", "render.com"];

pub fn is_managed_host(url: &str) -> bool {
    MANAGED_HOSTS.iter().any(|host| url.contains(host))
}

/// Builds the pool when `DATABASE_URL` is configured. `connect_lazy` defers
/// the first connection to the first query.
pub fn build_pool(config: &EnvConfig) -> Result<Option<PgPool>, AppError> {
    let Some(url) = &config.database_url else {
        return Ok(None);
    };
    let mut options = PgConnectOptions::from_str(url)
        .map_err(|e| AppError::Config(format!("DATABASE_URL inválida: {e}")))?;
    if is_managed_host(url) {
        options = options.ssl_mode(PgSslMode::Require);
    }
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect_lazy_with(options);
    Ok(Some(pool))
}

/// The pool, or the configuration error every relational write reports.
pub fn require(pool: Option<&PgPool>) -> Result<&PgPool, AppError> {
    pool.ok_or_else(AppError::database_url_missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn managed_hosts_are_detected() {
        assert!(is_managed_host(
            "postgres://postgres:x@db.abcdefgh.supabase.co:5432/postgres"
        ));
        assert!(is_managed_host(
            "postgres://user:x@ep-calm-dew-123.eu-central-1.aws.neon.tech/app"
        ));
        assert!(!is_managed_host("postgres://localhost:5432/saldao"));
    }

    #[test]
    fn missing_url_builds_no_pool() {
        let pool = build_pool(&EnvConfig::default()).unwrap();
        assert!(pool.is_none());
    }

    #[test]
    fn invalid_url_is_a_config_error() {
        let config = EnvConfig {
            database_url: Some("not a url".into()),
            ..EnvConfig::default()
        };
        assert!(matches!(build_pool(&config), Err(AppError::Config(_))));
    }
}
