//! Backend selection: direct PostgreSQL pool or hosted Data API.

use super::EnvConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    /// Direct relational access through the connection pool.
    Postgres,
    /// Hosted REST data API with the service-role key.
    DataApi,
}

/// Resolves the active backend. The explicit flag, when present, is
/// authoritative; with no flag, a fully configured Data API implies
/// [`BackendMode::DataApi`]; everything else falls back to the direct pool.
/// Recomputed on every call, never cached.
pub fn resolve(config: &EnvConfig) -> BackendMode {
    if let Some(flag) = &config.use_data_api_flag {
        return if flag.eq_ignore_ascii_case("true") {
            BackendMode::DataApi
        } else {
            BackendMode::Postgres
        };
    }
    if config.supabase_url.is_some() && config.supabase_service_role_key.is_some() {
        return BackendMode::DataApi;
    }
    BackendMode::Postgres
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(
        flag: Option<&str>,
        url: Option<&str>,
        key: Option<&str>,
        database_url: Option<&str>,
    ) -> EnvConfig {
        EnvConfig {
            database_url: database_url.map(String::from),
            supabase_url: url.map(String::from),
            supabase_service_role_key: key.map(String::from),
            use_data_api_flag: flag.map(String::from),
            ..EnvConfig::default()
        }
    }

    #[test]
    fn explicit_flag_wins_over_everything() {
        let c = config(Some("true"), None, None, Some("postgres://localhost/x"));
        assert_eq!(resolve(&c), BackendMode::DataApi);

        let c = config(
            Some("false"),
            Some("https://x.supabase.co"),
            Some("key"),
            None,
        );
        assert_eq!(resolve(&c), BackendMode::Postgres);
    }

    #[test]
    fn flag_comparison_is_case_insensitive() {
        let c = config(Some("TRUE"), None, None, None);
        assert_eq!(resolve(&c), BackendMode::DataApi);
        let c = config(Some("True"), None, None, None);
        assert_eq!(resolve(&c), BackendMode::DataApi);
        let c = config(Some("yes"), Some("https://x.supabase.co"), Some("key"), None);
        assert_eq!(resolve(&c), BackendMode::Postgres);
    }

    #[test]
    fn url_and_key_together_imply_data_api() {
        let c = config(None, Some("https://x.supabase.co"), Some("key"), None);
        assert_eq!(resolve(&c), BackendMode::DataApi);
    }

    #[test]
    fn url_or_key_alone_is_not_enough() {
        let c = config(None, Some("https://x.supabase.co"), None, None);
        assert_eq!(resolve(&c), BackendMode::Postgres);
        let c = config(None, None, Some("key"), None);
        assert_eq!(resolve(&c), BackendMode::Postgres);
    }

    #[test]
    fn no_configuration_defaults_to_postgres() {
        assert_eq!(resolve(&EnvConfig::default()), BackendMode::Postgres);
    }
}
