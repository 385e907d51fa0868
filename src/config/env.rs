//! Environment-derived configuration, loaded once at startup.
//!
//! Empty variables count as absent, matching how the deployment scripts pass
//! `""` for unset settings.

const DEFAULT_PORT: u16 = 3055;

#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    /// Direct PostgreSQL connection string. Absent means the relational
    /// backend is unavailable.
    pub database_url: Option<String>,
    /// Hosted Data API endpoint (project base URL).
    pub supabase_url: Option<String>,
    /// Service-role key; bypasses row-level security on the Data API.
    pub supabase_service_role_key: Option<String>,
    /// Raw backend-selection flag (`USE_SUPABASE_DATA_API`).
    pub use_data_api_flag: Option<String>,
    pub port: u16,
    /// Origin allowed by the CORS layer; consumed by the frontend deployment.
    pub cors_origin: Option<String>,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let opt = |key: &str| {
            get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let port = opt("PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        EnvConfig {
            database_url: opt("DATABASE_URL"),
            supabase_url: opt("SUPABASE_URL"),
            supabase_service_role_key: opt("SUPABASE_SERVICE_ROLE_KEY"),
            use_data_api_flag: opt("USE_SUPABASE_DATA_API"),
            port,
            cors_origin: opt("CORS_ORIGIN"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn empty_values_count_as_absent() {
        let config = EnvConfig::from_lookup(lookup(&[("SUPABASE_URL", ""), ("DATABASE_URL", "  ")]));
        assert!(config.supabase_url.is_none());
        assert!(config.database_url.is_none());
    }

    #[test]
    fn port_defaults_when_unset_or_invalid() {
        assert_eq!(EnvConfig::from_lookup(lookup(&[])).port, 3055);
        assert_eq!(
            EnvConfig::from_lookup(lookup(&[("PORT", "abc")])).port,
            3055
        );
        assert_eq!(
            EnvConfig::from_lookup(lookup(&[("PORT", "8080")])).port,
            8080
        );
    }
}
