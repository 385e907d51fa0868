//! Shared application state for all routes.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::{self, BackendMode, EnvConfig};
use crate::db::DataApiClient;
use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<EnvConfig>,
    /// Present when `DATABASE_URL` is configured; connects lazily.
    pub pg: Option<PgPool>,
    /// Present when the Data API credentials are configured; built once at
    /// startup and shared by every request.
    pub data_api: Option<Arc<DataApiClient>>,
}

impl AppState {
    pub fn new(config: EnvConfig, pg: Option<PgPool>, data_api: Option<DataApiClient>) -> Self {
        AppState {
            config: Arc::new(config),
            pg,
            data_api: data_api.map(Arc::new),
        }
    }

    /// Active backend, recomputed from configuration on every call.
    pub fn backend(&self) -> BackendMode {
        config::resolve(&self.config)
    }

    pub fn pg(&self) -> Option<&PgPool> {
        self.pg.as_ref()
    }

    /// The Data API client, or the configuration error reported when the
    /// REST backend is selected but not configured.
    pub fn data_api(&self) -> Result<&DataApiClient, AppError> {
        self.data_api.as_deref().ok_or_else(AppError::data_api_missing)
    }
}
