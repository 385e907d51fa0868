//! Saldão de Móveis backend: furniture-retail inventory, sales and finance.
//!
//! Every domain module talks to persistence through one of two backends,
//! a direct PostgreSQL pool or the hosted Data API, selected per call from
//! environment configuration.

pub mod config;
pub mod db;
pub mod error;
pub mod modules;
pub mod routes;
pub mod state;

pub use config::{BackendMode, EnvConfig};
pub use error::AppError;
pub use routes::app_router;
pub use state::AppState;
