//! Colors used by products with per-color stock control.

mod data_api;
mod pg;
pub mod routes;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::config::BackendMode;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Cor {
    pub id: Uuid,
    pub nome: String,
    /// Optional commercial code (e.g. the supplier's color reference).
    pub codigo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCor {
    pub nome: String,
    #[serde(default)]
    pub codigo: Option<String>,
}

impl CreateCor {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.nome.trim().is_empty() {
            return Err(AppError::Validation("Nome é obrigatório".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCor {
    pub nome: Option<String>,
    pub codigo: Option<String>,
}

impl UpdateCor {
    pub fn validate(&self) -> Result<(), AppError> {
        if matches!(&self.nome, Some(nome) if nome.trim().is_empty()) {
            return Err(AppError::Validation("Nome é obrigatório".into()));
        }
        Ok(())
    }
}

pub async fn list(state: &AppState) -> Result<Vec<Cor>, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::list(state.pg()).await,
        BackendMode::DataApi => data_api::list(state.data_api()?).await,
    }
}

pub async fn find_by_id(state: &AppState, id: Uuid) -> Result<Option<Cor>, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::find_by_id(state.pg(), id).await,
        BackendMode::DataApi => data_api::find_by_id(state.data_api()?, id).await,
    }
}

pub async fn create(state: &AppState, data: &CreateCor) -> Result<Cor, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::create(state.pg(), data).await,
        BackendMode::DataApi => data_api::create(state.data_api()?, data).await,
    }
}

pub async fn update(state: &AppState, id: Uuid, data: &UpdateCor) -> Result<Option<Cor>, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::update(state.pg(), id, data).await,
        BackendMode::DataApi => data_api::update(state.data_api()?, id, data).await,
    }
}

pub async fn remove(state: &AppState, id: Uuid) -> Result<bool, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::remove(state.pg(), id).await,
        BackendMode::DataApi => data_api::remove(state.data_api()?, id).await,
    }
}
