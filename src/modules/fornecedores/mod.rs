//! Suppliers, optionally segmented between raw-material and resale partners.

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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TipoFornecedor {
    Insumos,
    Revenda,
}

impl TipoFornecedor {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoFornecedor::Insumos => "insumos",
            TipoFornecedor::Revenda => "revenda",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Fornecedor {
    pub id: Uuid,
    pub nome: String,
    pub fone: Option<String>,
    pub email: Option<String>,
    pub contato: Option<String>,
    pub observacoes: Option<String>,
    pub tipo: Option<TipoFornecedor>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateFornecedor {
    pub nome: String,
    #[serde(default)]
    pub fone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub contato: Option<String>,
    #[serde(default)]
    pub observacoes: Option<String>,
    #[serde(default)]
    pub tipo: Option<TipoFornecedor>,
}

impl CreateFornecedor {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.nome.trim().is_empty() {
            return Err(AppError::Validation("Nome é obrigatório".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateFornecedor {
    pub nome: Option<String>,
    pub fone: Option<String>,
    pub email: Option<String>,
    pub contato: Option<String>,
    pub observacoes: Option<String>,
    pub tipo: Option<TipoFornecedor>,
}

pub async fn list(
    state: &AppState,
    tipo: Option<TipoFornecedor>,
) -> Result<Vec<Fornecedor>, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::list(state.pg(), tipo).await,
        BackendMode::DataApi => data_api::list(state.data_api()?, tipo).await,
    }
}

pub async fn find_by_id(state: &AppState, id: Uuid) -> Result<Option<Fornecedor>, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::find_by_id(state.pg(), id).await,
        BackendMode::DataApi => data_api::find_by_id(state.data_api()?, id).await,
    }
}

pub async fn create(state: &AppState, data: &CreateFornecedor) -> Result<Fornecedor, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::create(state.pg(), data).await,
        BackendMode::DataApi => data_api::create(state.data_api()?, data).await,
    }
}

pub async fn update(
    state: &AppState,
    id: Uuid,
    data: &UpdateFornecedor,
) -> Result<Option<Fornecedor>, AppError> {
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
