//! Customers. One customer carries the special type `loja` (the store's own
//! walk-in counter) and at most one such row may exist.

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
pub enum TipoCliente {
    Externo,
    Loja,
}

impl TipoCliente {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoCliente::Externo => "externo",
            TipoCliente::Loja => "loja",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Cliente {
    pub id: Uuid,
    pub nome: String,
    pub fone: Option<String>,
    pub email: Option<String>,
    pub endereco_entrega: Option<String>,
    pub tipo: TipoCliente,
    pub observacoes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCliente {
    pub nome: String,
    #[serde(default)]
    pub fone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub endereco_entrega: Option<String>,
    #[serde(default)]
    pub tipo: Option<TipoCliente>,
    #[serde(default)]
    pub observacoes: Option<String>,
}

impl CreateCliente {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.nome.trim().is_empty() {
            return Err(AppError::Validation("Nome é obrigatório".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCliente {
    pub nome: Option<String>,
    pub fone: Option<String>,
    pub email: Option<String>,
    pub endereco_entrega: Option<String>,
    pub tipo: Option<TipoCliente>,
    pub observacoes: Option<String>,
}

pub(crate) const ERRO_LOJA_UNICA: &str = "Já existe um cliente tipo Loja. Só pode haver um.";

pub async fn list(state: &AppState) -> Result<Vec<Cliente>, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::list(state.pg()).await,
        BackendMode::DataApi => data_api::list(state.data_api()?).await,
    }
}

pub async fn find_by_id(state: &AppState, id: Uuid) -> Result<Option<Cliente>, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::find_by_id(state.pg(), id).await,
        BackendMode::DataApi => data_api::find_by_id(state.data_api()?, id).await,
    }
}

/// The store's own customer row, when registered.
pub async fn find_loja(state: &AppState) -> Result<Option<Cliente>, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::find_loja(state.pg()).await,
        BackendMode::DataApi => data_api::find_loja(state.data_api()?).await,
    }
}

pub async fn create(state: &AppState, data: &CreateCliente) -> Result<Cliente, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::create(state.pg(), data).await,
        BackendMode::DataApi => data_api::create(state.data_api()?, data).await,
    }
}

pub async fn update(
    state: &AppState,
    id: Uuid,
    data: &UpdateCliente,
) -> Result<Option<Cliente>, AppError> {
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
