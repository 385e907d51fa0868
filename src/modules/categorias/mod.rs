//! Product categories. Deleting a category clears the reference on its
//! products before removing the row itself.

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
pub struct Categoria {
    pub id: Uuid,
    pub nome: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCategoria {
    pub nome: String,
}

impl CreateCategoria {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.nome.trim().is_empty() {
            return Err(AppError::Validation("Nome é obrigatório".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCategoria {
    pub nome: Option<String>,
}

impl UpdateCategoria {
    pub fn validate(&self) -> Result<(), AppError> {
        if matches!(&self.nome, Some(nome) if nome.trim().is_empty()) {
            return Err(AppError::Validation("Nome é obrigatório".into()));
        }
        Ok(())
    }
}

pub async fn list(state: &AppState) -> Result<Vec<Categoria>, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::list(state.pg()).await,
        BackendMode::DataApi => data_api::list(state.data_api()?).await,
    }
}

pub async fn find_by_id(state: &AppState, id: Uuid) -> Result<Option<Categoria>, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::find_by_id(state.pg(), id).await,
        BackendMode::DataApi => data_api::find_by_id(state.data_api()?, id).await,
    }
}

pub async fn create(state: &AppState, data: &CreateCategoria) -> Result<Categoria, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::create(state.pg(), data).await,
        BackendMode::DataApi => data_api::create(state.data_api()?, data).await,
    }
}

pub async fn update(
    state: &AppState,
    id: Uuid,
    data: &UpdateCategoria,
) -> Result<Option<Categoria>, AppError> {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_a_non_blank_name() {
        assert!(CreateCategoria { nome: "Sofás".into() }.validate().is_ok());
        assert!(CreateCategoria { nome: "   ".into() }.validate().is_err());
    }

    #[test]
    fn update_accepts_an_empty_patch() {
        assert!(UpdateCategoria::default().validate().is_ok());
        assert!(UpdateCategoria { nome: Some("".into()) }.validate().is_err());
    }
}
