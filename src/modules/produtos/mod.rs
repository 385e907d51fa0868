//! Products: resale goods, raw materials and manufactured furniture. Stock
//! balance is derived from the movement ledger (`saldo_estoque` view).

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
pub enum TipoProduto {
    Revenda,
    Insumos,
    Fabricado,
}

impl TipoProduto {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoProduto::Revenda => "revenda",
            TipoProduto::Insumos => "insumos",
            TipoProduto::Fabricado => "fabricado",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Produto {
    pub id: Uuid,
    pub codigo: String,
    pub descricao: String,
    pub unidade: String,
    pub tipo: TipoProduto,
    pub preco_compra: f64,
    pub preco_venda: f64,
    pub estoque_minimo: f64,
    pub estoque_maximo: Option<f64>,
    pub fornecedor_principal_id: Option<Uuid>,
    pub categoria_id: Option<Uuid>,
    /// Average lead time quoted on sales when the product is out of stock.
    pub prazo_medio_entrega_dias: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProdutoComSaldo {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub produto: Produto,
    pub saldo: f64,
}

fn default_unidade() -> String {
    "UN".to_string()
}

#[derive(Debug, Deserialize)]
pub struct CreateProduto {
    pub codigo: String,
    pub descricao: String,
    #[serde(default = "default_unidade")]
    pub unidade: String,
    pub tipo: TipoProduto,
    #[serde(default)]
    pub preco_compra: f64,
    #[serde(default)]
    pub preco_venda: f64,
    #[serde(default)]
    pub estoque_minimo: f64,
    #[serde(default)]
    pub estoque_maximo: Option<f64>,
    #[serde(default)]
    pub fornecedor_principal_id: Option<Uuid>,
    #[serde(default)]
    pub categoria_id: Option<Uuid>,
    #[serde(default)]
    pub prazo_medio_entrega_dias: Option<f64>,
}

impl CreateProduto {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.codigo.trim().is_empty() {
            return Err(AppError::Validation("Código é obrigatório".into()));
        }
        if self.descricao.trim().is_empty() {
            return Err(AppError::Validation("Descrição é obrigatória".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProduto {
    pub codigo: Option<String>,
    pub descricao: Option<String>,
    pub unidade: Option<String>,
    pub tipo: Option<TipoProduto>,
    pub preco_compra: Option<f64>,
    pub preco_venda: Option<f64>,
    pub estoque_minimo: Option<f64>,
    pub estoque_maximo: Option<f64>,
    pub fornecedor_principal_id: Option<Uuid>,
    pub categoria_id: Option<Uuid>,
    pub prazo_medio_entrega_dias: Option<f64>,
}

/// Category list filter: absent, explicitly uncategorized, or one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FiltroCategoria {
    #[default]
    Todas,
    SemCategoria,
    Categoria(Uuid),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FiltrosProduto {
    pub tipo: Option<TipoProduto>,
    pub categoria: FiltroCategoria,
    pub fornecedor_id: Option<Uuid>,
}

pub async fn list(state: &AppState, filtros: FiltrosProduto) -> Result<Vec<Produto>, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::list(state.pg(), filtros).await,
        BackendMode::DataApi => data_api::list(state.data_api()?, filtros).await,
    }
}

pub async fn list_com_saldos(
    state: &AppState,
    filtros: FiltrosProduto,
) -> Result<Vec<ProdutoComSaldo>, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::list_com_saldos(state.pg(), filtros).await,
        BackendMode::DataApi => data_api::list_com_saldos(state.data_api()?, filtros).await,
    }
}

pub async fn find_by_id(state: &AppState, id: Uuid) -> Result<Option<Produto>, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::find_by_id(state.pg(), id).await,
        BackendMode::DataApi => data_api::find_by_id(state.data_api()?, id).await,
    }
}

pub async fn create(state: &AppState, data: &CreateProduto) -> Result<Produto, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::create(state.pg(), data).await,
        BackendMode::DataApi => data_api::create(state.data_api()?, data).await,
    }
}

pub async fn update(
    state: &AppState,
    id: Uuid,
    data: &UpdateProduto,
) -> Result<Option<Produto>, AppError> {
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
    fn create_requires_codigo_and_descricao() {
        let payload: CreateProduto = serde_json::from_value(serde_json::json!({
            "codigo": "SOF-001",
            "descricao": "Sofá 3 lugares",
            "tipo": "revenda",
        }))
        .unwrap();
        assert!(payload.validate().is_ok());
        assert_eq!(payload.unidade, "UN");
        assert_eq!(payload.preco_venda, 0.0);

        let blank: CreateProduto = serde_json::from_value(serde_json::json!({
            "codigo": "  ",
            "descricao": "x",
            "tipo": "revenda",
        }))
        .unwrap();
        assert!(blank.validate().is_err());
    }

    #[test]
    fn tipo_rejects_unknown_values() {
        let result: Result<CreateProduto, _> = serde_json::from_value(serde_json::json!({
            "codigo": "X",
            "descricao": "y",
            "tipo": "servico",
        }));
        assert!(result.is_err());
    }
}
