//! Accounts payable and receivable, plus the period summary the dashboard
//! shows. Settling an entry stamps the payment/receipt instant and only
//! works from `pendente`.

mod data_api;
mod pg;
pub mod routes;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::config::BackendMode;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum StatusContaPagar {
    Pendente,
    Pago,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum StatusContaReceber {
    Pendente,
    Recebido,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContaPagar {
    pub id: Uuid,
    pub descricao: String,
    pub valor: f64,
    pub vencimento: NaiveDate,
    pub status: StatusContaPagar,
    pub forma_pagamento: Option<String>,
    pub pedido_compra_id: Option<Uuid>,
    pub parcela_numero: Option<i32>,
    pub pago_em: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContaReceber {
    pub id: Uuid,
    pub descricao: String,
    pub valor: f64,
    pub vencimento: NaiveDate,
    pub status: StatusContaReceber,
    pub forma_pagamento: Option<String>,
    pub pedido_venda_id: Option<Uuid>,
    pub parcela_numero: Option<i32>,
    pub recebido_em: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateContaPagar {
    pub descricao: String,
    pub valor: f64,
    pub vencimento: NaiveDate,
    #[serde(default)]
    pub forma_pagamento: Option<String>,
    #[serde(default)]
    pub pedido_compra_id: Option<Uuid>,
    #[serde(default)]
    pub parcela_numero: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CreateContaReceber {
    pub descricao: String,
    pub valor: f64,
    pub vencimento: NaiveDate,
    #[serde(default)]
    pub forma_pagamento: Option<String>,
    #[serde(default)]
    pub pedido_venda_id: Option<Uuid>,
    #[serde(default)]
    pub parcela_numero: Option<i32>,
}

fn validar_descricao(descricao: &str) -> Result<(), AppError> {
    if descricao.trim().is_empty() {
        return Err(AppError::Validation("Descrição é obrigatória".into()));
    }
    Ok(())
}

impl CreateContaPagar {
    pub fn validate(&self) -> Result<(), AppError> {
        validar_descricao(&self.descricao)
    }
}

impl CreateContaReceber {
    pub fn validate(&self) -> Result<(), AppError> {
        validar_descricao(&self.descricao)
    }
}

/// Filters shared by both ledgers; the status string passes through to the
/// backend untyped, as the API always did.
#[derive(Debug, Clone, Default)]
pub struct FiltrosConta {
    pub status: Option<String>,
    pub data_inicio: Option<NaiveDate>,
    pub data_fim: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy)]
pub struct Periodo {
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct ResumoFinanceiro {
    pub total_a_pagar: f64,
    pub total_a_receber: f64,
    pub total_pago: f64,
    pub total_recebido: f64,
    pub pendente_pagar: f64,
    pub pendente_receber: f64,
}

pub async fn list_contas_pagar(
    state: &AppState,
    filtros: &FiltrosConta,
) -> Result<Vec<ContaPagar>, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::list_contas_pagar(state.pg(), filtros).await,
        BackendMode::DataApi => data_api::list_contas_pagar(state.data_api()?, filtros).await,
    }
}

pub async fn list_contas_receber(
    state: &AppState,
    filtros: &FiltrosConta,
) -> Result<Vec<ContaReceber>, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::list_contas_receber(state.pg(), filtros).await,
        BackendMode::DataApi => data_api::list_contas_receber(state.data_api()?, filtros).await,
    }
}

pub async fn create_conta_pagar(
    state: &AppState,
    data: &CreateContaPagar,
) -> Result<ContaPagar, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::create_conta_pagar(state.pg(), data).await,
        BackendMode::DataApi => data_api::create_conta_pagar(state.data_api()?, data).await,
    }
}

pub async fn create_conta_receber(
    state: &AppState,
    data: &CreateContaReceber,
) -> Result<ContaReceber, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::create_conta_receber(state.pg(), data).await,
        BackendMode::DataApi => data_api::create_conta_receber(state.data_api()?, data).await,
    }
}

/// `pendente` → `pago`; `None` when the entry is missing or already settled.
pub async fn marcar_pago(state: &AppState, id: Uuid) -> Result<Option<ContaPagar>, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::marcar_pago(state.pg(), id).await,
        BackendMode::DataApi => data_api::marcar_pago(state.data_api()?, id).await,
    }
}

/// `pendente` → `recebido`; `None` when the entry is missing or settled.
pub async fn marcar_recebido(state: &AppState, id: Uuid) -> Result<Option<ContaReceber>, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::marcar_recebido(state.pg(), id).await,
        BackendMode::DataApi => data_api::marcar_recebido(state.data_api()?, id).await,
    }
}

pub async fn resumo(state: &AppState, periodo: Periodo) -> Result<ResumoFinanceiro, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::resumo(state.pg(), periodo).await,
        BackendMode::DataApi => data_api::resumo(state.data_api()?, periodo).await,
    }
}
