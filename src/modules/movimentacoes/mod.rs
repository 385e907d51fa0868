//! Stock movements: the ledger every balance is derived from. Entries are
//! signed quantities; sales confirmation and stock counting write here.

// The sales module writes its outbound movements through these repositories.
pub(crate) mod data_api;
pub(crate) mod pg;
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
pub enum TipoMovimentacao {
    Entrada,
    Saida,
    Ajuste,
    Producao,
}

impl TipoMovimentacao {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoMovimentacao::Entrada => "entrada",
            TipoMovimentacao::Saida => "saida",
            TipoMovimentacao::Ajuste => "ajuste",
            TipoMovimentacao::Producao => "producao",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Movimentacao {
    pub id: Uuid,
    pub data: NaiveDate,
    pub tipo: TipoMovimentacao,
    pub produto_id: Uuid,
    pub quantidade: f64,
    pub cor_id: Option<Uuid>,
    /// Free-form origin marker (`venda`, `compra`, ...).
    pub origem_tipo: Option<String>,
    pub origem_id: Option<Uuid>,
    pub observacao: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MovimentacaoComProduto {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub movimentacao: Movimentacao,
    pub produto_codigo: Option<String>,
    pub produto_descricao: Option<String>,
    pub cor_nome: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FiltrosMovimentacao {
    pub produto_id: Option<Uuid>,
    pub tipo: Option<TipoMovimentacao>,
    pub data_inicio: Option<NaiveDate>,
    pub data_fim: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMovimentacao {
    #[serde(default)]
    pub data: Option<NaiveDate>,
    pub tipo: TipoMovimentacao,
    pub produto_id: Uuid,
    pub quantidade: f64,
    #[serde(default)]
    pub cor_id: Option<Uuid>,
    #[serde(default)]
    pub origem_tipo: Option<String>,
    #[serde(default)]
    pub origem_id: Option<Uuid>,
    #[serde(default)]
    pub observacao: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AjustePayload {
    pub produto_id: Uuid,
    /// Signed delta applied to the balance.
    pub quantidade: f64,
    #[serde(default)]
    pub observacao: Option<String>,
    #[serde(default)]
    pub cor_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ConferenciaItem {
    pub produto_id: Uuid,
    /// Counted stock; the repository writes the delta as an adjustment.
    pub saldo_atual: f64,
}

#[derive(Debug, Serialize)]
pub struct ConferenciaResultado {
    pub processados: u32,
    pub erros: Vec<String>,
}

pub async fn list(
    state: &AppState,
    filtros: FiltrosMovimentacao,
) -> Result<Vec<MovimentacaoComProduto>, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::list(state.pg(), filtros).await,
        BackendMode::DataApi => data_api::list(state.data_api()?, filtros).await,
    }
}

pub async fn create(state: &AppState, data: &CreateMovimentacao) -> Result<Movimentacao, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::create(state.pg(), data).await,
        BackendMode::DataApi => data_api::create(state.data_api()?, data).await,
    }
}

/// Manual adjustment entry.
pub async fn ajuste(state: &AppState, data: &AjustePayload) -> Result<Movimentacao, AppError> {
    let movimento = CreateMovimentacao {
        data: None,
        tipo: TipoMovimentacao::Ajuste,
        produto_id: data.produto_id,
        quantidade: data.quantidade,
        cor_id: data.cor_id,
        origem_tipo: None,
        origem_id: None,
        observacao: Some(
            data.observacao
                .clone()
                .unwrap_or_else(|| "Ajuste manual".to_string()),
        ),
    };
    create(state, &movimento).await
}

/// Batch stock count: one adjustment per product whose counted balance
/// diverges from the ledger. Per-item failures are collected and processing
/// continues.
pub async fn conferencia(
    state: &AppState,
    itens: &[ConferenciaItem],
) -> Result<ConferenciaResultado, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::conferencia(state.pg(), itens).await,
        BackendMode::DataApi => data_api::conferencia(state.data_api()?, itens).await,
    }
}

/// Current balance of one product (sum of the ledger).
pub async fn saldo_produto(state: &AppState, produto_id: Uuid) -> Result<f64, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::saldo_produto(state.pg(), produto_id).await,
        BackendMode::DataApi => data_api::saldo_produto(state.data_api()?, produto_id).await,
    }
}

pub(crate) fn observacao_conferencia(saldo_anterior: f64, saldo_contado: f64) -> String {
    format!("Conferência: era {saldo_anterior}, ajustado para {saldo_contado}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conferencia_registra_saldos_na_observacao() {
        assert_eq!(
            observacao_conferencia(4.0, 7.0),
            "Conferência: era 4, ajustado para 7"
        );
    }
}
