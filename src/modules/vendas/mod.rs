//! Sales orders. An order starts as a draft, is confirmed (which writes the
//! outbound stock movements) and finally marked as delivered. Raw materials
//! (`insumos`) cannot be sold; manufactured items may be sold without stock
//! when a delivery estimate is given.

mod data_api;
mod pg;
pub mod routes;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::config::BackendMode;
use crate::error::AppError;
use crate::modules::produtos::TipoProduto;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TipoEntrega {
    Retirada,
    Entrega,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum StatusVenda {
    Rascunho,
    Confirmado,
    Entregue,
    Cancelado,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PedidoVenda {
    pub id: Uuid,
    pub cliente_id: Option<Uuid>,
    pub data_pedido: NaiveDate,
    pub tipo_entrega: TipoEntrega,
    pub status: StatusVenda,
    pub endereco_entrega: Option<String>,
    pub observacoes: Option<String>,
    /// Items plus freight.
    pub total: f64,
    /// Delivery promise in days when an item is sold without stock.
    pub previsao_entrega_em_dias: Option<i32>,
    pub distancia_km: Option<f64>,
    pub valor_frete: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PedidoVendaComCliente {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub pedido: PedidoVenda,
    pub cliente_nome: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ItemPedidoVenda {
    pub id: Uuid,
    pub pedido_venda_id: Uuid,
    pub produto_id: Uuid,
    pub quantidade: f64,
    pub preco_unitario: f64,
    pub total_item: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ItemPedidoVendaComProduto {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub item: ItemPedidoVenda,
    pub produto_codigo: Option<String>,
    pub produto_descricao: Option<String>,
    pub produto_tipo: Option<TipoProduto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateItemVenda {
    pub produto_id: Uuid,
    pub quantidade: f64,
    pub preco_unitario: f64,
}

#[derive(Debug, Deserialize)]
pub struct CreateVenda {
    #[serde(default)]
    pub cliente_id: Option<Uuid>,
    #[serde(default)]
    pub data_pedido: Option<NaiveDate>,
    pub tipo_entrega: TipoEntrega,
    #[serde(default)]
    pub endereco_entrega: Option<String>,
    #[serde(default)]
    pub observacoes: Option<String>,
    #[serde(default)]
    pub previsao_entrega_em_dias: Option<i32>,
    #[serde(default)]
    pub distancia_km: Option<f64>,
    #[serde(default)]
    pub valor_frete: Option<f64>,
    pub itens: Vec<CreateItemVenda>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateVenda {
    pub cliente_id: Option<Uuid>,
    pub data_pedido: Option<NaiveDate>,
    pub tipo_entrega: Option<TipoEntrega>,
    pub endereco_entrega: Option<String>,
    pub observacoes: Option<String>,
    pub previsao_entrega_em_dias: Option<i32>,
    pub distancia_km: Option<f64>,
    pub valor_frete: Option<f64>,
    pub itens: Option<Vec<CreateItemVenda>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfirmarVenda {
    #[serde(default)]
    pub previsao_entrega_em_dias: Option<i32>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FiltrosVenda {
    pub status: Option<StatusVenda>,
    pub data_inicio: Option<NaiveDate>,
    pub data_fim: Option<NaiveDate>,
}

impl StatusVenda {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusVenda::Rascunho => "rascunho",
            StatusVenda::Confirmado => "confirmado",
            StatusVenda::Entregue => "entregue",
            StatusVenda::Cancelado => "cancelado",
        }
    }
}

pub(crate) fn total_itens(itens: &[CreateItemVenda]) -> f64 {
    itens
        .iter()
        .map(|item| item.quantidade * item.preco_unitario)
        .sum()
}

pub(crate) fn erro_insumos(codigos: &[String]) -> AppError {
    AppError::Validation(format!(
        "Na venda só são permitidos produtos de revenda ou fabricação. Remova os insumos: {}",
        codigos.join(", ")
    ))
}

pub(crate) fn erro_sem_estoque(codigos: &[String]) -> AppError {
    AppError::Validation(format!(
        "Apenas produtos fabricados podem ser vendidos sem estoque. \
         Ajuste as quantidades ou remova: {}",
        codigos.join(", ")
    ))
}

pub(crate) const ERRO_PREVISAO: &str = "Há itens fabricados sem estoque. Informe a previsão de \
     entrega em dias (ex.: 7) para confirmar a venda.";

/// Short order reference used on movement annotations.
pub(crate) fn referencia_pedido(id: Uuid) -> String {
    format!("Venda {}", &id.to_string()[..8])
}

pub async fn list(
    state: &AppState,
    filtros: FiltrosVenda,
) -> Result<Vec<PedidoVendaComCliente>, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::list(state.pg(), filtros).await,
        BackendMode::DataApi => data_api::list(state.data_api()?, filtros).await,
    }
}

pub async fn find_by_id(
    state: &AppState,
    id: Uuid,
) -> Result<Option<PedidoVendaComCliente>, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::find_by_id(state.pg(), id).await,
        BackendMode::DataApi => data_api::find_by_id(state.data_api()?, id).await,
    }
}

pub async fn list_itens(
    state: &AppState,
    pedido_id: Uuid,
) -> Result<Vec<ItemPedidoVendaComProduto>, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::list_itens(state.pg(), pedido_id).await,
        BackendMode::DataApi => data_api::list_itens(state.data_api()?, pedido_id).await,
    }
}

pub async fn create(state: &AppState, data: &CreateVenda) -> Result<PedidoVenda, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::create(state.pg(), data).await,
        BackendMode::DataApi => data_api::create(state.data_api()?, data).await,
    }
}

/// Draft orders only; replaces the item list when one is supplied.
pub async fn update(
    state: &AppState,
    id: Uuid,
    data: &UpdateVenda,
) -> Result<Option<PedidoVendaComCliente>, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::update(state.pg(), id, data).await,
        BackendMode::DataApi => data_api::update(state.data_api()?, id, data).await,
    }
}

/// Confirms a draft: checks stock, writes the outbound movements and moves
/// the order to `confirmado`.
pub async fn confirmar(state: &AppState, id: Uuid, data: &ConfirmarVenda) -> Result<(), AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::confirmar(state.pg(), id, data).await,
        BackendMode::DataApi => data_api::confirmar(state.data_api()?, id, data).await,
    }
}

pub async fn marcar_entregue(state: &AppState, id: Uuid) -> Result<Option<PedidoVenda>, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::marcar_entregue(state.pg(), id).await,
        BackendMode::DataApi => data_api::marcar_entregue(state.data_api()?, id).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantidade: f64, preco_unitario: f64) -> CreateItemVenda {
        CreateItemVenda {
            produto_id: Uuid::new_v4(),
            quantidade,
            preco_unitario,
        }
    }

    #[test]
    fn total_soma_itens() {
        let itens = [item(2.0, 150.0), item(1.0, 89.9)];
        assert!((total_itens(&itens) - 389.9).abs() < 1e-9);
        assert_eq!(total_itens(&[]), 0.0);
    }

    #[test]
    fn referencia_usa_oito_primeiros_caracteres() {
        let id: Uuid = "6fa459ea-ee8a-3ca4-894e-db77e160355e".parse().unwrap();
        assert_eq!(referencia_pedido(id), "Venda 6fa459ea");
    }

    #[test]
    fn erro_de_insumos_lista_os_codigos() {
        let err = erro_insumos(&["MDF-18".to_string(), "COLA-01".to_string()]);
        let msg = err.to_string();
        assert!(msg.contains("MDF-18, COLA-01"));
        assert!(msg.contains("revenda ou fabricação"));
    }
}
