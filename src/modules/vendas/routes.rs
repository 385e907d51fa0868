//! HTTP surface for `/api/vendas`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::{
    ConfirmarVenda, CreateVenda, FiltrosVenda, ItemPedidoVendaComProduto, PedidoVenda,
    PedidoVendaComCliente, StatusVenda, UpdateVenda,
};
use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(find).patch(update))
        .route("/:id/confirmar", post(confirmar))
        .route("/:id/entregue", post(entregue))
        .with_state(state)
}

#[derive(Deserialize)]
struct ListParams {
    status: Option<StatusVenda>,
    data_inicio: Option<NaiveDate>,
    data_fim: Option<NaiveDate>,
}

async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<PedidoVendaComCliente>>, AppError> {
    let filtros = FiltrosVenda {
        status: params.status,
        data_inicio: params.data_inicio,
        data_fim: params.data_fim,
    };
    Ok(Json(super::list(&state, filtros).await?))
}

#[derive(Serialize)]
struct PedidoComItens {
    #[serde(flatten)]
    pedido: PedidoVendaComCliente,
    itens: Vec<ItemPedidoVendaComProduto>,
}

/// Returns the order with its items inlined.
async fn find(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PedidoComItens>, AppError> {
    let pedido = super::find_by_id(&state, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Pedido não encontrado".into()))?;
    let itens = super::list_itens(&state, id).await?;
    Ok(Json(PedidoComItens { pedido, itens }))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateVenda>,
) -> Result<(StatusCode, Json<PedidoVenda>), AppError> {
    let created = super::create(&state, &body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateVenda>,
) -> Result<Json<PedidoVendaComCliente>, AppError> {
    let updated = super::update(&state, id, &body)
        .await?
        .ok_or_else(|| AppError::NotFound("Pedido não encontrado ou não é rascunho".into()))?;
    Ok(Json(updated))
}

async fn confirmar(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<ConfirmarVenda>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let payload = body.map(|Json(b)| b).unwrap_or_default();
    super::confirmar(&state, id, &payload).await?;
    Ok(Json(json!({ "ok": true })))
}

async fn entregue(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PedidoVenda>, AppError> {
    let pedido = super::marcar_entregue(&state, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Pedido não encontrado ou não confirmado".into()))?;
    Ok(Json(pedido))
}
