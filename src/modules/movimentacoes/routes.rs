//! HTTP surface for `/api/movimentacoes-estoque`.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use super::{
    AjustePayload, ConferenciaItem, ConferenciaResultado, CreateMovimentacao,
    FiltrosMovimentacao, Movimentacao, MovimentacaoComProduto, TipoMovimentacao,
};
use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/ajuste", post(ajuste))
        .route("/conferencia", post(conferencia))
        .with_state(state)
}

#[derive(Deserialize)]
struct ListParams {
    produto_id: Option<Uuid>,
    tipo: Option<TipoMovimentacao>,
    data_inicio: Option<NaiveDate>,
    data_fim: Option<NaiveDate>,
}

async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<MovimentacaoComProduto>>, AppError> {
    let filtros = FiltrosMovimentacao {
        produto_id: params.produto_id,
        tipo: params.tipo,
        data_inicio: params.data_inicio,
        data_fim: params.data_fim,
    };
    Ok(Json(super::list(&state, filtros).await?))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateMovimentacao>,
) -> Result<(StatusCode, Json<Movimentacao>), AppError> {
    let created = super::create(&state, &body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn ajuste(
    State(state): State<AppState>,
    Json(body): Json<AjustePayload>,
) -> Result<(StatusCode, Json<Movimentacao>), AppError> {
    let created = super::ajuste(&state, &body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn conferencia(
    State(state): State<AppState>,
    Json(itens): Json<Vec<ConferenciaItem>>,
) -> Result<Json<ConferenciaResultado>, AppError> {
    Ok(Json(super::conferencia(&state, &itens).await?))
}
