//! HTTP surface for `/api/financeiro`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use super::{
    ContaPagar, ContaReceber, CreateContaPagar, CreateContaReceber, FiltrosConta, Periodo,
    ResumoFinanceiro,
};
use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/contas-a-pagar", get(list_pagar).post(create_pagar))
        .route("/contas-a-pagar/:id/pago", post(pago))
        .route("/contas-a-receber", get(list_receber).post(create_receber))
        .route("/contas-a-receber/:id/recebido", post(recebido))
        .route("/resumo", get(resumo))
        .with_state(state)
}

#[derive(Deserialize)]
struct ListParams {
    status: Option<String>,
    data_inicio: Option<NaiveDate>,
    data_fim: Option<NaiveDate>,
}

impl ListParams {
    fn filtros(self) -> FiltrosConta {
        FiltrosConta {
            status: self.status,
            data_inicio: self.data_inicio,
            data_fim: self.data_fim,
        }
    }
}

async fn list_pagar(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ContaPagar>>, AppError> {
    Ok(Json(
        super::list_contas_pagar(&state, &params.filtros()).await?,
    ))
}

async fn list_receber(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ContaReceber>>, AppError> {
    Ok(Json(
        super::list_contas_receber(&state, &params.filtros()).await?,
    ))
}

async fn create_pagar(
    State(state): State<AppState>,
    Json(body): Json<CreateContaPagar>,
) -> Result<(StatusCode, Json<ContaPagar>), AppError> {
    body.validate()?;
    let created = super::create_conta_pagar(&state, &body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn create_receber(
    State(state): State<AppState>,
    Json(body): Json<CreateContaReceber>,
) -> Result<(StatusCode, Json<ContaReceber>), AppError> {
    body.validate()?;
    let created = super::create_conta_receber(&state, &body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn pago(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ContaPagar>, AppError> {
    let conta = super::marcar_pago(&state, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Conta não encontrada ou já paga".into()))?;
    Ok(Json(conta))
}

async fn recebido(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ContaReceber>, AppError> {
    let conta = super::marcar_recebido(&state, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Conta não encontrada ou já recebida".into()))?;
    Ok(Json(conta))
}

#[derive(Deserialize)]
struct PeriodoParams {
    data_inicio: NaiveDate,
    data_fim: NaiveDate,
}

async fn resumo(
    State(state): State<AppState>,
    Query(params): Query<PeriodoParams>,
) -> Result<Json<ResumoFinanceiro>, AppError> {
    let periodo = Periodo {
        data_inicio: params.data_inicio,
        data_fim: params.data_fim,
    };
    Ok(Json(super::resumo(&state, periodo).await?))
}
