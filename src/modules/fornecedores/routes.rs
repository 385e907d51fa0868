//! HTTP surface for `/api/fornecedores`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{CreateFornecedor, Fornecedor, TipoFornecedor, UpdateFornecedor};
use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(find).patch(update).delete(remove))
        .with_state(state)
}

#[derive(Deserialize)]
struct ListParams {
    tipo: Option<TipoFornecedor>,
}

async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Fornecedor>>, AppError> {
    Ok(Json(super::list(&state, params.tipo).await?))
}

async fn find(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Fornecedor>, AppError> {
    let fornecedor = super::find_by_id(&state, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Fornecedor não encontrado".into()))?;
    Ok(Json(fornecedor))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateFornecedor>,
) -> Result<(StatusCode, Json<Fornecedor>), AppError> {
    body.validate()?;
    let created = super::create(&state, &body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateFornecedor>,
) -> Result<Json<Fornecedor>, AppError> {
    let updated = super::update(&state, id, &body)
        .await?
        .ok_or_else(|| AppError::NotFound("Fornecedor não encontrado".into()))?;
    Ok(Json(updated))
}

async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
    if super::remove(&state, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Fornecedor não encontrado".into()))
    }
}
