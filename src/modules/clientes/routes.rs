//! HTTP surface for `/api/clientes`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use super::{Cliente, CreateCliente, UpdateCliente};
use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/loja", get(loja))
        .route("/:id", get(find).patch(update).delete(remove))
        .with_state(state)
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<Cliente>>, AppError> {
    Ok(Json(super::list(&state).await?))
}

async fn loja(State(state): State<AppState>) -> Result<Json<Cliente>, AppError> {
    let cliente = super::find_loja(&state)
        .await?
        .ok_or_else(|| AppError::NotFound("Cliente Loja não cadastrado".into()))?;
    Ok(Json(cliente))
}

async fn find(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Cliente>, AppError> {
    let cliente = super::find_by_id(&state, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cliente não encontrado".into()))?;
    Ok(Json(cliente))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateCliente>,
) -> Result<(StatusCode, Json<Cliente>), AppError> {
    body.validate()?;
    let created = super::create(&state, &body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCliente>,
) -> Result<Json<Cliente>, AppError> {
    let updated = super::update(&state, id, &body)
        .await?
        .ok_or_else(|| AppError::NotFound("Cliente não encontrado".into()))?;
    Ok(Json(updated))
}

async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
    if super::remove(&state, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Cliente não encontrado".into()))
    }
}
