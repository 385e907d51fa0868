//! HTTP surface for `/api/cores`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use super::{Cor, CreateCor, UpdateCor};
use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(find).patch(update).delete(remove))
        .with_state(state)
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<Cor>>, AppError> {
    Ok(Json(super::list(&state).await?))
}

async fn find(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Cor>, AppError> {
    let cor = super::find_by_id(&state, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cor não encontrada".into()))?;
    Ok(Json(cor))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateCor>,
) -> Result<(StatusCode, Json<Cor>), AppError> {
    body.validate()?;
    let created = super::create(&state, &body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCor>,
) -> Result<Json<Cor>, AppError> {
    body.validate()?;
    let updated = super::update(&state, id, &body)
        .await?
        .ok_or_else(|| AppError::NotFound("Cor não encontrada".into()))?;
    Ok(Json(updated))
}

async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
    if super::remove(&state, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Cor não encontrada".into()))
    }
}
