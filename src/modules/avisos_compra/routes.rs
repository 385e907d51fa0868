//! HTTP surface for `/api/avisos-compra`.

use axum::{extract::State, routing::get, Json, Router};

use super::AvisoCompra;
use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new().route("/", get(list)).with_state(state)
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<AvisoCompra>>, AppError> {
    Ok(Json(super::list_abaixo_minimo(&state).await?))
}
