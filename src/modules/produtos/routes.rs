//! HTTP surface for `/api/produtos`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{
    CreateProduto, FiltroCategoria, FiltrosProduto, Produto, TipoProduto, UpdateProduto,
};
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
    /// `saldos=1` includes the current stock balance per product.
    saldos: Option<String>,
    tipo: Option<TipoProduto>,
    /// `""` or `"null"` selects uncategorized products.
    categoria_id: Option<String>,
    fornecedor_id: Option<Uuid>,
}

impl ListParams {
    fn filtros(&self) -> Result<FiltrosProduto, AppError> {
        let categoria = match self.categoria_id.as_deref() {
            None => FiltroCategoria::Todas,
            Some("") | Some("null") => FiltroCategoria::SemCategoria,
            Some(raw) => {
                let id = raw
                    .parse()
                    .map_err(|_| AppError::BadRequest("categoria_id inválida".into()))?;
                FiltroCategoria::Categoria(id)
            }
        };
        Ok(FiltrosProduto {
            tipo: self.tipo,
            categoria,
            fornecedor_id: self.fornecedor_id,
        })
    }
}

async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<axum::response::Response, AppError> {
    use axum::response::IntoResponse;
    let filtros = params.filtros()?;
    if params.saldos.as_deref() == Some("1") {
        let produtos = super::list_com_saldos(&state, filtros).await?;
        Ok(Json(produtos).into_response())
    } else {
        let produtos = super::list(&state, filtros).await?;
        Ok(Json(produtos).into_response())
    }
}

async fn find(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Produto>, AppError> {
    let produto = super::find_by_id(&state, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Produto não encontrado".into()))?;
    Ok(Json(produto))
}

async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateProduto>,
) -> Result<(StatusCode, Json<Produto>), AppError> {
    body.validate()?;
    let created = super::create(&state, &body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateProduto>,
) -> Result<Json<Produto>, AppError> {
    let updated = super::update(&state, id, &body)
        .await?
        .ok_or_else(|| AppError::NotFound("Produto não encontrado".into()))?;
    Ok(Json(updated))
}

async fn remove(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
    if super::remove(&state, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Produto não encontrado".into()))
    }
}
