//! Data API repository for product categories.

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use super::{Categoria, CreateCategoria, UpdateCategoria};
use crate::db::{DataApiClient, Filter, QueryOptions};
use crate::error::AppError;

const TABLE: &str = "categorias_produto";

pub async fn list(client: &DataApiClient) -> Result<Vec<Categoria>, AppError> {
    client.select(TABLE, QueryOptions::ordered_by("nome")).await
}

pub async fn find_by_id(client: &DataApiClient, id: Uuid) -> Result<Option<Categoria>, AppError> {
    client.find_by_id(TABLE, id).await
}

pub async fn create(client: &DataApiClient, data: &CreateCategoria) -> Result<Categoria, AppError> {
    client
        .insert_one(TABLE, &json!({ "nome": data.nome.trim() }))
        .await
}

pub async fn update(
    client: &DataApiClient,
    id: Uuid,
    data: &UpdateCategoria,
) -> Result<Option<Categoria>, AppError> {
    if find_by_id(client, id).await?.is_none() {
        return Ok(None);
    }
    let mut patch = serde_json::Map::new();
    if let Some(nome) = &data.nome {
        patch.insert("nome".into(), json!(nome.trim()));
    }
    patch.insert("updated_at".into(), json!(Utc::now()));
    client.update(TABLE, id, &patch).await
}

/// Mirrors the relational cleanup: clear product references, then delete.
/// Any backend error collapses to `false`.
pub async fn remove(client: &DataApiClient, id: Uuid) -> Result<bool, AppError> {
    let result = async {
        client
            .update_matching(
                "produtos",
                &[("categoria_id", Filter::eq(id))],
                &json!({ "categoria_id": null }),
            )
            .await?;
        client.delete(TABLE, id).await
    }
    .await;
    match result {
        Ok(()) => Ok(true),
        Err(e) => {
            tracing::debug!(%id, error = %e, "remove categoria falhou");
            Ok(false)
        }
    }
}
