//! Data API repository for colors.

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use super::{Cor, CreateCor, UpdateCor};
use crate::db::{DataApiClient, QueryOptions};
use crate::error::AppError;

const TABLE: &str = "cores";

pub async fn list(client: &DataApiClient) -> Result<Vec<Cor>, AppError> {
    client.select(TABLE, QueryOptions::ordered_by("nome")).await
}

pub async fn find_by_id(client: &DataApiClient, id: Uuid) -> Result<Option<Cor>, AppError> {
    client.find_by_id(TABLE, id).await
}

pub async fn create(client: &DataApiClient, data: &CreateCor) -> Result<Cor, AppError> {
    client
        .insert_one(
            TABLE,
            &json!({
                "nome": data.nome.trim(),
                "codigo": data.codigo.as_deref().map(str::trim),
            }),
        )
        .await
}

pub async fn update(
    client: &DataApiClient,
    id: Uuid,
    data: &UpdateCor,
) -> Result<Option<Cor>, AppError> {
    if find_by_id(client, id).await?.is_none() {
        return Ok(None);
    }
    let mut patch = serde_json::Map::new();
    if let Some(nome) = &data.nome {
        patch.insert("nome".into(), json!(nome.trim()));
    }
    if let Some(codigo) = &data.codigo {
        patch.insert("codigo".into(), json!(codigo.trim()));
    }
    patch.insert("updated_at".into(), json!(Utc::now()));
    client.update(TABLE, id, &patch).await
}

pub async fn remove(client: &DataApiClient, id: Uuid) -> Result<bool, AppError> {
    match client.delete(TABLE, id).await {
        Ok(()) => Ok(true),
        Err(e) => {
            tracing::debug!(%id, error = %e, "remove cor falhou");
            Ok(false)
        }
    }
}
