//! Data API repository for suppliers.

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use super::{CreateFornecedor, Fornecedor, TipoFornecedor, UpdateFornecedor};
use crate::db::{DataApiClient, Filter, QueryOptions};
use crate::error::AppError;

const TABLE: &str = "fornecedores";

pub async fn list(
    client: &DataApiClient,
    tipo: Option<TipoFornecedor>,
) -> Result<Vec<Fornecedor>, AppError> {
    let mut options = QueryOptions::ordered_by("nome");
    if let Some(tipo) = tipo {
        options = options.filter("tipo", Filter::eq(tipo.as_str()));
    }
    client.select(TABLE, options).await
}

pub async fn find_by_id(client: &DataApiClient, id: Uuid) -> Result<Option<Fornecedor>, AppError> {
    client.find_by_id(TABLE, id).await
}

pub async fn create(client: &DataApiClient, data: &CreateFornecedor) -> Result<Fornecedor, AppError> {
    client
        .insert_one(
            TABLE,
            &json!({
                "nome": data.nome,
                "fone": data.fone,
                "email": data.email,
                "contato": data.contato,
                "observacoes": data.observacoes,
                "tipo": data.tipo,
            }),
        )
        .await
}

pub async fn update(
    client: &DataApiClient,
    id: Uuid,
    data: &UpdateFornecedor,
) -> Result<Option<Fornecedor>, AppError> {
    if find_by_id(client, id).await?.is_none() {
        return Ok(None);
    }
    let mut patch = serde_json::Map::new();
    if let Some(nome) = &data.nome {
        patch.insert("nome".into(), json!(nome));
    }
    if let Some(fone) = &data.fone {
        patch.insert("fone".into(), json!(fone));
    }
    if let Some(email) = &data.email {
        patch.insert("email".into(), json!(email));
    }
    if let Some(contato) = &data.contato {
        patch.insert("contato".into(), json!(contato));
    }
    if let Some(observacoes) = &data.observacoes {
        patch.insert("observacoes".into(), json!(observacoes));
    }
    if let Some(tipo) = data.tipo {
        patch.insert("tipo".into(), json!(tipo));
    }
    patch.insert("updated_at".into(), json!(Utc::now()));
    client.update(TABLE, id, &patch).await
}

pub async fn remove(client: &DataApiClient, id: Uuid) -> Result<bool, AppError> {
    match client.delete(TABLE, id).await {
        Ok(()) => Ok(true),
        Err(e) => {
            tracing::debug!(%id, error = %e, "remove fornecedor falhou");
            Ok(false)
        }
    }
}
