//! Data API repository for customers.

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use super::{Cliente, CreateCliente, TipoCliente, UpdateCliente, ERRO_LOJA_UNICA};
use crate::db::{DataApiClient, Filter, Order, QueryOptions};
use crate::error::AppError;

const TABLE: &str = "clientes";

pub async fn list(client: &DataApiClient) -> Result<Vec<Cliente>, AppError> {
    client
        .select(
            TABLE,
            QueryOptions::ordered_by("tipo").then_ordered_by(Order::asc("nome")),
        )
        .await
}

pub async fn find_by_id(client: &DataApiClient, id: Uuid) -> Result<Option<Cliente>, AppError> {
    client.find_by_id(TABLE, id).await
}

pub async fn find_loja(client: &DataApiClient) -> Result<Option<Cliente>, AppError> {
    let rows: Vec<Cliente> = client
        .select(
            TABLE,
            QueryOptions {
                filters: vec![("tipo", Filter::eq("loja"))],
                limit: Some(1),
                ..QueryOptions::default()
            },
        )
        .await?;
    Ok(rows.into_iter().next())
}

pub async fn create(client: &DataApiClient, data: &CreateCliente) -> Result<Cliente, AppError> {
    let tipo = data.tipo.unwrap_or(TipoCliente::Externo);
    if tipo == TipoCliente::Loja && find_loja(client).await?.is_some() {
        return Err(AppError::Validation(ERRO_LOJA_UNICA.into()));
    }
    client
        .insert_one(
            TABLE,
            &json!({
                "nome": data.nome,
                "fone": data.fone,
                "email": data.email,
                "endereco_entrega": data.endereco_entrega,
                "tipo": tipo,
                "observacoes": data.observacoes,
            }),
        )
        .await
}

pub async fn update(
    client: &DataApiClient,
    id: Uuid,
    data: &UpdateCliente,
) -> Result<Option<Cliente>, AppError> {
    if data.tipo == Some(TipoCliente::Loja) {
        if let Some(existing) = find_loja(client).await? {
            if existing.id != id {
                return Err(AppError::Validation(ERRO_LOJA_UNICA.into()));
            }
        }
    }
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
    if let Some(endereco) = &data.endereco_entrega {
        patch.insert("endereco_entrega".into(), json!(endereco));
    }
    if let Some(tipo) = data.tipo {
        patch.insert("tipo".into(), json!(tipo));
    }
    if let Some(observacoes) = &data.observacoes {
        patch.insert("observacoes".into(), json!(observacoes));
    }
    patch.insert("updated_at".into(), json!(Utc::now()));
    client.update(TABLE, id, &patch).await
}

pub async fn remove(client: &DataApiClient, id: Uuid) -> Result<bool, AppError> {
    match client.delete(TABLE, id).await {
        Ok(()) => Ok(true),
        Err(e) => {
            tracing::debug!(%id, error = %e, "remove cliente falhou");
            Ok(false)
        }
    }
}
