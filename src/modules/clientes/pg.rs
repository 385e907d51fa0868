//! Relational repository for customers.

use sqlx::PgPool;
use uuid::Uuid;

use super::{Cliente, CreateCliente, TipoCliente, UpdateCliente, ERRO_LOJA_UNICA};
use crate::db::pool;
use crate::error::AppError;

const COLS: &str = "id, nome, fone, email, endereco_entrega, tipo, observacoes, created_at, updated_at";

pub async fn list(pg: Option<&PgPool>) -> Result<Vec<Cliente>, AppError> {
    let Some(pg) = pg else { return Ok(Vec::new()) };
    let rows = sqlx::query_as::<_, Cliente>(&format!(
        "SELECT {COLS} FROM clientes ORDER BY tipo, nome"
    ))
    .fetch_all(pg)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pg: Option<&PgPool>, id: Uuid) -> Result<Option<Cliente>, AppError> {
    let Some(pg) = pg else { return Ok(None) };
    let row = sqlx::query_as::<_, Cliente>(&format!("SELECT {COLS} FROM clientes WHERE id = $1"))
        .bind(id)
        .fetch_optional(pg)
        .await?;
    Ok(row)
}

pub async fn find_loja(pg: Option<&PgPool>) -> Result<Option<Cliente>, AppError> {
    let Some(pg) = pg else { return Ok(None) };
    let row = sqlx::query_as::<_, Cliente>(&format!(
        "SELECT {COLS} FROM clientes WHERE tipo = 'loja' LIMIT 1"
    ))
    .fetch_optional(pg)
    .await?;
    Ok(row)
}

pub async fn create(pg: Option<&PgPool>, data: &CreateCliente) -> Result<Cliente, AppError> {
    let pg = pool::require(pg)?;
    let tipo = data.tipo.unwrap_or(TipoCliente::Externo);
    if tipo == TipoCliente::Loja && find_loja(Some(pg)).await?.is_some() {
        return Err(AppError::Validation(ERRO_LOJA_UNICA.into()));
    }
    let row = sqlx::query_as::<_, Cliente>(&format!(
        "INSERT INTO clientes (nome, fone, email, endereco_entrega, tipo, observacoes) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COLS}"
    ))
    .bind(&data.nome)
    .bind(&data.fone)
    .bind(&data.email)
    .bind(&data.endereco_entrega)
    .bind(tipo)
    .bind(&data.observacoes)
    .fetch_one(pg)
    .await?;
    Ok(row)
}

pub async fn update(
    pg: Option<&PgPool>,
    id: Uuid,
    data: &UpdateCliente,
) -> Result<Option<Cliente>, AppError> {
    let pg = pool::require(pg)?;
    if data.tipo == Some(TipoCliente::Loja) {
        if let Some(existing) = find_loja(Some(pg)).await? {
            if existing.id != id {
                return Err(AppError::Validation(ERRO_LOJA_UNICA.into()));
            }
        }
    }
    let row = sqlx::query_as::<_, Cliente>(&format!(
        "UPDATE clientes SET nome = COALESCE($2, nome), fone = COALESCE($3, fone), \
         email = COALESCE($4, email), endereco_entrega = COALESCE($5, endereco_entrega), \
         tipo = COALESCE($6, tipo), observacoes = COALESCE($7, observacoes), updated_at = NOW() \
         WHERE id = $1 RETURNING {COLS}"
    ))
    .bind(id)
    .bind(&data.nome)
    .bind(&data.fone)
    .bind(&data.email)
    .bind(&data.endereco_entrega)
    .bind(data.tipo)
    .bind(&data.observacoes)
    .fetch_optional(pg)
    .await?;
    Ok(row)
}

pub async fn remove(pg: Option<&PgPool>, id: Uuid) -> Result<bool, AppError> {
    let pg = pool::require(pg)?;
    match sqlx::query("DELETE FROM clientes WHERE id = $1")
        .bind(id)
        .execute(pg)
        .await
    {
        Ok(done) => Ok(done.rows_affected() > 0),
        Err(e) => {
            tracing::debug!(%id, error = %e, "remove cliente falhou");
            Ok(false)
        }
    }
}
