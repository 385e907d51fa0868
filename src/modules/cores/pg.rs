//! Relational repository for colors.

use sqlx::PgPool;
use uuid::Uuid;

use super::{Cor, CreateCor, UpdateCor};
use crate::db::pool;
use crate::error::AppError;

const COLS: &str = "id, nome, codigo, created_at, updated_at";

pub async fn list(pg: Option<&PgPool>) -> Result<Vec<Cor>, AppError> {
    let Some(pg) = pg else { return Ok(Vec::new()) };
    let rows = sqlx::query_as::<_, Cor>(&format!("SELECT {COLS} FROM cores ORDER BY nome"))
        .fetch_all(pg)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pg: Option<&PgPool>, id: Uuid) -> Result<Option<Cor>, AppError> {
    let Some(pg) = pg else { return Ok(None) };
    let row = sqlx::query_as::<_, Cor>(&format!("SELECT {COLS} FROM cores WHERE id = $1"))
        .bind(id)
        .fetch_optional(pg)
        .await?;
    Ok(row)
}

pub async fn create(pg: Option<&PgPool>, data: &CreateCor) -> Result<Cor, AppError> {
    let pg = pool::require(pg)?;
    let row = sqlx::query_as::<_, Cor>(&format!(
        "INSERT INTO cores (nome, codigo) VALUES ($1, $2) RETURNING {COLS}"
    ))
    .bind(data.nome.trim())
    .bind(data.codigo.as_deref().map(str::trim))
    .fetch_one(pg)
    .await?;
    Ok(row)
}

pub async fn update(pg: Option<&PgPool>, id: Uuid, data: &UpdateCor) -> Result<Option<Cor>, AppError> {
    let pg = pool::require(pg)?;
    let row = sqlx::query_as::<_, Cor>(&format!(
        "UPDATE cores SET nome = COALESCE($2, nome), codigo = COALESCE($3, codigo), \
         updated_at = NOW() WHERE id = $1 RETURNING {COLS}"
    ))
    .bind(id)
    .bind(data.nome.as_deref().map(str::trim))
    .bind(data.codigo.as_deref().map(str::trim))
    .fetch_optional(pg)
    .await?;
    Ok(row)
}

pub async fn remove(pg: Option<&PgPool>, id: Uuid) -> Result<bool, AppError> {
    let pg = pool::require(pg)?;
    match sqlx::query("DELETE FROM cores WHERE id = $1")
        .bind(id)
        .execute(pg)
        .await
    {
        Ok(done) => Ok(done.rows_affected() > 0),
        Err(e) => {
            tracing::debug!(%id, error = %e, "remove cor falhou");
            Ok(false)
        }
    }
}
