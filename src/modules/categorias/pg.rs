//! Relational repository for product categories.

use sqlx::PgPool;
use uuid::Uuid;

use super::{Categoria, CreateCategoria, UpdateCategoria};
use crate::db::pool;
use crate::error::AppError;

const COLS: &str = "id, nome, created_at, updated_at";

pub async fn list(pg: Option<&PgPool>) -> Result<Vec<Categoria>, AppError> {
    let Some(pg) = pg else { return Ok(Vec::new()) };
    let rows = sqlx::query_as::<_, Categoria>(&format!(
        "SELECT {COLS} FROM categorias_produto ORDER BY nome"
    ))
    .fetch_all(pg)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pg: Option<&PgPool>, id: Uuid) -> Result<Option<Categoria>, AppError> {
    let Some(pg) = pg else { return Ok(None) };
    let row = sqlx::query_as::<_, Categoria>(&format!(
        "SELECT {COLS} FROM categorias_produto WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pg)
    .await?;
    Ok(row)
}

pub async fn create(pg: Option<&PgPool>, data: &CreateCategoria) -> Result<Categoria, AppError> {
    let pg = pool::require(pg)?;
    let row = sqlx::query_as::<_, Categoria>(&format!(
        "INSERT INTO categorias_produto (nome) VALUES ($1) RETURNING {COLS}"
    ))
    .bind(data.nome.trim())
    .fetch_one(pg)
    .await?;
    Ok(row)
}

pub async fn update(
    pg: Option<&PgPool>,
    id: Uuid,
    data: &UpdateCategoria,
) -> Result<Option<Categoria>, AppError> {
    let pg = pool::require(pg)?;
    let row = sqlx::query_as::<_, Categoria>(&format!(
        "UPDATE categorias_produto SET nome = COALESCE($2, nome), updated_at = NOW() \
         WHERE id = $1 RETURNING {COLS}"
    ))
    .bind(id)
    .bind(data.nome.as_deref().map(str::trim))
    .fetch_optional(pg)
    .await?;
    Ok(row)
}

/// Clears `produtos.categoria_id` before deleting the category. The two
/// statements are sequential, not atomic; any backend error collapses to
/// `false`.
pub async fn remove(pg: Option<&PgPool>, id: Uuid) -> Result<bool, AppError> {
    let pg = pool::require(pg)?;
    let result = async {
        sqlx::query("UPDATE produtos SET categoria_id = NULL WHERE categoria_id = $1")
            .bind(id)
            .execute(pg)
            .await?;
        sqlx::query("DELETE FROM categorias_produto WHERE id = $1")
            .bind(id)
            .execute(pg)
            .await
    }
    .await;
    match result {
        Ok(done) => Ok(done.rows_affected() > 0),
        Err(e) => {
            tracing::debug!(%id, error = %e, "remove categoria falhou");
            Ok(false)
        }
    }
}
