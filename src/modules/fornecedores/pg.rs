//! Relational repository for suppliers.

use sqlx::PgPool;
use uuid::Uuid;

use super::{CreateFornecedor, Fornecedor, TipoFornecedor, UpdateFornecedor};
use crate::db::pool;
use crate::error::AppError;

const COLS: &str = "id, nome, fone, email, contato, observacoes, tipo, created_at, updated_at";

pub async fn list(
    pg: Option<&PgPool>,
    tipo: Option<TipoFornecedor>,
) -> Result<Vec<Fornecedor>, AppError> {
    let Some(pg) = pg else { return Ok(Vec::new()) };
    let rows = sqlx::query_as::<_, Fornecedor>(&format!(
        "SELECT {COLS} FROM fornecedores WHERE ($1::text IS NULL OR tipo = $1) ORDER BY nome"
    ))
    .bind(tipo.map(|t| t.as_str()))
    .fetch_all(pg)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pg: Option<&PgPool>, id: Uuid) -> Result<Option<Fornecedor>, AppError> {
    let Some(pg) = pg else { return Ok(None) };
    let row = sqlx::query_as::<_, Fornecedor>(&format!(
        "SELECT {COLS} FROM fornecedores WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pg)
    .await?;
    Ok(row)
}

pub async fn create(pg: Option<&PgPool>, data: &CreateFornecedor) -> Result<Fornecedor, AppError> {
    let pg = pool::require(pg)?;
    let row = sqlx::query_as::<_, Fornecedor>(&format!(
        "INSERT INTO fornecedores (nome, fone, email, contato, observacoes, tipo) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {COLS}"
    ))
    .bind(&data.nome)
    .bind(&data.fone)
    .bind(&data.email)
    .bind(&data.contato)
    .bind(&data.observacoes)
    .bind(data.tipo)
    .fetch_one(pg)
    .await?;
    Ok(row)
}

pub async fn update(
    pg: Option<&PgPool>,
    id: Uuid,
    data: &UpdateFornecedor,
) -> Result<Option<Fornecedor>, AppError> {
    let pg = pool::require(pg)?;
    let row = sqlx::query_as::<_, Fornecedor>(&format!(
        "UPDATE fornecedores SET nome = COALESCE($2, nome), fone = COALESCE($3, fone), \
         email = COALESCE($4, email), contato = COALESCE($5, contato), \
         observacoes = COALESCE($6, observacoes), tipo = COALESCE($7, tipo), updated_at = NOW() \
         WHERE id = $1 RETURNING {COLS}"
    ))
    .bind(id)
    .bind(&data.nome)
    .bind(&data.fone)
    .bind(&data.email)
    .bind(&data.contato)
    .bind(&data.observacoes)
    .bind(data.tipo)
    .fetch_optional(pg)
    .await?;
    Ok(row)
}

pub async fn remove(pg: Option<&PgPool>, id: Uuid) -> Result<bool, AppError> {
    let pg = pool::require(pg)?;
    match sqlx::query("DELETE FROM fornecedores WHERE id = $1")
        .bind(id)
        .execute(pg)
        .await
    {
        Ok(done) => Ok(done.rows_affected() > 0),
        Err(e) => {
            tracing::debug!(%id, error = %e, "remove fornecedor falhou");
            Ok(false)
        }
    }
}
