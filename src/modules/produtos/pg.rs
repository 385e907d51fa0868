//! Relational repository for products.

use sqlx::PgPool;
use uuid::Uuid;

use super::{
    CreateProduto, FiltroCategoria, FiltrosProduto, Produto, ProdutoComSaldo, UpdateProduto,
};
use crate::db::pool;
use crate::error::AppError;

// Money and quantity columns are NUMERIC; cast to float8 so rows decode into f64.
const COLS: &str = "id, codigo, descricao, unidade, tipo, preco_compra::float8 AS preco_compra, \
                    preco_venda::float8 AS preco_venda, estoque_minimo::float8 AS estoque_minimo, \
                    estoque_maximo::float8 AS estoque_maximo, fornecedor_principal_id, categoria_id, \
                    prazo_medio_entrega_dias::float8 AS prazo_medio_entrega_dias, created_at, updated_at";

const COLS_P: &str = "p.id, p.codigo, p.descricao, p.unidade, p.tipo, \
                      p.preco_compra::float8 AS preco_compra, p.preco_venda::float8 AS preco_venda, \
                      p.estoque_minimo::float8 AS estoque_minimo, p.estoque_maximo::float8 AS estoque_maximo, \
                      p.fornecedor_principal_id, p.categoria_id, \
                      p.prazo_medio_entrega_dias::float8 AS prazo_medio_entrega_dias, p.created_at, p.updated_at";

const FILTER_CLAUSE: &str = "($1::text IS NULL OR {p}tipo = $1) \
     AND (NOT $2 OR {p}categoria_id IS NOT DISTINCT FROM $3) \
     AND ($4::uuid IS NULL OR {p}fornecedor_principal_id = $4)";

fn filter_clause(prefix: &str) -> String {
    FILTER_CLAUSE.replace("{p}", prefix)
}

fn filter_binds(filtros: FiltrosProduto) -> (Option<&'static str>, bool, Option<Uuid>, Option<Uuid>) {
    let (aplicar_categoria, categoria) = match filtros.categoria {
        FiltroCategoria::Todas => (false, None),
        FiltroCategoria::SemCategoria => (true, None),
        FiltroCategoria::Categoria(id) => (true, Some(id)),
    };
    (
        filtros.tipo.map(|t| t.as_str()),
        aplicar_categoria,
        categoria,
        filtros.fornecedor_id,
    )
}

pub async fn list(pg: Option<&PgPool>, filtros: FiltrosProduto) -> Result<Vec<Produto>, AppError> {
    let Some(pg) = pg else { return Ok(Vec::new()) };
    let (tipo, aplicar_categoria, categoria, fornecedor) = filter_binds(filtros);
    let rows = sqlx::query_as::<_, Produto>(&format!(
        "SELECT {COLS} FROM produtos WHERE {} ORDER BY codigo",
        filter_clause("")
    ))
    .bind(tipo)
    .bind(aplicar_categoria)
    .bind(categoria)
    .bind(fornecedor)
    .fetch_all(pg)
    .await?;
    Ok(rows)
}

pub async fn list_com_saldos(
    pg: Option<&PgPool>,
    filtros: FiltrosProduto,
) -> Result<Vec<ProdutoComSaldo>, AppError> {
    let Some(pg) = pg else { return Ok(Vec::new()) };
    let (tipo, aplicar_categoria, categoria, fornecedor) = filter_binds(filtros);
    let rows = sqlx::query_as::<_, ProdutoComSaldo>(&format!(
        "SELECT {COLS_P}, COALESCE(s.quantidade, 0)::float8 AS saldo \
         FROM produtos p LEFT JOIN saldo_estoque s ON s.produto_id = p.id \
         WHERE {} ORDER BY p.codigo",
        filter_clause("p.")
    ))
    .bind(tipo)
    .bind(aplicar_categoria)
    .bind(categoria)
    .bind(fornecedor)
    .fetch_all(pg)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pg: Option<&PgPool>, id: Uuid) -> Result<Option<Produto>, AppError> {
    let Some(pg) = pg else { return Ok(None) };
    let row = sqlx::query_as::<_, Produto>(&format!("SELECT {COLS} FROM produtos WHERE id = $1"))
        .bind(id)
        .fetch_optional(pg)
        .await?;
    Ok(row)
}

pub async fn create(pg: Option<&PgPool>, data: &CreateProduto) -> Result<Produto, AppError> {
    let pg = pool::require(pg)?;
    let row = sqlx::query_as::<_, Produto>(&format!(
        "INSERT INTO produtos (codigo, descricao, unidade, tipo, preco_compra, preco_venda, \
         estoque_minimo, estoque_maximo, fornecedor_principal_id, categoria_id, prazo_medio_entrega_dias) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING {COLS}"
    ))
    .bind(data.codigo.trim())
    .bind(data.descricao.trim())
    .bind(&data.unidade)
    .bind(data.tipo)
    .bind(data.preco_compra)
    .bind(data.preco_venda)
    .bind(data.estoque_minimo)
    .bind(data.estoque_maximo)
    .bind(data.fornecedor_principal_id)
    .bind(data.categoria_id)
    .bind(data.prazo_medio_entrega_dias)
    .fetch_one(pg)
    .await?;
    Ok(row)
}

pub async fn update(
    pg: Option<&PgPool>,
    id: Uuid,
    data: &UpdateProduto,
) -> Result<Option<Produto>, AppError> {
    let pg = pool::require(pg)?;
    let row = sqlx::query_as::<_, Produto>(&format!(
        "UPDATE produtos SET codigo = COALESCE($2, codigo), descricao = COALESCE($3, descricao), \
         unidade = COALESCE($4, unidade), tipo = COALESCE($5, tipo), \
         preco_compra = COALESCE($6, preco_compra), preco_venda = COALESCE($7, preco_venda), \
         estoque_minimo = COALESCE($8, estoque_minimo), estoque_maximo = COALESCE($9, estoque_maximo), \
         fornecedor_principal_id = COALESCE($10, fornecedor_principal_id), \
         categoria_id = COALESCE($11, categoria_id), \
         prazo_medio_entrega_dias = COALESCE($12, prazo_medio_entrega_dias), updated_at = NOW() \
         WHERE id = $1 RETURNING {COLS}"
    ))
    .bind(id)
    .bind(data.codigo.as_deref().map(str::trim))
    .bind(data.descricao.as_deref().map(str::trim))
    .bind(&data.unidade)
    .bind(data.tipo)
    .bind(data.preco_compra)
    .bind(data.preco_venda)
    .bind(data.estoque_minimo)
    .bind(data.estoque_maximo)
    .bind(data.fornecedor_principal_id)
    .bind(data.categoria_id)
    .bind(data.prazo_medio_entrega_dias)
    .fetch_optional(pg)
    .await?;
    Ok(row)
}

pub async fn remove(pg: Option<&PgPool>, id: Uuid) -> Result<bool, AppError> {
    let pg = pool::require(pg)?;
    match sqlx::query("DELETE FROM produtos WHERE id = $1")
        .bind(id)
        .execute(pg)
        .await
    {
        Ok(done) => Ok(done.rows_affected() > 0),
        Err(e) => {
            tracing::debug!(%id, error = %e, "remove produto falhou");
            Ok(false)
        }
    }
}
