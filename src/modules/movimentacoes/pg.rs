//! Relational repository for stock movements.

use sqlx::PgPool;
use uuid::Uuid;

use super::{
    observacao_conferencia, ConferenciaItem, ConferenciaResultado, CreateMovimentacao,
    FiltrosMovimentacao, Movimentacao, MovimentacaoComProduto,
};
use crate::db::pool;
use crate::error::AppError;

const COLS: &str = "id, data, tipo, produto_id, quantidade::float8 AS quantidade, cor_id, \
                    origem_tipo, origem_id, observacao, created_at";

const COLS_M: &str = "m.id, m.data, m.tipo, m.produto_id, m.quantidade::float8 AS quantidade, \
                      m.cor_id, m.origem_tipo, m.origem_id, m.observacao, m.created_at";

pub async fn list(
    pg: Option<&PgPool>,
    filtros: FiltrosMovimentacao,
) -> Result<Vec<MovimentacaoComProduto>, AppError> {
    let Some(pg) = pg else { return Ok(Vec::new()) };
    let rows = sqlx::query_as::<_, MovimentacaoComProduto>(&format!(
        "SELECT {COLS_M}, p.codigo AS produto_codigo, p.descricao AS produto_descricao, \
         c.nome AS cor_nome \
         FROM movimentacoes_estoque m \
         JOIN produtos p ON p.id = m.produto_id \
         LEFT JOIN cores c ON c.id = m.cor_id \
         WHERE ($1::uuid IS NULL OR m.produto_id = $1) \
           AND ($2::text IS NULL OR m.tipo = $2) \
           AND ($3::date IS NULL OR m.data >= $3) \
           AND ($4::date IS NULL OR m.data <= $4) \
         ORDER BY m.data DESC, m.created_at DESC"
    ))
    .bind(filtros.produto_id)
    .bind(filtros.tipo.map(|t| t.as_str()))
    .bind(filtros.data_inicio)
    .bind(filtros.data_fim)
    .fetch_all(pg)
    .await?;
    Ok(rows)
}

pub async fn create(
    pg: Option<&PgPool>,
    data: &CreateMovimentacao,
) -> Result<Movimentacao, AppError> {
    let pg = pool::require(pg)?;
    let dia = data
        .data
        .unwrap_or_else(|| chrono::Utc::now().date_naive());
    let row = sqlx::query_as::<_, Movimentacao>(&format!(
        "INSERT INTO movimentacoes_estoque (data, tipo, produto_id, quantidade, cor_id, \
         origem_tipo, origem_id, observacao) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING {COLS}"
    ))
    .bind(dia)
    .bind(data.tipo)
    .bind(data.produto_id)
    .bind(data.quantidade)
    .bind(data.cor_id)
    .bind(&data.origem_tipo)
    .bind(data.origem_id)
    .bind(&data.observacao)
    .fetch_one(pg)
    .await?;
    Ok(row)
}

pub async fn saldo_produto(pg: Option<&PgPool>, produto_id: Uuid) -> Result<f64, AppError> {
    let Some(pg) = pg else { return Ok(0.0) };
    let (saldo,): (f64,) = sqlx::query_as(
        "SELECT COALESCE(SUM(quantidade), 0)::float8 FROM movimentacoes_estoque WHERE produto_id = $1",
    )
    .bind(produto_id)
    .fetch_one(pg)
    .await?;
    Ok(saldo)
}

pub async fn conferencia(
    pg: Option<&PgPool>,
    itens: &[ConferenciaItem],
) -> Result<ConferenciaResultado, AppError> {
    let pg_ref = pool::require(pg)?;
    let mut processados = 0;
    let mut erros = Vec::new();
    for item in itens {
        let saldo = match saldo_produto(Some(pg_ref), item.produto_id).await {
            Ok(saldo) => saldo,
            Err(e) => {
                erros.push(format!("{}: {e}", item.produto_id));
                continue;
            }
        };
        let diff = item.saldo_atual - saldo;
        if diff.abs() < 1e-6 {
            continue;
        }
        let movimento = CreateMovimentacao {
            data: None,
            tipo: super::TipoMovimentacao::Ajuste,
            produto_id: item.produto_id,
            quantidade: diff,
            cor_id: None,
            origem_tipo: None,
            origem_id: None,
            observacao: Some(observacao_conferencia(saldo, item.saldo_atual)),
        };
        match create(Some(pg_ref), &movimento).await {
            Ok(_) => processados += 1,
            Err(e) => erros.push(format!("{}: {e}", item.produto_id)),
        }
    }
    Ok(ConferenciaResultado { processados, erros })
}
