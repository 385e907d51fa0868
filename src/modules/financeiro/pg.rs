//! Relational repository for the financial ledgers.

use sqlx::PgPool;
use uuid::Uuid;

use super::{
    ContaPagar, ContaReceber, CreateContaPagar, CreateContaReceber, FiltrosConta, Periodo,
    ResumoFinanceiro,
};
use crate::db::pool;
use crate::error::AppError;

const COLS_PAGAR: &str = "id, descricao, valor::float8 AS valor, vencimento, status, \
                          forma_pagamento, pedido_compra_id, parcela_numero, pago_em, \
                          created_at, updated_at";

const COLS_RECEBER: &str = "id, descricao, valor::float8 AS valor, vencimento, status, \
                            forma_pagamento, pedido_venda_id, parcela_numero, recebido_em, \
                            created_at, updated_at";

pub async fn list_contas_pagar(
    pg: Option<&PgPool>,
    filtros: &FiltrosConta,
) -> Result<Vec<ContaPagar>, AppError> {
    let Some(pg) = pg else { return Ok(Vec::new()) };
    let rows = sqlx::query_as::<_, ContaPagar>(&format!(
        "SELECT {COLS_PAGAR} FROM contas_a_pagar \
         WHERE ($1::text IS NULL OR status = $1) \
           AND ($2::date IS NULL OR vencimento >= $2) \
           AND ($3::date IS NULL OR vencimento <= $3) \
         ORDER BY vencimento"
    ))
    .bind(&filtros.status)
    .bind(filtros.data_inicio)
    .bind(filtros.data_fim)
    .fetch_all(pg)
    .await?;
    Ok(rows)
}

pub async fn list_contas_receber(
    pg: Option<&PgPool>,
    filtros: &FiltrosConta,
) -> Result<Vec<ContaReceber>, AppError> {
    let Some(pg) = pg else { return Ok(Vec::new()) };
    let rows = sqlx::query_as::<_, ContaReceber>(&format!(
        "SELECT {COLS_RECEBER} FROM contas_a_receber \
         WHERE ($1::text IS NULL OR status = $1) \
           AND ($2::date IS NULL OR vencimento >= $2) \
           AND ($3::date IS NULL OR vencimento <= $3) \
         ORDER BY vencimento"
    ))
    .bind(&filtros.status)
    .bind(filtros.data_inicio)
    .bind(filtros.data_fim)
    .fetch_all(pg)
    .await?;
    Ok(rows)
}

pub async fn create_conta_pagar(
    pg: Option<&PgPool>,
    data: &CreateContaPagar,
) -> Result<ContaPagar, AppError> {
    let pg = pool::require(pg)?;
    let row = sqlx::query_as::<_, ContaPagar>(&format!(
        "INSERT INTO contas_a_pagar (descricao, valor, vencimento, forma_pagamento, \
         pedido_compra_id, parcela_numero) VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING {COLS_PAGAR}"
    ))
    .bind(&data.descricao)
    .bind(data.valor)
    .bind(data.vencimento)
    .bind(&data.forma_pagamento)
    .bind(data.pedido_compra_id)
    .bind(data.parcela_numero)
    .fetch_one(pg)
    .await?;
    Ok(row)
}

pub async fn create_conta_receber(
    pg: Option<&PgPool>,
    data: &CreateContaReceber,
) -> Result<ContaReceber, AppError> {
    let pg = pool::require(pg)?;
    let row = sqlx::query_as::<_, ContaReceber>(&format!(
        "INSERT INTO contas_a_receber (descricao, valor, vencimento, forma_pagamento, \
         pedido_venda_id, parcela_numero) VALUES ($1, $2, $3, $4, $5, $6) \
         RETURNING {COLS_RECEBER}"
    ))
    .bind(&data.descricao)
    .bind(data.valor)
    .bind(data.vencimento)
    .bind(&data.forma_pagamento)
    .bind(data.pedido_venda_id)
    .bind(data.parcela_numero)
    .fetch_one(pg)
    .await?;
    Ok(row)
}

pub async fn marcar_pago(pg: Option<&PgPool>, id: Uuid) -> Result<Option<ContaPagar>, AppError> {
    let Some(pg) = pg else { return Ok(None) };
    let row = sqlx::query_as::<_, ContaPagar>(&format!(
        "UPDATE contas_a_pagar SET status = 'pago', pago_em = NOW(), updated_at = NOW() \
         WHERE id = $1 AND status = 'pendente' RETURNING {COLS_PAGAR}"
    ))
    .bind(id)
    .fetch_optional(pg)
    .await?;
    Ok(row)
}

pub async fn marcar_recebido(
    pg: Option<&PgPool>,
    id: Uuid,
) -> Result<Option<ContaReceber>, AppError> {
    let Some(pg) = pg else { return Ok(None) };
    let row = sqlx::query_as::<_, ContaReceber>(&format!(
        "UPDATE contas_a_receber SET status = 'recebido', recebido_em = NOW(), updated_at = NOW() \
         WHERE id = $1 AND status = 'pendente' RETURNING {COLS_RECEBER}"
    ))
    .bind(id)
    .fetch_optional(pg)
    .await?;
    Ok(row)
}

async fn soma(pg: &PgPool, sql: &str, periodo: Option<Periodo>) -> Result<f64, AppError> {
    let mut query = sqlx::query_as::<_, (f64,)>(sql);
    if let Some(periodo) = periodo {
        query = query.bind(periodo.data_inicio).bind(periodo.data_fim);
    }
    let (total,) = query.fetch_one(pg).await?;
    Ok(total)
}

pub async fn resumo(pg: Option<&PgPool>, periodo: Periodo) -> Result<ResumoFinanceiro, AppError> {
    let Some(pg) = pg else {
        return Ok(ResumoFinanceiro::default());
    };
    let total_a_pagar = soma(
        pg,
        "SELECT COALESCE(SUM(valor), 0)::float8 FROM contas_a_pagar \
         WHERE vencimento BETWEEN $1 AND $2",
        Some(periodo),
    )
    .await?;
    let total_a_receber = soma(
        pg,
        "SELECT COALESCE(SUM(valor), 0)::float8 FROM contas_a_receber \
         WHERE vencimento BETWEEN $1 AND $2",
        Some(periodo),
    )
    .await?;
    let total_pago = soma(
        pg,
        "SELECT COALESCE(SUM(valor), 0)::float8 FROM contas_a_pagar \
         WHERE status = 'pago' AND pago_em::date BETWEEN $1 AND $2",
        Some(periodo),
    )
    .await?;
    let total_recebido = soma(
        pg,
        "SELECT COALESCE(SUM(valor), 0)::float8 FROM contas_a_receber \
         WHERE status = 'recebido' AND recebido_em::date BETWEEN $1 AND $2",
        Some(periodo),
    )
    .await?;
    let pendente_pagar = soma(
        pg,
        "SELECT COALESCE(SUM(valor), 0)::float8 FROM contas_a_pagar WHERE status = 'pendente'",
        None,
    )
    .await?;
    let pendente_receber = soma(
        pg,
        "SELECT COALESCE(SUM(valor), 0)::float8 FROM contas_a_receber WHERE status = 'pendente'",
        None,
    )
    .await?;
    Ok(ResumoFinanceiro {
        total_a_pagar,
        total_a_receber,
        total_pago,
        total_recebido,
        pendente_pagar,
        pendente_receber,
    })
}
