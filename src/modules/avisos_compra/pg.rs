//! Relational repository for purchase alerts. The balance and the plain
//! suggestion come from SQL; the demand-aware suggestion is computed here.

use sqlx::PgPool;
use uuid::Uuid;

use super::{
    quantidade_sugerida_ia, AvisoCompra, DIAS_HISTORICO, SEMANAS_HISTORICO,
};
use crate::error::AppError;
use crate::modules::produtos::TipoProduto;

#[derive(sqlx::FromRow)]
struct AvisoRow {
    id: Uuid,
    codigo: String,
    descricao: String,
    tipo: TipoProduto,
    saldo: f64,
    estoque_minimo: f64,
    estoque_maximo: Option<f64>,
    quantidade_sugerida: f64,
    total_saidas: f64,
    preco_compra: f64,
    fornecedor_principal_id: Option<Uuid>,
}

pub async fn list_abaixo_minimo(pg: Option<&PgPool>) -> Result<Vec<AvisoCompra>, AppError> {
    let Some(pg) = pg else { return Ok(Vec::new()) };
    let rows = sqlx::query_as::<_, AvisoRow>(
        "WITH consumo AS ( \
           SELECT produto_id, COALESCE(SUM(ABS(quantidade)), 0)::float8 AS total_saidas \
           FROM movimentacoes_estoque \
           WHERE tipo IN ('saida', 'producao') AND data >= CURRENT_DATE - $1::int \
           GROUP BY produto_id \
         ) \
         SELECT p.id, p.codigo, p.descricao, p.tipo, \
           COALESCE(s.quantidade, 0)::float8 AS saldo, \
           p.estoque_minimo::float8 AS estoque_minimo, \
           p.estoque_maximo::float8 AS estoque_maximo, \
           (CASE \
             WHEN p.estoque_maximo IS NOT NULL AND (COALESCE(s.quantidade, 0) < p.estoque_maximo) THEN \
               LEAST(GREATEST(0, p.estoque_minimo - COALESCE(s.quantidade, 0)), \
                     GREATEST(0, p.estoque_maximo - COALESCE(s.quantidade, 0))) \
             ELSE GREATEST(0, p.estoque_minimo - COALESCE(s.quantidade, 0)) \
           END)::float8 AS quantidade_sugerida, \
           COALESCE(c.total_saidas, 0)::float8 AS total_saidas, \
           p.preco_compra::float8 AS preco_compra, \
           p.fornecedor_principal_id \
         FROM produtos p \
         LEFT JOIN saldo_estoque s ON s.produto_id = p.id \
         LEFT JOIN consumo c ON c.produto_id = p.id \
         WHERE p.tipo IN ('revenda', 'insumos') \
           AND (COALESCE(s.quantidade, 0) <= p.estoque_minimo) \
         ORDER BY (p.estoque_minimo - COALESCE(s.quantidade, 0)) DESC",
    )
    .bind(DIAS_HISTORICO as i32)
    .fetch_all(pg)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let consumo_medio_semanal = row.total_saidas / SEMANAS_HISTORICO as f64;
            AvisoCompra {
                quantidade_sugerida_ia: quantidade_sugerida_ia(
                    row.quantidade_sugerida,
                    consumo_medio_semanal,
                    row.saldo,
                    row.estoque_maximo,
                ),
                consumo_medio_periodo: consumo_medio_semanal,
                id: row.id,
                codigo: row.codigo,
                descricao: row.descricao,
                tipo: row.tipo,
                saldo: row.saldo,
                estoque_minimo: row.estoque_minimo,
                estoque_maximo: row.estoque_maximo,
                quantidade_sugerida: row.quantidade_sugerida,
                preco_compra: row.preco_compra,
                fornecedor_principal_id: row.fornecedor_principal_id,
            }
        })
        .collect())
}
