//! Data API repository for purchase alerts. The ledger CTE becomes three
//! selects combined in memory.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::{
    quantidade_sugerida, quantidade_sugerida_ia, AvisoCompra, DIAS_HISTORICO, SEMANAS_HISTORICO,
};
use crate::db::{DataApiClient, Filter, QueryOptions};
use crate::error::AppError;
use crate::modules::produtos::TipoProduto;

#[derive(Deserialize)]
struct ProdutoRow {
    id: Uuid,
    codigo: String,
    descricao: String,
    tipo: TipoProduto,
    estoque_minimo: f64,
    estoque_maximo: Option<f64>,
    preco_compra: f64,
    fornecedor_principal_id: Option<Uuid>,
}

#[derive(Deserialize)]
struct SaldoRow {
    produto_id: Uuid,
    quantidade: f64,
}

#[derive(Deserialize)]
struct MovimentacaoRow {
    produto_id: Uuid,
    quantidade: f64,
}

pub async fn list_abaixo_minimo(client: &DataApiClient) -> Result<Vec<AvisoCompra>, AppError> {
    // Fetch everything and filter the type in memory; the alert set is small.
    let todos: Vec<ProdutoRow> = client.select("produtos", QueryOptions::default()).await?;
    let produtos: Vec<ProdutoRow> = todos
        .into_iter()
        .filter(|p| matches!(p.tipo, TipoProduto::Revenda | TipoProduto::Insumos))
        .collect();
    if produtos.is_empty() {
        return Ok(Vec::new());
    }

    let saldos: Vec<SaldoRow> = client
        .select(
            "saldo_estoque",
            QueryOptions::default().filter(
                "produto_id",
                Filter::r#in(produtos.iter().map(|p| p.id)),
            ),
        )
        .await?;
    let saldo_por_produto: HashMap<Uuid, f64> =
        saldos.into_iter().map(|s| (s.produto_id, s.quantidade)).collect();

    let data_limite = Utc::now().date_naive() - Duration::days(DIAS_HISTORICO);
    let movimentacoes: Vec<MovimentacaoRow> = client
        .select(
            "movimentacoes_estoque",
            QueryOptions::default()
                .filter("tipo", Filter::r#in(["saida", "producao"]))
                .filter("data", Filter::gte(data_limite)),
        )
        .await?;
    let mut consumo_por_produto: HashMap<Uuid, f64> = HashMap::new();
    for movimentacao in movimentacoes {
        *consumo_por_produto.entry(movimentacao.produto_id).or_default() +=
            movimentacao.quantidade.abs();
    }

    let mut avisos: Vec<AvisoCompra> = produtos
        .into_iter()
        .filter_map(|produto| {
            let saldo = saldo_por_produto.get(&produto.id).copied().unwrap_or(0.0);
            if saldo > produto.estoque_minimo {
                return None;
            }
            let total_saidas = consumo_por_produto.get(&produto.id).copied().unwrap_or(0.0);
            let consumo_medio_semanal = total_saidas / SEMANAS_HISTORICO as f64;
            let sugerida = quantidade_sugerida(saldo, produto.estoque_minimo, produto.estoque_maximo);
            Some(AvisoCompra {
                quantidade_sugerida_ia: quantidade_sugerida_ia(
                    sugerida,
                    consumo_medio_semanal,
                    saldo,
                    produto.estoque_maximo,
                ),
                quantidade_sugerida: sugerida,
                consumo_medio_periodo: consumo_medio_semanal,
                id: produto.id,
                codigo: produto.codigo,
                descricao: produto.descricao,
                tipo: produto.tipo,
                saldo,
                estoque_minimo: produto.estoque_minimo,
                estoque_maximo: produto.estoque_maximo,
                preco_compra: produto.preco_compra,
                fornecedor_principal_id: produto.fornecedor_principal_id,
            })
        })
        .collect();

    avisos.sort_by(|a, b| {
        let urgencia_a = a.estoque_minimo - a.saldo;
        let urgencia_b = b.estoque_minimo - b.saldo;
        urgencia_b
            .partial_cmp(&urgencia_a)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(avisos)
}
