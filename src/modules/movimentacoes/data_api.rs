//! Data API repository for stock movements. Display columns come from
//! follow-up selects merged in memory.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::{
    observacao_conferencia, ConferenciaItem, ConferenciaResultado, CreateMovimentacao,
    FiltrosMovimentacao, Movimentacao, MovimentacaoComProduto,
};
use crate::db::{DataApiClient, Filter, QueryOptions};
use crate::error::AppError;

const TABLE: &str = "movimentacoes_estoque";

#[derive(Deserialize)]
struct ProdutoRef {
    id: Uuid,
    codigo: String,
    descricao: String,
}

#[derive(Deserialize)]
struct CorRef {
    id: Uuid,
    nome: String,
}

#[derive(Deserialize)]
struct SaldoRow {
    quantidade: f64,
}

pub async fn list(
    client: &DataApiClient,
    filtros: FiltrosMovimentacao,
) -> Result<Vec<MovimentacaoComProduto>, AppError> {
    let mut options = QueryOptions::ordered_by_desc("data");
    if let Some(produto_id) = filtros.produto_id {
        options = options.filter("produto_id", Filter::eq(produto_id));
    }
    if let Some(tipo) = filtros.tipo {
        options = options.filter("tipo", Filter::eq(tipo.as_str()));
    }
    if let Some(data_inicio) = filtros.data_inicio {
        options = options.filter("data", Filter::gte(data_inicio));
    }
    if let Some(data_fim) = filtros.data_fim {
        options = options.filter("data", Filter::lte(data_fim));
    }
    let movimentacoes: Vec<Movimentacao> = client.select(TABLE, options).await?;
    if movimentacoes.is_empty() {
        return Ok(Vec::new());
    }

    let produto_ids: Vec<Uuid> = {
        let mut ids: Vec<Uuid> = movimentacoes.iter().map(|m| m.produto_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    };
    let produtos: Vec<ProdutoRef> = client
        .select(
            "produtos",
            QueryOptions {
                select: Some("id,codigo,descricao"),
                filters: vec![("id", Filter::r#in(produto_ids))],
                ..QueryOptions::default()
            },
        )
        .await?;

    let cor_ids: Vec<Uuid> = {
        let mut ids: Vec<Uuid> = movimentacoes.iter().filter_map(|m| m.cor_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    };
    let cores: Vec<CorRef> = if cor_ids.is_empty() {
        Vec::new()
    } else {
        client
            .select(
                "cores",
                QueryOptions {
                    select: Some("id,nome"),
                    filters: vec![("id", Filter::r#in(cor_ids))],
                    ..QueryOptions::default()
                },
            )
            .await?
    };

    let produto_por_id: HashMap<Uuid, ProdutoRef> =
        produtos.into_iter().map(|p| (p.id, p)).collect();
    let cor_por_id: HashMap<Uuid, CorRef> = cores.into_iter().map(|c| (c.id, c)).collect();

    Ok(movimentacoes
        .into_iter()
        .map(|movimentacao| {
            let produto = produto_por_id.get(&movimentacao.produto_id);
            let cor = movimentacao.cor_id.and_then(|id| cor_por_id.get(&id));
            MovimentacaoComProduto {
                produto_codigo: produto.map(|p| p.codigo.clone()),
                produto_descricao: produto.map(|p| p.descricao.clone()),
                cor_nome: cor.map(|c| c.nome.clone()),
                movimentacao,
            }
        })
        .collect())
}

pub async fn create(
    client: &DataApiClient,
    data: &CreateMovimentacao,
) -> Result<Movimentacao, AppError> {
    let dia = data
        .data
        .unwrap_or_else(|| chrono::Utc::now().date_naive());
    client
        .insert_one(
            TABLE,
            &json!({
                "data": dia,
                "tipo": data.tipo,
                "produto_id": data.produto_id,
                "quantidade": data.quantidade,
                "cor_id": data.cor_id,
                "origem_tipo": data.origem_tipo,
                "origem_id": data.origem_id,
                "observacao": data.observacao,
            }),
        )
        .await
}

pub async fn saldo_produto(client: &DataApiClient, produto_id: Uuid) -> Result<f64, AppError> {
    let rows: Vec<SaldoRow> = client
        .select(
            "saldo_estoque",
            QueryOptions {
                select: Some("quantidade"),
                filters: vec![("produto_id", Filter::eq(produto_id))],
                limit: Some(1),
                ..QueryOptions::default()
            },
        )
        .await?;
    Ok(rows.first().map(|r| r.quantidade).unwrap_or(0.0))
}

pub async fn conferencia(
    client: &DataApiClient,
    itens: &[ConferenciaItem],
) -> Result<ConferenciaResultado, AppError> {
    let mut processados = 0;
    let mut erros = Vec::new();
    for item in itens {
        let saldo = match saldo_produto(client, item.produto_id).await {
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
        match create(client, &movimento).await {
            Ok(_) => processados += 1,
            Err(e) => erros.push(format!("{}: {e}", item.produto_id)),
        }
    }
    Ok(ConferenciaResultado { processados, erros })
}
