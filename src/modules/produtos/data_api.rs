//! Data API repository for products. The stock balance join becomes a second
//! select over `saldo_estoque` merged in memory.

use std::collections::HashMap;

use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::{
    CreateProduto, FiltroCategoria, FiltrosProduto, Produto, ProdutoComSaldo, UpdateProduto,
};
use crate::db::{DataApiClient, Filter, QueryOptions};
use crate::error::AppError;

const TABLE: &str = "produtos";

#[derive(Deserialize)]
struct SaldoRow {
    produto_id: Uuid,
    quantidade: f64,
}

fn list_options(filtros: FiltrosProduto) -> QueryOptions {
    let mut options = QueryOptions::ordered_by("codigo");
    if let Some(tipo) = filtros.tipo {
        options = options.filter("tipo", Filter::eq(tipo.as_str()));
    }
    match filtros.categoria {
        FiltroCategoria::Todas => {}
        FiltroCategoria::SemCategoria => {
            options = options.filter("categoria_id", Filter::IsNull);
        }
        FiltroCategoria::Categoria(id) => {
            options = options.filter("categoria_id", Filter::eq(id));
        }
    }
    if let Some(fornecedor_id) = filtros.fornecedor_id {
        options = options.filter("fornecedor_principal_id", Filter::eq(fornecedor_id));
    }
    options
}

pub async fn list(client: &DataApiClient, filtros: FiltrosProduto) -> Result<Vec<Produto>, AppError> {
    client.select(TABLE, list_options(filtros)).await
}

pub async fn list_com_saldos(
    client: &DataApiClient,
    filtros: FiltrosProduto,
) -> Result<Vec<ProdutoComSaldo>, AppError> {
    let produtos: Vec<Produto> = client.select(TABLE, list_options(filtros)).await?;
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
    Ok(produtos
        .into_iter()
        .map(|produto| {
            let saldo = saldo_por_produto.get(&produto.id).copied().unwrap_or(0.0);
            ProdutoComSaldo { produto, saldo }
        })
        .collect())
}

pub async fn find_by_id(client: &DataApiClient, id: Uuid) -> Result<Option<Produto>, AppError> {
    client.find_by_id(TABLE, id).await
}

pub async fn create(client: &DataApiClient, data: &CreateProduto) -> Result<Produto, AppError> {
    client
        .insert_one(
            TABLE,
            &json!({
                "codigo": data.codigo.trim(),
                "descricao": data.descricao.trim(),
                "unidade": data.unidade,
                "tipo": data.tipo,
                "preco_compra": data.preco_compra,
                "preco_venda": data.preco_venda,
                "estoque_minimo": data.estoque_minimo,
                "estoque_maximo": data.estoque_maximo,
                "fornecedor_principal_id": data.fornecedor_principal_id,
                "categoria_id": data.categoria_id,
                "prazo_medio_entrega_dias": data.prazo_medio_entrega_dias,
            }),
        )
        .await
}

pub async fn update(
    client: &DataApiClient,
    id: Uuid,
    data: &UpdateProduto,
) -> Result<Option<Produto>, AppError> {
    if find_by_id(client, id).await?.is_none() {
        return Ok(None);
    }
    let mut patch = serde_json::Map::new();
    if let Some(codigo) = &data.codigo {
        patch.insert("codigo".into(), json!(codigo.trim()));
    }
    if let Some(descricao) = &data.descricao {
        patch.insert("descricao".into(), json!(descricao.trim()));
    }
    if let Some(unidade) = &data.unidade {
        patch.insert("unidade".into(), json!(unidade));
    }
    if let Some(tipo) = data.tipo {
        patch.insert("tipo".into(), json!(tipo));
    }
    if let Some(preco_compra) = data.preco_compra {
        patch.insert("preco_compra".into(), json!(preco_compra));
    }
    if let Some(preco_venda) = data.preco_venda {
        patch.insert("preco_venda".into(), json!(preco_venda));
    }
    if let Some(estoque_minimo) = data.estoque_minimo {
        patch.insert("estoque_minimo".into(), json!(estoque_minimo));
    }
    if let Some(estoque_maximo) = data.estoque_maximo {
        patch.insert("estoque_maximo".into(), json!(estoque_maximo));
    }
    if let Some(fornecedor_id) = data.fornecedor_principal_id {
        patch.insert("fornecedor_principal_id".into(), json!(fornecedor_id));
    }
    if let Some(categoria_id) = data.categoria_id {
        patch.insert("categoria_id".into(), json!(categoria_id));
    }
    if let Some(prazo) = data.prazo_medio_entrega_dias {
        patch.insert("prazo_medio_entrega_dias".into(), json!(prazo));
    }
    patch.insert("updated_at".into(), json!(Utc::now()));
    client.update(TABLE, id, &patch).await
}

pub async fn remove(client: &DataApiClient, id: Uuid) -> Result<bool, AppError> {
    match client.delete(TABLE, id).await {
        Ok(()) => Ok(true),
        Err(e) => {
            tracing::debug!(%id, error = %e, "remove produto falhou");
            Ok(false)
        }
    }
}
