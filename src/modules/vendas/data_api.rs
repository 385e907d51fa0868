//! Data API repository for sales orders. Joins become follow-up selects
//! merged in memory; multi-step writes run sequentially without transactions.

use std::collections::HashMap;

use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::{
    erro_insumos, erro_sem_estoque, referencia_pedido, total_itens, ConfirmarVenda,
    CreateItemVenda, CreateVenda, FiltrosVenda, ItemPedidoVenda, ItemPedidoVendaComProduto,
    PedidoVenda, PedidoVendaComCliente, StatusVenda, UpdateVenda, ERRO_PREVISAO,
};
use crate::db::{DataApiClient, Filter, QueryOptions};
use crate::error::AppError;
use crate::modules::movimentacoes::{self, CreateMovimentacao, TipoMovimentacao};
use crate::modules::produtos::TipoProduto;

const TABLE: &str = "pedidos_venda";
const ITENS_TABLE: &str = "itens_pedido_venda";

#[derive(Deserialize)]
struct ClienteRef {
    id: Uuid,
    nome: String,
}

#[derive(Deserialize)]
struct ProdutoRef {
    id: Uuid,
    codigo: String,
    descricao: String,
    tipo: TipoProduto,
}

async fn produtos_por_id(
    client: &DataApiClient,
    ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, ProdutoRef>, AppError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let produtos: Vec<ProdutoRef> = client
        .select(
            "produtos",
            QueryOptions {
                select: Some("id,codigo,descricao,tipo"),
                filters: vec![("id", Filter::r#in(ids))],
                ..QueryOptions::default()
            },
        )
        .await?;
    Ok(produtos.into_iter().map(|p| (p.id, p)).collect())
}

/// Raw materials are not sellable; returns the offending product codes.
async fn codigos_insumos(
    client: &DataApiClient,
    itens: &[CreateItemVenda],
) -> Result<Vec<String>, AppError> {
    let mut ids: Vec<Uuid> = itens.iter().map(|i| i.produto_id).collect();
    ids.sort_unstable();
    ids.dedup();
    let produtos = produtos_por_id(client, ids).await?;
    let mut codigos: Vec<String> = produtos
        .values()
        .filter(|p| p.tipo == TipoProduto::Insumos)
        .map(|p| p.codigo.clone())
        .collect();
    codigos.sort();
    Ok(codigos)
}

pub async fn list(
    client: &DataApiClient,
    filtros: FiltrosVenda,
) -> Result<Vec<PedidoVendaComCliente>, AppError> {
    let mut options = QueryOptions::ordered_by_desc("data_pedido");
    if let Some(status) = filtros.status {
        options = options.filter("status", Filter::eq(status.as_str()));
    }
    if let Some(data_inicio) = filtros.data_inicio {
        options = options.filter("data_pedido", Filter::gte(data_inicio));
    }
    if let Some(data_fim) = filtros.data_fim {
        options = options.filter("data_pedido", Filter::lte(data_fim));
    }
    let pedidos: Vec<PedidoVenda> = client.select(TABLE, options).await?;

    let cliente_ids: Vec<Uuid> = {
        let mut ids: Vec<Uuid> = pedidos.iter().filter_map(|p| p.cliente_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    };
    let clientes: Vec<ClienteRef> = if cliente_ids.is_empty() {
        Vec::new()
    } else {
        client
            .select(
                "clientes",
                QueryOptions {
                    select: Some("id,nome"),
                    filters: vec![("id", Filter::r#in(cliente_ids))],
                    ..QueryOptions::default()
                },
            )
            .await?
    };
    let nome_por_id: HashMap<Uuid, String> =
        clientes.into_iter().map(|c| (c.id, c.nome)).collect();

    Ok(pedidos
        .into_iter()
        .map(|pedido| {
            let cliente_nome = pedido.cliente_id.and_then(|id| nome_por_id.get(&id).cloned());
            PedidoVendaComCliente {
                pedido,
                cliente_nome,
            }
        })
        .collect())
}

pub async fn find_by_id(
    client: &DataApiClient,
    id: Uuid,
) -> Result<Option<PedidoVendaComCliente>, AppError> {
    let Some(pedido) = client.find_by_id::<PedidoVenda>(TABLE, id).await? else {
        return Ok(None);
    };
    let cliente_nome = match pedido.cliente_id {
        Some(cliente_id) => client
            .find_by_id::<ClienteRef>("clientes", cliente_id)
            .await?
            .map(|c| c.nome),
        None => None,
    };
    Ok(Some(PedidoVendaComCliente {
        pedido,
        cliente_nome,
    }))
}

pub async fn list_itens(
    client: &DataApiClient,
    pedido_id: Uuid,
) -> Result<Vec<ItemPedidoVendaComProduto>, AppError> {
    let itens: Vec<ItemPedidoVenda> = client
        .select(
            ITENS_TABLE,
            QueryOptions::ordered_by("created_at")
                .filter("pedido_venda_id", Filter::eq(pedido_id)),
        )
        .await?;
    let mut ids: Vec<Uuid> = itens.iter().map(|i| i.produto_id).collect();
    ids.sort_unstable();
    ids.dedup();
    let produtos = produtos_por_id(client, ids).await?;
    Ok(itens
        .into_iter()
        .map(|item| {
            let produto = produtos.get(&item.produto_id);
            ItemPedidoVendaComProduto {
                produto_codigo: produto.map(|p| p.codigo.clone()),
                produto_descricao: produto.map(|p| p.descricao.clone()),
                produto_tipo: produto.map(|p| p.tipo),
                item,
            }
        })
        .collect())
}

async fn inserir_itens(
    client: &DataApiClient,
    pedido_id: Uuid,
    itens: &[CreateItemVenda],
) -> Result<(), AppError> {
    for item in itens {
        client
            .insert::<serde_json::Value>(
                ITENS_TABLE,
                &json!({
                    "pedido_venda_id": pedido_id,
                    "produto_id": item.produto_id,
                    "quantidade": item.quantidade,
                    "preco_unitario": item.preco_unitario,
                    "total_item": item.quantidade * item.preco_unitario,
                }),
            )
            .await?;
    }
    Ok(())
}

async fn atualizar_total(client: &DataApiClient, pedido_id: Uuid, total: f64) -> Result<(), AppError> {
    client
        .update::<serde_json::Value>(
            TABLE,
            pedido_id,
            &json!({ "total": total, "updated_at": Utc::now() }),
        )
        .await?;
    Ok(())
}

pub async fn create(client: &DataApiClient, data: &CreateVenda) -> Result<PedidoVenda, AppError> {
    let insumos = codigos_insumos(client, &data.itens).await?;
    if !insumos.is_empty() {
        return Err(erro_insumos(&insumos));
    }
    let data_pedido = data
        .data_pedido
        .unwrap_or_else(|| Utc::now().date_naive());
    let valor_frete = data.valor_frete.unwrap_or(0.0);
    let mut pedido: PedidoVenda = client
        .insert_one(
            TABLE,
            &json!({
                "cliente_id": data.cliente_id,
                "data_pedido": data_pedido,
                "tipo_entrega": data.tipo_entrega,
                "endereco_entrega": data.endereco_entrega,
                "observacoes": data.observacoes,
                "total": 0,
                "previsao_entrega_em_dias": data.previsao_entrega_em_dias,
                "distancia_km": data.distancia_km,
                "valor_frete": valor_frete,
            }),
        )
        .await?;
    inserir_itens(client, pedido.id, &data.itens).await?;
    let total = total_itens(&data.itens) + valor_frete;
    atualizar_total(client, pedido.id, total).await?;
    pedido.total = total;
    Ok(pedido)
}

pub async fn update(
    client: &DataApiClient,
    id: Uuid,
    data: &UpdateVenda,
) -> Result<Option<PedidoVendaComCliente>, AppError> {
    let Some(current) = find_by_id(client, id).await? else {
        return Ok(None);
    };
    if current.pedido.status != StatusVenda::Rascunho {
        return Ok(None);
    }
    if let Some(itens) = &data.itens {
        let insumos = codigos_insumos(client, itens).await?;
        if !insumos.is_empty() {
            return Err(erro_insumos(&insumos));
        }
    }

    let previsao = data
        .previsao_entrega_em_dias
        .or(current.pedido.previsao_entrega_em_dias);
    let distancia_km = data.distancia_km.or(current.pedido.distancia_km);
    let valor_frete = data
        .valor_frete
        .or(current.pedido.valor_frete)
        .unwrap_or(0.0);

    let mut patch = serde_json::Map::new();
    if let Some(cliente_id) = data.cliente_id {
        patch.insert("cliente_id".into(), json!(cliente_id));
    }
    if let Some(data_pedido) = data.data_pedido {
        patch.insert("data_pedido".into(), json!(data_pedido));
    }
    if let Some(tipo_entrega) = data.tipo_entrega {
        patch.insert("tipo_entrega".into(), json!(tipo_entrega));
    }
    if let Some(endereco) = &data.endereco_entrega {
        patch.insert("endereco_entrega".into(), json!(endereco));
    }
    if let Some(observacoes) = &data.observacoes {
        patch.insert("observacoes".into(), json!(observacoes));
    }
    patch.insert("previsao_entrega_em_dias".into(), json!(previsao));
    patch.insert("distancia_km".into(), json!(distancia_km));
    patch.insert("valor_frete".into(), json!(valor_frete));
    patch.insert("updated_at".into(), json!(Utc::now()));
    let _ = client
        .update::<serde_json::Value>(TABLE, id, &patch)
        .await?;

    if let Some(itens) = &data.itens {
        client
            .delete_matching(ITENS_TABLE, &[("pedido_venda_id", Filter::eq(id))])
            .await?;
        inserir_itens(client, id, itens).await?;
        atualizar_total(client, id, total_itens(itens) + valor_frete).await?;
    } else {
        let itens = list_itens(client, id).await?;
        let soma: f64 = itens.iter().map(|i| i.item.total_item).sum();
        atualizar_total(client, id, soma + valor_frete).await?;
    }

    find_by_id(client, id).await
}

pub async fn confirmar(
    client: &DataApiClient,
    id: Uuid,
    data: &ConfirmarVenda,
) -> Result<(), AppError> {
    let Some(pedido) = find_by_id(client, id).await? else {
        return Err(AppError::NotFound("Pedido não encontrado".into()));
    };
    if pedido.pedido.status != StatusVenda::Rascunho {
        return Err(AppError::Validation(
            "Pedido já confirmado ou cancelado".into(),
        ));
    }
    let itens = list_itens(client, id).await?;

    let mut tem_sem_estoque = false;
    let mut nao_fabricados = Vec::new();
    for item in &itens {
        let saldo = movimentacoes::data_api::saldo_produto(client, item.item.produto_id).await?;
        if saldo < item.item.quantidade {
            tem_sem_estoque = true;
            if item.produto_tipo != Some(TipoProduto::Fabricado) {
                nao_fabricados.push(
                    item.produto_codigo
                        .clone()
                        .unwrap_or_else(|| item.item.produto_id.to_string()),
                );
            }
        }
    }
    if tem_sem_estoque && !nao_fabricados.is_empty() {
        return Err(erro_sem_estoque(&nao_fabricados));
    }
    let previsao = data
        .previsao_entrega_em_dias
        .or(pedido.pedido.previsao_entrega_em_dias);
    if tem_sem_estoque && previsao.map_or(true, |dias| dias < 1) {
        return Err(AppError::Validation(ERRO_PREVISAO.into()));
    }

    if let Some(dias) = previsao.filter(|dias| *dias >= 1) {
        let _ = client
            .update::<serde_json::Value>(
                TABLE,
                id,
                &json!({ "previsao_entrega_em_dias": dias, "updated_at": Utc::now() }),
            )
            .await?;
    }
    for item in &itens {
        let movimento = CreateMovimentacao {
            data: None,
            tipo: TipoMovimentacao::Saida,
            produto_id: item.item.produto_id,
            quantidade: -item.item.quantidade,
            cor_id: None,
            origem_tipo: Some("venda".to_string()),
            origem_id: Some(id),
            observacao: Some(referencia_pedido(id)),
        };
        movimentacoes::data_api::create(client, &movimento).await?;
    }
    let _ = client
        .update::<serde_json::Value>(
            TABLE,
            id,
            &json!({ "status": StatusVenda::Confirmado, "updated_at": Utc::now() }),
        )
        .await?;
    Ok(())
}

pub async fn marcar_entregue(
    client: &DataApiClient,
    id: Uuid,
) -> Result<Option<PedidoVenda>, AppError> {
    let Some(pedido) = client.find_by_id::<PedidoVenda>(TABLE, id).await? else {
        return Ok(None);
    };
    if pedido.status != StatusVenda::Confirmado {
        return Ok(None);
    }
    client
        .update(
            TABLE,
            id,
            &json!({ "status": StatusVenda::Entregue, "updated_at": Utc::now() }),
        )
        .await
}
