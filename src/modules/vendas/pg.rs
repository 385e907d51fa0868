//! Relational repository for sales orders.
//!
//! Multi-step writes (order + items, confirm movements + status) run as
//! sequential statements; a failure midway can leave partial state.

use sqlx::PgPool;
use uuid::Uuid;

use super::{
    erro_insumos, erro_sem_estoque, referencia_pedido, total_itens, ConfirmarVenda,
    CreateItemVenda, CreateVenda, FiltrosVenda, ItemPedidoVendaComProduto, PedidoVenda,
    PedidoVendaComCliente, StatusVenda, UpdateVenda, ERRO_PREVISAO,
};
use crate::db::pool;
use crate::error::AppError;
use crate::modules::movimentacoes;
use crate::modules::produtos::TipoProduto;

const COLS: &str = "id, cliente_id, data_pedido, tipo_entrega, status, endereco_entrega, \
                    observacoes, total::float8 AS total, previsao_entrega_em_dias, \
                    distancia_km::float8 AS distancia_km, valor_frete::float8 AS valor_frete, \
                    created_at, updated_at";

const COLS_P: &str = "p.id, p.cliente_id, p.data_pedido, p.tipo_entrega, p.status, \
                      p.endereco_entrega, p.observacoes, p.total::float8 AS total, \
                      p.previsao_entrega_em_dias, p.distancia_km::float8 AS distancia_km, \
                      p.valor_frete::float8 AS valor_frete, p.created_at, p.updated_at";

pub async fn list(
    pg: Option<&PgPool>,
    filtros: FiltrosVenda,
) -> Result<Vec<PedidoVendaComCliente>, AppError> {
    let Some(pg) = pg else { return Ok(Vec::new()) };
    let rows = sqlx::query_as::<_, PedidoVendaComCliente>(&format!(
        "SELECT {COLS_P}, c.nome AS cliente_nome \
         FROM pedidos_venda p LEFT JOIN clientes c ON c.id = p.cliente_id \
         WHERE ($1::text IS NULL OR p.status = $1) \
           AND ($2::date IS NULL OR p.data_pedido >= $2) \
           AND ($3::date IS NULL OR p.data_pedido <= $3) \
         ORDER BY p.data_pedido DESC, p.created_at DESC"
    ))
    .bind(filtros.status.map(|s| s.as_str()))
    .bind(filtros.data_inicio)
    .bind(filtros.data_fim)
    .fetch_all(pg)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(
    pg: Option<&PgPool>,
    id: Uuid,
) -> Result<Option<PedidoVendaComCliente>, AppError> {
    let Some(pg) = pg else { return Ok(None) };
    let row = sqlx::query_as::<_, PedidoVendaComCliente>(&format!(
        "SELECT {COLS_P}, c.nome AS cliente_nome \
         FROM pedidos_venda p LEFT JOIN clientes c ON c.id = p.cliente_id WHERE p.id = $1"
    ))
    .bind(id)
    .fetch_optional(pg)
    .await?;
    Ok(row)
}

pub async fn list_itens(
    pg: Option<&PgPool>,
    pedido_id: Uuid,
) -> Result<Vec<ItemPedidoVendaComProduto>, AppError> {
    let Some(pg) = pg else { return Ok(Vec::new()) };
    let rows = sqlx::query_as::<_, ItemPedidoVendaComProduto>(
        "SELECT i.id, i.pedido_venda_id, i.produto_id, i.quantidade::float8 AS quantidade, \
         i.preco_unitario::float8 AS preco_unitario, i.total_item::float8 AS total_item, \
         i.created_at, pr.codigo AS produto_codigo, pr.descricao AS produto_descricao, \
         pr.tipo AS produto_tipo \
         FROM itens_pedido_venda i JOIN produtos pr ON pr.id = i.produto_id \
         WHERE i.pedido_venda_id = $1 ORDER BY i.created_at",
    )
    .bind(pedido_id)
    .fetch_all(pg)
    .await?;
    Ok(rows)
}

/// Raw materials are not sellable; returns the offending product codes.
async fn codigos_insumos(pg: &PgPool, itens: &[CreateItemVenda]) -> Result<Vec<String>, AppError> {
    if itens.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = itens.iter().map(|i| i.produto_id).collect();
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT codigo FROM produtos WHERE id = ANY($1) AND tipo = 'insumos' ORDER BY codigo",
    )
    .bind(&ids)
    .fetch_all(pg)
    .await?;
    Ok(rows.into_iter().map(|(codigo,)| codigo).collect())
}

async fn inserir_itens(
    pg: &PgPool,
    pedido_id: Uuid,
    itens: &[CreateItemVenda],
) -> Result<(), AppError> {
    for item in itens {
        sqlx::query(
            "INSERT INTO itens_pedido_venda (pedido_venda_id, produto_id, quantidade, \
             preco_unitario, total_item) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(pedido_id)
        .bind(item.produto_id)
        .bind(item.quantidade)
        .bind(item.preco_unitario)
        .bind(item.quantidade * item.preco_unitario)
        .execute(pg)
        .await?;
    }
    Ok(())
}

async fn atualizar_total(pg: &PgPool, pedido_id: Uuid, total: f64) -> Result<(), AppError> {
    sqlx::query("UPDATE pedidos_venda SET total = $2, updated_at = NOW() WHERE id = $1")
        .bind(pedido_id)
        .bind(total)
        .execute(pg)
        .await?;
    Ok(())
}

pub async fn create(pg: Option<&PgPool>, data: &CreateVenda) -> Result<PedidoVenda, AppError> {
    let pg = pool::require(pg)?;
    let insumos = codigos_insumos(pg, &data.itens).await?;
    if !insumos.is_empty() {
        return Err(erro_insumos(&insumos));
    }
    let data_pedido = data
        .data_pedido
        .unwrap_or_else(|| chrono::Utc::now().date_naive());
    let valor_frete = data.valor_frete.unwrap_or(0.0);
    let mut pedido = sqlx::query_as::<_, PedidoVenda>(&format!(
        "INSERT INTO pedidos_venda (cliente_id, data_pedido, tipo_entrega, endereco_entrega, \
         observacoes, total, previsao_entrega_em_dias, distancia_km, valor_frete) \
         VALUES ($1, $2, $3, $4, $5, 0, $6, $7, $8) RETURNING {COLS}"
    ))
    .bind(data.cliente_id)
    .bind(data_pedido)
    .bind(data.tipo_entrega)
    .bind(&data.endereco_entrega)
    .bind(&data.observacoes)
    .bind(data.previsao_entrega_em_dias)
    .bind(data.distancia_km)
    .bind(valor_frete)
    .fetch_one(pg)
    .await?;

    inserir_itens(pg, pedido.id, &data.itens).await?;
    let total = total_itens(&data.itens) + valor_frete;
    atualizar_total(pg, pedido.id, total).await?;
    pedido.total = total;
    Ok(pedido)
}

pub async fn update(
    pg: Option<&PgPool>,
    id: Uuid,
    data: &UpdateVenda,
) -> Result<Option<PedidoVendaComCliente>, AppError> {
    let pg = pool::require(pg)?;
    let Some(current) = find_by_id(Some(pg), id).await? else {
        return Ok(None);
    };
    if current.pedido.status != StatusVenda::Rascunho {
        return Ok(None);
    }
    if let Some(itens) = &data.itens {
        let insumos = codigos_insumos(pg, itens).await?;
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

    sqlx::query(
        "UPDATE pedidos_venda SET cliente_id = COALESCE($2, cliente_id), \
         data_pedido = COALESCE($3, data_pedido), tipo_entrega = COALESCE($4, tipo_entrega), \
         endereco_entrega = COALESCE($5, endereco_entrega), \
         observacoes = COALESCE($6, observacoes), previsao_entrega_em_dias = $7, \
         distancia_km = $8, valor_frete = $9, updated_at = NOW() WHERE id = $1",
    )
    .bind(id)
    .bind(data.cliente_id)
    .bind(data.data_pedido)
    .bind(data.tipo_entrega)
    .bind(&data.endereco_entrega)
    .bind(&data.observacoes)
    .bind(previsao)
    .bind(distancia_km)
    .bind(valor_frete)
    .execute(pg)
    .await?;

    if let Some(itens) = &data.itens {
        sqlx::query("DELETE FROM itens_pedido_venda WHERE pedido_venda_id = $1")
            .bind(id)
            .execute(pg)
            .await?;
        inserir_itens(pg, id, itens).await?;
        atualizar_total(pg, id, total_itens(itens) + valor_frete).await?;
    } else {
        let (soma,): (f64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(total_item), 0)::float8 FROM itens_pedido_venda \
             WHERE pedido_venda_id = $1",
        )
        .bind(id)
        .fetch_one(pg)
        .await?;
        atualizar_total(pg, id, soma + valor_frete).await?;
    }

    find_by_id(Some(pg), id).await
}

pub async fn confirmar(
    pg: Option<&PgPool>,
    id: Uuid,
    data: &ConfirmarVenda,
) -> Result<(), AppError> {
    let pg = pool::require(pg)?;
    let Some(pedido) = find_by_id(Some(pg), id).await? else {
        return Err(AppError::NotFound("Pedido não encontrado".into()));
    };
    if pedido.pedido.status != StatusVenda::Rascunho {
        return Err(AppError::Validation(
            "Pedido já confirmado ou cancelado".into(),
        ));
    }
    let itens = list_itens(Some(pg), id).await?;

    let mut tem_sem_estoque = false;
    let mut nao_fabricados = Vec::new();
    for item in &itens {
        let saldo = movimentacoes::pg::saldo_produto(Some(pg), item.item.produto_id).await?;
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
        sqlx::query(
            "UPDATE pedidos_venda SET previsao_entrega_em_dias = $2, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(dias)
        .execute(pg)
        .await?;
    }
    for item in &itens {
        sqlx::query(
            "INSERT INTO movimentacoes_estoque (data, tipo, produto_id, quantidade, origem_tipo, \
             origem_id, observacao) VALUES (CURRENT_DATE, 'saida', $1, $2, 'venda', $3, $4)",
        )
        .bind(item.item.produto_id)
        .bind(-item.item.quantidade)
        .bind(id)
        .bind(referencia_pedido(id))
        .execute(pg)
        .await?;
    }
    sqlx::query("UPDATE pedidos_venda SET status = 'confirmado', updated_at = NOW() WHERE id = $1")
        .bind(id)
        .execute(pg)
        .await?;
    Ok(())
}

pub async fn marcar_entregue(pg: Option<&PgPool>, id: Uuid) -> Result<Option<PedidoVenda>, AppError> {
    let Some(pg) = pg else { return Ok(None) };
    let row = sqlx::query_as::<_, PedidoVenda>(&format!(
        "UPDATE pedidos_venda SET status = 'entregue', updated_at = NOW() \
         WHERE id = $1 AND status = 'confirmado' RETURNING {COLS}"
    ))
    .bind(id)
    .fetch_optional(pg)
    .await?;
    Ok(row)
}
