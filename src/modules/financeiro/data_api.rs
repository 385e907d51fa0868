//! Data API repository for the financial ledgers. The period summary selects
//! the candidate rows and aggregates in memory.

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use super::{
    ContaPagar, ContaReceber, CreateContaPagar, CreateContaReceber, FiltrosConta, Periodo,
    ResumoFinanceiro, StatusContaPagar, StatusContaReceber,
};
use crate::db::{DataApiClient, Filter, QueryOptions};
use crate::error::AppError;

const PAGAR: &str = "contas_a_pagar";
const RECEBER: &str = "contas_a_receber";

fn list_options(filtros: &FiltrosConta) -> QueryOptions {
    let mut options = QueryOptions::ordered_by("vencimento");
    if let Some(status) = &filtros.status {
        options = options.filter("status", Filter::eq(status));
    }
    if let Some(data_inicio) = filtros.data_inicio {
        options = options.filter("vencimento", Filter::gte(data_inicio));
    }
    if let Some(data_fim) = filtros.data_fim {
        options = options.filter("vencimento", Filter::lte(data_fim));
    }
    options
}

pub async fn list_contas_pagar(
    client: &DataApiClient,
    filtros: &FiltrosConta,
) -> Result<Vec<ContaPagar>, AppError> {
    client.select(PAGAR, list_options(filtros)).await
}

pub async fn list_contas_receber(
    client: &DataApiClient,
    filtros: &FiltrosConta,
) -> Result<Vec<ContaReceber>, AppError> {
    client.select(RECEBER, list_options(filtros)).await
}

pub async fn create_conta_pagar(
    client: &DataApiClient,
    data: &CreateContaPagar,
) -> Result<ContaPagar, AppError> {
    client
        .insert_one(
            PAGAR,
            &json!({
                "descricao": data.descricao,
                "valor": data.valor,
                "vencimento": data.vencimento,
                "forma_pagamento": data.forma_pagamento,
                "pedido_compra_id": data.pedido_compra_id,
                "parcela_numero": data.parcela_numero,
            }),
        )
        .await
}

pub async fn create_conta_receber(
    client: &DataApiClient,
    data: &CreateContaReceber,
) -> Result<ContaReceber, AppError> {
    client
        .insert_one(
            RECEBER,
            &json!({
                "descricao": data.descricao,
                "valor": data.valor,
                "vencimento": data.vencimento,
                "forma_pagamento": data.forma_pagamento,
                "pedido_venda_id": data.pedido_venda_id,
                "parcela_numero": data.parcela_numero,
            }),
        )
        .await
}

pub async fn marcar_pago(client: &DataApiClient, id: Uuid) -> Result<Option<ContaPagar>, AppError> {
    let Some(current) = client.find_by_id::<ContaPagar>(PAGAR, id).await? else {
        return Ok(None);
    };
    if current.status != StatusContaPagar::Pendente {
        return Ok(None);
    }
    client
        .update(
            PAGAR,
            id,
            &json!({
                "status": StatusContaPagar::Pago,
                "pago_em": Utc::now(),
                "updated_at": Utc::now(),
            }),
        )
        .await
}

pub async fn marcar_recebido(
    client: &DataApiClient,
    id: Uuid,
) -> Result<Option<ContaReceber>, AppError> {
    let Some(current) = client.find_by_id::<ContaReceber>(RECEBER, id).await? else {
        return Ok(None);
    };
    if current.status != StatusContaReceber::Pendente {
        return Ok(None);
    }
    client
        .update(
            RECEBER,
            id,
            &json!({
                "status": StatusContaReceber::Recebido,
                "recebido_em": Utc::now(),
                "updated_at": Utc::now(),
            }),
        )
        .await
}

pub async fn resumo(client: &DataApiClient, periodo: Periodo) -> Result<ResumoFinanceiro, AppError> {
    let contas_pagar: Vec<ContaPagar> = client
        .select(
            PAGAR,
            QueryOptions::default().filter("vencimento", Filter::gte(periodo.data_inicio)),
        )
        .await?;
    let contas_receber: Vec<ContaReceber> = client
        .select(
            RECEBER,
            QueryOptions::default().filter("vencimento", Filter::gte(periodo.data_inicio)),
        )
        .await?;

    let mut resumo = ResumoFinanceiro::default();
    for conta in &contas_pagar {
        if conta.vencimento >= periodo.data_inicio && conta.vencimento <= periodo.data_fim {
            resumo.total_a_pagar += conta.valor;
        }
        if conta.status == StatusContaPagar::Pago {
            if let Some(pago_em) = conta.pago_em {
                let dia = pago_em.date_naive();
                if dia >= periodo.data_inicio && dia <= periodo.data_fim {
                    resumo.total_pago += conta.valor;
                }
            }
        }
    }
    for conta in &contas_receber {
        if conta.vencimento >= periodo.data_inicio && conta.vencimento <= periodo.data_fim {
            resumo.total_a_receber += conta.valor;
        }
        if conta.status == StatusContaReceber::Recebido {
            if let Some(recebido_em) = conta.recebido_em {
                let dia = recebido_em.date_naive();
                if dia >= periodo.data_inicio && dia <= periodo.data_fim {
                    resumo.total_recebido += conta.valor;
                }
            }
        }
    }

    let pendentes_pagar: Vec<ContaPagar> = client
        .select(
            PAGAR,
            QueryOptions::default().filter("status", Filter::eq("pendente")),
        )
        .await?;
    let pendentes_receber: Vec<ContaReceber> = client
        .select(
            RECEBER,
            QueryOptions::default().filter("status", Filter::eq("pendente")),
        )
        .await?;
    resumo.pendente_pagar = pendentes_pagar.iter().map(|c| c.valor).sum();
    resumo.pendente_receber = pendentes_receber.iter().map(|c| c.valor).sum();
    Ok(resumo)
}
