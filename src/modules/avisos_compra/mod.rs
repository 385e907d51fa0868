//! Purchase alerts: resale and raw-material products at or below their
//! minimum stock, with restock suggestions. The plain suggestion refills to
//! the minimum; the demand-aware one also covers two weeks of the average
//! consumption observed over the last eight weeks, both capped by the
//! maximum stock when one is set.

mod data_api;
mod pg;
pub mod routes;

use serde::Serialize;
use uuid::Uuid;

use crate::config::BackendMode;
use crate::error::AppError;
use crate::modules::produtos::TipoProduto;
use crate::state::AppState;

pub(crate) const SEMANAS_HISTORICO: i64 = 8;
pub(crate) const DIAS_HISTORICO: i64 = SEMANAS_HISTORICO * 7;
pub(crate) const SEMANAS_COBERTURA: f64 = 2.0;

#[derive(Debug, Clone, Serialize)]
pub struct AvisoCompra {
    pub id: Uuid,
    pub codigo: String,
    pub descricao: String,
    pub tipo: TipoProduto,
    pub saldo: f64,
    pub estoque_minimo: f64,
    pub estoque_maximo: Option<f64>,
    pub quantidade_sugerida: f64,
    pub quantidade_sugerida_ia: f64,
    pub consumo_medio_periodo: f64,
    pub preco_compra: f64,
    pub fornecedor_principal_id: Option<Uuid>,
}

/// Refill to the minimum, capped by the maximum when the balance is below it.
pub(crate) fn quantidade_sugerida(saldo: f64, minimo: f64, maximo: Option<f64>) -> f64 {
    let base = (minimo - saldo).max(0.0);
    match maximo {
        Some(maximo) if saldo < maximo => base.min((maximo - saldo).max(0.0)),
        _ => base,
    }
}

/// The demand-aware suggestion: at least the plain one, at least two weeks of
/// average weekly consumption, never above the maximum.
pub(crate) fn quantidade_sugerida_ia(
    sugerida: f64,
    consumo_medio_semanal: f64,
    saldo: f64,
    maximo: Option<f64>,
) -> f64 {
    let mut ia = sugerida.max((consumo_medio_semanal * SEMANAS_COBERTURA).ceil());
    if let Some(maximo) = maximo {
        ia = ia.min((maximo - saldo).max(0.0));
    }
    ia
}

pub async fn list_abaixo_minimo(state: &AppState) -> Result<Vec<AvisoCompra>, AppError> {
    match state.backend() {
        BackendMode::Postgres => pg::list_abaixo_minimo(state.pg()).await,
        BackendMode::DataApi => data_api::list_abaixo_minimo(state.data_api()?).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sugestao_repoe_ate_o_minimo() {
        assert_eq!(quantidade_sugerida(2.0, 10.0, None), 8.0);
        assert_eq!(quantidade_sugerida(10.0, 10.0, None), 0.0);
        assert_eq!(quantidade_sugerida(12.0, 10.0, None), 0.0);
    }

    #[test]
    fn sugestao_respeita_o_maximo() {
        // Room up to the maximum is smaller than the refill to the minimum.
        assert_eq!(quantidade_sugerida(2.0, 10.0, Some(6.0)), 4.0);
        // Balance already at the maximum: falls back to the plain refill (zero here).
        assert_eq!(quantidade_sugerida(6.0, 5.0, Some(6.0)), 0.0);
    }

    #[test]
    fn sugestao_ia_cobre_duas_semanas_de_consumo() {
        // Plain suggestion 8, weekly consumption 5 → coverage demands 10.
        assert_eq!(quantidade_sugerida_ia(8.0, 5.0, 2.0, None), 10.0);
        // Coverage is rounded up.
        assert_eq!(quantidade_sugerida_ia(0.0, 2.3, 0.0, None), 5.0);
        // Plain suggestion wins when larger.
        assert_eq!(quantidade_sugerida_ia(12.0, 1.0, 2.0, None), 12.0);
    }

    #[test]
    fn sugestao_ia_limitada_pelo_maximo() {
        assert_eq!(quantidade_sugerida_ia(8.0, 5.0, 2.0, Some(7.0)), 5.0);
        // Balance above the maximum clamps to zero.
        assert_eq!(quantidade_sugerida_ia(0.0, 5.0, 9.0, Some(7.0)), 0.0);
    }
}
