//! Top-level router: service metadata, health and the module mounts.

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::modules;
use crate::state::AppState;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
}

async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "API Saldão de Móveis Jerusalém",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest(
            "/api/categorias-produto",
            modules::categorias::routes::router(state.clone()),
        )
        .nest("/api/cores", modules::cores::routes::router(state.clone()))
        .nest("/api/clientes", modules::clientes::routes::router(state.clone()))
        .nest(
            "/api/fornecedores",
            modules::fornecedores::routes::router(state.clone()),
        )
        .nest("/api/produtos", modules::produtos::routes::router(state.clone()))
        .nest(
            "/api/movimentacoes-estoque",
            modules::movimentacoes::routes::router(state.clone()),
        )
        .nest("/api/vendas", modules::vendas::routes::router(state.clone()))
        .nest(
            "/api/financeiro",
            modules::financeiro::routes::router(state.clone()),
        )
        .nest(
            "/api/avisos-compra",
            modules::avisos_compra::routes::router(state),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvConfig;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    /// No backend configured: resolver picks the relational mode with no pool.
    fn state_sem_backend() -> AppState {
        AppState::new(EnvConfig::default(), None, None)
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn health_responde_ok() {
        let (status, body) = get_json(app_router(state_sem_backend()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn raiz_expoe_metadados() {
        let (status, body) = get_json(app_router(state_sem_backend()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "running");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn rota_desconhecida_da_404() {
        let response = app_router(state_sem_backend())
            .oneshot(
                Request::builder()
                    .uri("/api/nao-existe")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn leituras_degradam_para_lista_vazia_sem_pool() {
        let (status, body) =
            get_json(app_router(state_sem_backend()), "/api/categorias-produto").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));

        let (status, body) = get_json(app_router(state_sem_backend()), "/api/cores").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn escrita_sem_pool_reporta_erro_de_configuracao() {
        let response = app_router(state_sem_backend())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/categorias-produto")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"nome":"Sofás"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "DATABASE_URL não configurada");
    }

    #[tokio::test]
    async fn validacao_de_payload_da_400_com_corpo_de_erro() {
        let response = app_router(state_sem_backend())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/categorias-produto")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"nome":"   "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Nome é obrigatório");
    }

    #[tokio::test]
    async fn modo_data_api_sem_credenciais_reporta_erro_de_configuracao() {
        let config = EnvConfig {
            use_data_api_flag: Some("true".into()),
            ..EnvConfig::default()
        };
        let (status, body) = get_json(
            app_router(AppState::new(config, None, None)),
            "/api/categorias-produto",
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("SUPABASE_URL e SUPABASE_SERVICE_ROLE_KEY"));
    }
}
