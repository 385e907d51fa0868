//! Server entrypoint: configuration, backend construction, router, listener.

use std::net::SocketAddr;

use axum::http::HeaderValue;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use saldao_api::db::{data_api::DataApiClient, pool};
use saldao_api::{app_router, AppState, BackendMode, EnvConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("saldao_api=info,tower_http=info")),
        )
        .init();

    let config = EnvConfig::from_env();
    let pg = pool::build_pool(&config)?;
    let data_api = DataApiClient::from_config(&config).ok();
    let state = AppState::new(config.clone(), pg, data_api);

    match state.backend() {
        BackendMode::DataApi => {
            // Fail fast instead of erroring on the first request.
            state.data_api()?;
            tracing::info!("backend: Data API ({})", config.supabase_url.as_deref().unwrap_or("?"));
        }
        BackendMode::Postgres => {
            if state.pg().is_none() {
                tracing::warn!("DATABASE_URL ausente; leituras vazias e escritas com erro");
            }
            tracing::info!("backend: PostgreSQL direto");
        }
    }

    let cors = match &config.cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>()?)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::permissive(),
    };

    let app = app_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
