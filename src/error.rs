//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Config(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("data api: {0}")]
    DataApi(String),
    #[error("data api transport: {0}")]
    Transport(#[from] reqwest::Error),
}

impl AppError {
    pub fn database_url_missing() -> Self {
        AppError::Config("DATABASE_URL não configurada".into())
    }

    pub fn data_api_missing() -> Self {
        AppError::Config(
            "SUPABASE_URL e SUPABASE_SERVICE_ROLE_KEY são obrigatórios para usar a Data API".into(),
        )
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Db(_)
            | AppError::DataApi(_)
            | AppError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_maps_to_404_with_error_body() {
        let (status, body) = body_json(AppError::NotFound("Categoria não encontrada".into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Categoria não encontrada");
    }

    #[tokio::test]
    async fn validation_maps_to_400() {
        let (status, body) = body_json(AppError::Validation("Nome é obrigatório".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Nome é obrigatório");
    }

    #[tokio::test]
    async fn config_maps_to_500() {
        let (status, body) = body_json(AppError::database_url_missing()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "DATABASE_URL não configurada");
    }
}
