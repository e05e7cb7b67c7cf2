use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

use crate::core::client::counters_error::CountersClientError;
use crate::domain::chart::service::query_builder::ChartError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error("Body parsing error: {0}")]
    BodyParsingError(String),

    #[error("Counters API error: {0}")]
    UpstreamError(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Helper for mapping any unknown error into internal error
pub fn internal_error<E: ToString>(err: E) -> AppError {
    AppError::InternalServerError(err.to_string())
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(e) = err.downcast_ref::<ChartError>() {
            return AppError::NotFound(e.to_string());
        }
        if let Some(e) = err.downcast_ref::<CountersClientError>() {
            return match e {
                CountersClientError::Build(_) => internal_error(e),
                CountersClientError::Http { message, .. } => {
                    AppError::UpstreamError(message.clone())
                }
                _ => AppError::UpstreamError(e.to_string()),
            };
        }
        if let Some(e) = err.downcast_ref::<validator::ValidationErrors>() {
            return AppError::BodyParsingError(e.to_string());
        }
        internal_error(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BodyParsingError(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamError(_) => StatusCode::BAD_GATEWAY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = Json(json!({
            "message": self.to_string()
        }));

        (status, body).into_response()
    }
}
