use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::response::ResultResponse;

/// Error taxonomy shared by the service and the HTTP layer. Every variant
/// carries a stable code so callers can branch without parsing messages.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Duplicate(String),
    #[error(transparent)]
    Server(#[from] anyhow::Error),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "INVALID_REQUEST",
            ApiError::NotFound(_) => "RESOURCE_NOT_FOUND",
            ApiError::Duplicate(_) => "DUPLICATE_RESOURCE",
            ApiError::Server(_) => "SERVER_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Duplicate(_) => StatusCode::CONFLICT,
            ApiError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            // The underlying chain stays in the logs, not the response.
            ApiError::Server(err) => {
                log::error!("internal error: {:#}", err);
                "internal server error".to_string()
            }
            other => {
                log::warn!("{}: {}", other.code(), other);
                other.to_string()
            }
        };

        let body: ResultResponse<()> = ResultResponse::failure(self.code(), &message);
        (self.status(), Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
