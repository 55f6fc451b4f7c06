use axum::{
    response::{IntoResponse, Response},
    Json,
    http::StatusCode,
};
use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Upstream responded {0}")]
    Upstream(u16),

    #[error("Request timed out")]
    Timeout,

    #[error("{0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Unknown(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Timeout
            | AppError::Network(_)
            | AppError::Config(_)
            | AppError::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Timeout
        } else {
            AppError::Network(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
