use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// A database session could not be established.
    #[error("Database connection error: {0}")]
    ConnectionError(anyhow::Error),

    /// A statement was sent but the database rejected or failed it.
    #[error("Database query error: {0}")]
    QueryError(anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ConnectionError(_)
            | AppError::QueryError(_)
            | AppError::ConfigError(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Detail stays in the server logs; clients only see the category.
        let error_message = match &self {
            AppError::ConnectionError(_) | AppError::QueryError(_) => "Database error",
            AppError::ConfigError(_) => "Configuration error",
            AppError::InternalError(_) => "Internal server error",
        };

        (
            self.status_code(),
            Json(ErrorResponse {
                error: error_message.to_string(),
            }),
        )
            .into_response()
    }
}
