use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Message returned for every failure whose detail must stay server-side.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred.";

/// Message returned when no route matches the request.
pub const ROUTE_NOT_FOUND_MESSAGE: &str = "Route not found.";

/// Message returned when a request body is not a JSON object.
pub const INVALID_BODY_MESSAGE: &str = "Request body must be a JSON object.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Route not found")]
    RouteNotFound,

    #[error("Storage error: {message}: {source}")]
    StorageError {
        message: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl AppError {
    pub fn storage(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        AppError::StorageError {
            message: message.into(),
            source: source.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::RouteNotFound => StatusCode::NOT_FOUND,
            AppError::StorageError { .. }
            | AppError::InternalError(_)
            | AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand back to the caller.
    pub fn public_message(&self) -> String {
        match self {
            AppError::ValidationError(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::RouteNotFound => ROUTE_NOT_FOUND_MESSAGE.to_string(),
            AppError::StorageError { message, .. } => message.clone(),
            AppError::InternalError(_) | AppError::ConfigError(_) => {
                UNEXPECTED_ERROR_MESSAGE.to_string()
            }
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

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
        AppError::ValidationError(INVALID_BODY_MESSAGE.to_string())
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::storage("Database operation failed.", err)
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::StorageError { source, .. } => {
                tracing::error!(error = ?source, "{}", self);
            }
            AppError::InternalError(err) | AppError::ConfigError(err) => {
                tracing::error!(error = ?err, "{}", self);
            }
            _ => {
                tracing::debug!(status = %status, "{}", self);
            }
        }

        (status, Json(MessageResponse::new(self.public_message()))).into_response()
    }
}

/// Fallback handler for requests no route matches.
pub async fn route_not_found() -> AppError {
    AppError::RouteNotFound
}
