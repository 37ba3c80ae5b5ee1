//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

pub const INVALID_INPUT: &str = "Invalid input: name and valid balance are required.";
pub const ACCOUNT_NOT_FOUND: &str = "Account not found";
pub const POOL_NOT_INITIALIZED: &str = "Service Unavailable: Database pool not initialized.";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Failures raised by an `AccountStore` backend.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("store is closed")]
    Closed,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("account not found")]
    NotFound,
    #[error("database pool not initialized")]
    ServiceUnavailable,
    /// `context` is the only text sent to the caller; `source` is logged.
    #[error("{context}: {source}")]
    Internal {
        context: &'static str,
        #[source]
        source: StoreError,
    },
}

impl AppError {
    pub fn internal(context: &'static str, source: StoreError) -> Self {
        AppError::Internal { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::BadRequest(reason) => {
                tracing::debug!(%reason, "rejected account payload");
                INVALID_INPUT
            }
            AppError::NotFound => ACCOUNT_NOT_FOUND,
            AppError::ServiceUnavailable => {
                tracing::error!("Database pool not initialized.");
                POOL_NOT_INITIALIZED
            }
            AppError::Internal { context, source } => {
                tracing::error!(error = ?source, "{}", context);
                context
            }
        };
        (status, body).into_response()
    }
}
