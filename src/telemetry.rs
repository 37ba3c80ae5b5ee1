//! Structured logging setup and the per-request outcome line.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::fmt;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` wins over `default_directive`.
pub fn init_tracing(default_directive: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .init();
}

/// Request outcome as recorded in the log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success,
    NotFound,
    BadRequest,
    ServiceUnavailable,
    InternalError,
    Other,
}

impl Outcome {
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            s if s.is_success() => Outcome::Success,
            StatusCode::NOT_FOUND => Outcome::NotFound,
            StatusCode::BAD_REQUEST => Outcome::BadRequest,
            StatusCode::SERVICE_UNAVAILABLE => Outcome::ServiceUnavailable,
            s if s.is_server_error() => Outcome::InternalError,
            _ => Outcome::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::NotFound => "not_found",
            Outcome::BadRequest => "bad_request",
            Outcome::ServiceUnavailable => "service_unavailable",
            Outcome::InternalError => "internal_error",
            Outcome::Other => "other",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Middleware: one log line per request with verb, path and outcome.
pub async fn record_outcome(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let response = next.run(request).await;
    let status = response.status();
    let outcome = Outcome::from_status(status);
    if status.is_server_error() {
        tracing::warn!(%method, %path, status = status.as_u16(), %outcome, "request");
    } else {
        tracing::info!(%method, %path, status = status.as_u16(), %outcome, "request");
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_to_outcomes() {
        assert_eq!(Outcome::from_status(StatusCode::CREATED), Outcome::Success);
        assert_eq!(Outcome::from_status(StatusCode::NOT_FOUND), Outcome::NotFound);
        assert_eq!(Outcome::from_status(StatusCode::BAD_REQUEST), Outcome::BadRequest);
        assert_eq!(Outcome::from_status(StatusCode::SERVICE_UNAVAILABLE), Outcome::ServiceUnavailable);
        assert_eq!(Outcome::from_status(StatusCode::INTERNAL_SERVER_ERROR), Outcome::InternalError);
        assert_eq!(Outcome::InternalError.to_string(), "internal_error");
    }
}
