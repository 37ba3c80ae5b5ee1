//! Router assembly.

mod account;
mod common;

pub use account::account_routes;
pub use common::{common_routes, LIVENESS_MESSAGE};

use crate::state::AppState;
use crate::telemetry::record_outcome;
use axum::{middleware, Router};
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;

/// Largest accepted request body.
pub const BODY_LIMIT: usize = 100 * 1024;

/// Full application: common routes at the root, accounts under `/api`.
pub fn app(state: AppState, cors: bool) -> Router {
    let mut router = Router::new()
        .merge(common_routes(state.clone()))
        .nest("/api", account_routes(state))
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(middleware::from_fn(record_outcome));

    if cors {
        router = router.layer(CorsLayer::permissive());
    }

    router
}
