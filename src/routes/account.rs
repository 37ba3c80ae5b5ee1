//! Account CRUD routes, mounted under `/api`.

use crate::handlers::account::{create, delete, list, read, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn account_routes(state: AppState) -> Router {
    Router::new()
        .route("/accounts", get(list).post(create))
        .route("/accounts/:id", get(read).put(update).delete(delete))
        .with_state(state)
}
