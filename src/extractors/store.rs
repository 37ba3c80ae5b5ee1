//! Borrow the active account store for a request.

use crate::error::AppError;
use crate::state::AppState;
use crate::store::AccountStore;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;

/// Extractor for the installed store. Rejects with 503 while no pool exists.
#[derive(Clone)]
pub struct Store(pub Arc<dyn AccountStore>);

#[async_trait]
impl FromRequestParts<AppState> for Store {
    type Rejection = AppError;

    async fn from_request_parts(_parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state.store.current().map(Store).ok_or(AppError::ServiceUnavailable)
    }
}
