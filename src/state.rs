//! Shared application state for all routes. The store slot is filled once a pool exists.

use crate::store::{AccountStore, StoreSlot};
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct AppState {
    pub store: StoreSlot,
}

impl AppState {
    /// State with no store yet; `/api` answers 503 until one is installed.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn with_store(store: Arc<dyn AccountStore>) -> Self {
        Self {
            store: StoreSlot::with_store(store),
        }
    }
}
