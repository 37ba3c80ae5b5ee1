//! Account store abstraction. Every operation is one statement on one borrowed connection,
//! returned to the pool before the call completes.

mod memory;
mod postgres;

pub use memory::MemoryAccountStore;
pub use postgres::{PgAccountStore, POOL_SIZE};

use crate::error::StoreError;
use crate::model::{Account, AccountId, NewAccount};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

#[async_trait]
pub trait AccountStore: Send + Sync + 'static {
    /// All rows, in whatever order the backend returns them.
    async fn list(&self) -> Result<Vec<Account>, StoreError>;

    async fn get(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Insert a row; the backend assigns the id.
    async fn create(&self, account: &NewAccount) -> Result<Account, StoreError>;

    /// Overwrite name and balance. None when no row has this id.
    async fn update(&self, id: AccountId, account: &NewAccount) -> Result<Option<Account>, StoreError>;

    /// Remove a row. Returns whether one was affected.
    async fn delete(&self, id: AccountId) -> Result<bool, StoreError>;

    /// Cheap round trip used by readiness checks.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Refuse new borrows, wait for in-flight statements, then release all connections.
    async fn close(&self);
}

/// Holder for the active store. Empty until a pool has been created.
#[derive(Clone, Default)]
pub struct StoreSlot {
    inner: Arc<RwLock<Option<Arc<dyn AccountStore>>>>,
}

impl StoreSlot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_store(store: Arc<dyn AccountStore>) -> Self {
        let slot = Self::empty();
        slot.install(store);
        slot
    }

    pub fn current(&self) -> Option<Arc<dyn AccountStore>> {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn install(&self, store: Arc<dyn AccountStore>) {
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = Some(store);
    }

    /// Remove the store so later requests see the service as unavailable.
    pub fn take(&self) -> Option<Arc<dyn AccountStore>> {
        self.inner.write().unwrap_or_else(|e| e.into_inner()).take()
    }
}
