//! In-process account store with the same borrowing contract as the database pool.

use super::AccountStore;
use crate::error::StoreError;
use crate::model::{Account, AccountId, NewAccount};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::{Semaphore, SemaphorePermit};

#[derive(Default)]
struct Table {
    rows: BTreeMap<AccountId, Account>,
    last_id: AccountId,
}

/// Rows live in a map; "connections" are semaphore permits, so borrowers queue in FIFO order
/// once all of them are taken.
pub struct MemoryAccountStore {
    table: Mutex<Table>,
    connections: Semaphore,
    capacity: u32,
    statement_delay: Option<Duration>,
    closing: AtomicBool,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::with_capacity(super::POOL_SIZE)
    }

    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            table: Mutex::new(Table::default()),
            connections: Semaphore::new(capacity as usize),
            capacity,
            statement_delay: None,
            closing: AtomicBool::new(false),
        }
    }

    /// Hold each borrowed connection for `delay`, to make contention observable.
    pub fn with_statement_delay(mut self, delay: Duration) -> Self {
        self.statement_delay = Some(delay);
        self
    }

    /// Connections not currently borrowed.
    pub fn idle_connections(&self) -> usize {
        self.connections.available_permits()
    }

    pub fn row_count(&self) -> usize {
        self.lock().rows.len()
    }

    async fn borrow(&self) -> Result<SemaphorePermit<'_>, StoreError> {
        if self.closing.load(Ordering::Acquire) {
            return Err(StoreError::Closed);
        }
        let permit = self.connections.acquire().await.map_err(|_| StoreError::Closed)?;
        if let Some(delay) = self.statement_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(permit)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        let _conn = self.borrow().await?;
        Ok(self.lock().rows.values().cloned().collect())
    }

    async fn get(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let _conn = self.borrow().await?;
        Ok(self.lock().rows.get(&id).cloned())
    }

    async fn create(&self, account: &NewAccount) -> Result<Account, StoreError> {
        let _conn = self.borrow().await?;
        let mut table = self.lock();
        table.last_id += 1;
        let row = account.clone().into_account(table.last_id);
        table.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(&self, id: AccountId, account: &NewAccount) -> Result<Option<Account>, StoreError> {
        let _conn = self.borrow().await?;
        let mut table = self.lock();
        Ok(table.rows.get_mut(&id).map(|row| {
            row.name = account.name.clone();
            row.balance = account.balance;
            row.clone()
        }))
    }

    async fn delete(&self, id: AccountId) -> Result<bool, StoreError> {
        let _conn = self.borrow().await?;
        Ok(self.lock().rows.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let _conn = self.borrow().await?;
        Ok(())
    }

    async fn close(&self) {
        self.closing.store(true, Ordering::Release);
        // Waits behind any borrower already queued, so in-flight statements finish first.
        if let Ok(all) = self.connections.acquire_many(self.capacity).await {
            all.forget();
        }
        self.connections.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    fn new_account(name: &str, balance: i64) -> NewAccount {
        NewAccount {
            name: name.into(),
            balance: Decimal::from(balance),
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_and_never_reused() {
        let store = MemoryAccountStore::new();
        let first = store.create(&new_account("a", 1)).await.unwrap();
        let second = store.create(&new_account("b", 2)).await.unwrap();
        assert_eq!((first.id, second.id), (1, 2));

        assert!(store.delete(second.id).await.unwrap());
        let third = store.create(&new_account("c", 3)).await.unwrap();
        assert_eq!(third.id, 3);
    }

    #[tokio::test]
    async fn update_and_delete_report_missing_rows() {
        let store = MemoryAccountStore::new();
        assert_eq!(store.update(42, &new_account("x", 0)).await.unwrap(), None);
        assert!(!store.delete(42).await.unwrap());
        assert_eq!(store.row_count(), 0);
    }

    #[tokio::test]
    async fn connections_are_returned_after_each_statement() {
        let store = MemoryAccountStore::with_capacity(2);
        store.create(&new_account("a", 1)).await.unwrap();
        store.list().await.unwrap();
        assert_eq!(store.idle_connections(), 2);
    }

    #[tokio::test]
    async fn borrowers_queue_when_every_connection_is_taken() {
        let store = Arc::new(MemoryAccountStore::with_capacity(1).with_statement_delay(Duration::from_millis(5)));
        let tasks: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.create(&new_account("q", i)).await })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }
        assert_eq!(store.row_count(), 8);
        assert_eq!(store.idle_connections(), 1);
    }

    #[tokio::test]
    async fn close_drains_then_refuses_new_borrows() {
        let store = Arc::new(MemoryAccountStore::with_capacity(1).with_statement_delay(Duration::from_millis(20)));
        let in_flight = {
            let store = store.clone();
            tokio::spawn(async move { store.create(&new_account("late", 1)).await })
        };
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(5)).await;

        store.close().await;
        assert!(in_flight.await.unwrap().is_ok());
        assert!(matches!(store.list().await, Err(StoreError::Closed)));
    }
}
