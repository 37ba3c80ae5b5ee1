//! PostgreSQL-backed account store.

use super::AccountStore;
use crate::config::DatabaseConfig;
use crate::error::StoreError;
use crate::model::{Account, AccountId, NewAccount};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::time::Duration;
use tokio::sync::{Semaphore, SemaphorePermit};

/// Fixed number of pooled connections.
pub const POOL_SIZE: u32 = 10;

type AccountRow = (AccountId, String, Decimal);

fn into_account((id, name, balance): AccountRow) -> Account {
    Account { id, name, balance }
}

/// Statements queue on `turns` (FIFO, no deadline) before touching the pool, so sqlx's
/// acquire timeout only ever bounds opening a connection, never waiting for a free one.
#[derive(Debug)]
pub struct PgAccountStore {
    pool: PgPool,
    turns: Semaphore,
}

impl PgAccountStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        Self::connect_with(config.connect_options(), config.connect_timeout).await
    }

    /// Open the pool eagerly. Fails once `connect_timeout` passes without a usable connection.
    pub async fn connect_with(options: PgConnectOptions, connect_timeout: Duration) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(POOL_SIZE)
            .acquire_timeout(connect_timeout)
            .connect_with(options)
            .await?;
        Ok(Self {
            pool,
            turns: Semaphore::new(POOL_SIZE as usize),
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn turn(&self) -> Result<SemaphorePermit<'_>, StoreError> {
        self.turns.acquire().await.map_err(|_| StoreError::Closed)
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn list(&self) -> Result<Vec<Account>, StoreError> {
        let _turn = self.turn().await?;
        let rows: Vec<AccountRow> = sqlx::query_as("SELECT id, name, balance FROM accounts")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(into_account).collect())
    }

    async fn get(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let _turn = self.turn().await?;
        let row: Option<AccountRow> = sqlx::query_as("SELECT id, name, balance FROM accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(into_account))
    }

    async fn create(&self, account: &NewAccount) -> Result<Account, StoreError> {
        let _turn = self.turn().await?;
        tracing::debug!(name = %account.name, balance = %account.balance, "insert account");
        let row: AccountRow = sqlx::query_as(
            "INSERT INTO accounts (name, balance) VALUES ($1, $2) RETURNING id, name, balance",
        )
        .bind(&account.name)
        .bind(account.balance)
        .fetch_one(&self.pool)
        .await?;
        Ok(into_account(row))
    }

    async fn update(&self, id: AccountId, account: &NewAccount) -> Result<Option<Account>, StoreError> {
        let _turn = self.turn().await?;
        tracing::debug!(id, name = %account.name, balance = %account.balance, "update account");
        let row: Option<AccountRow> = sqlx::query_as(
            "UPDATE accounts SET name = $1, balance = $2 WHERE id = $3 RETURNING id, name, balance",
        )
        .bind(&account.name)
        .bind(account.balance)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(into_account))
    }

    async fn delete(&self, id: AccountId) -> Result<bool, StoreError> {
        let _turn = self.turn().await?;
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let _turn = self.turn().await?;
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.turns.close();
        self.pool.close().await;
    }
}
