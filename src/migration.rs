//! Database bootstrap: create the database and the accounts table when missing.

use crate::config::DatabaseConfig;
use crate::error::StoreError;
use sqlx::{ConnectOptions, PgPool};

const ACCOUNTS_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS accounts (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        balance NUMERIC
    )
"#;

/// Ensure the configured database exists; create it if not. Connects to the
/// `postgres` maintenance database to run CREATE DATABASE. Call before creating the pool.
pub async fn ensure_database_exists(config: &DatabaseConfig) -> Result<(), StoreError> {
    let db_name = config.database.trim();
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let mut conn = config.connect_options_for("postgres").connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

pub async fn ensure_accounts_table(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(ACCOUNTS_DDL).execute(pool).await?;
    Ok(())
}

/// Round trip through a pooled connection; returns the computed value.
pub async fn probe(pool: &PgPool) -> Result<i32, StoreError> {
    let (solution,): (i32,) = sqlx::query_as("SELECT 1 + 1 AS solution").fetch_one(pool).await?;
    Ok(solution)
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::quote_ident;

    #[test]
    fn identifiers_are_quoted_and_escaped() {
        assert_eq!(quote_ident("fintech"), "\"fintech\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }
}
