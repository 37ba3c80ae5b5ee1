//! Gateway configuration from environment variables, with local-development defaults.

use crate::error::ConfigError;
use sqlx::postgres::PgConnectOptions;
use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_DB_HOST: &str = "localhost";
const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_DB_USER: &str = "postgres";
const DEFAULT_DB_PASSWORD: &str = "my_secret_password";
const DEFAULT_DB_NAME: &str = "fintech";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_POOL_RETRY_SECS: u64 = 5;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for the accounts database.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Upper bound on opening a connection. Waiting for a free pooled connection is not bounded.
    pub connect_timeout: Duration,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        self.connect_options_for(&self.database)
    }

    /// Same server and credentials, different database (used to reach the `postgres` maintenance db).
    pub fn connect_options_for(&self, database: &str) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(database)
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub database: DatabaseConfig,
    pub listen_addr: SocketAddr,
    /// Interval between pool creation attempts after a failed start.
    pub pool_retry: Duration,
    pub cors: bool,
}

impl GatewayConfig {
    /// Read `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`, `DB_CONNECT_TIMEOUT_SECS`,
    /// `PORT`, `DB_POOL_RETRY_SECS` and `CORS_ENABLED`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let connect_secs: u64 = parsed(&lookup, "DB_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)?;
        let database = DatabaseConfig {
            host: text("DB_HOST", DEFAULT_DB_HOST),
            port: parsed(&lookup, "DB_PORT", DEFAULT_DB_PORT)?,
            user: text("DB_USER", DEFAULT_DB_USER),
            password: text("DB_PASSWORD", DEFAULT_DB_PASSWORD),
            database: text("DB_NAME", DEFAULT_DB_NAME),
            connect_timeout: Duration::from_secs(connect_secs.max(1)),
        };
        let port: u16 = parsed(&lookup, "PORT", DEFAULT_PORT)?;
        let retry_secs: u64 = parsed(&lookup, "DB_POOL_RETRY_SECS", DEFAULT_POOL_RETRY_SECS)?;
        let cors: bool = parsed(&lookup, "CORS_ENABLED", true)?;
        Ok(Self {
            database,
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
            pool_retry: Duration::from_secs(retry_secs.max(1)),
            cors,
        })
    }
}

fn parsed<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}
