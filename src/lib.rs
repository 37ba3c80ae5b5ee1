//! FinTech gateway: REST backend for a single `accounts` table behind a bounded connection pool.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod routes;
pub mod server;
pub mod service;
pub mod state;
pub mod store;
pub mod telemetry;

pub use config::{DatabaseConfig, GatewayConfig};
pub use error::{AppError, ConfigError, StoreError};
pub use model::{Account, AccountId, AccountInput, NewAccount};
pub use routes::{account_routes, app, common_routes};
pub use server::{close_store, connect_store, run, serve, spawn_store_setup};
pub use state::AppState;
pub use store::{AccountStore, MemoryAccountStore, PgAccountStore, StoreSlot};
pub use telemetry::init_tracing;
