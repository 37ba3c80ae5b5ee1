//! Process lifecycle: serving, pool creation (with background retry), graceful shutdown.

use crate::config::{DatabaseConfig, GatewayConfig};
use crate::error::StoreError;
use crate::migration::{ensure_accounts_table, ensure_database_exists, probe};
use crate::routes::app;
use crate::state::AppState;
use crate::store::{AccountStore, PgAccountStore, StoreSlot};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Create the pool, check it with a test query and make sure the accounts table exists.
pub async fn connect_store(config: &DatabaseConfig) -> Result<PgAccountStore, StoreError> {
    tracing::info!(
        host = %config.host,
        database = %config.database,
        user = %config.user,
        "attempting to create database pool"
    );
    match tokio::time::timeout(config.connect_timeout, ensure_database_exists(config)).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!(error = %e, "could not ensure database exists"),
        Err(_) => tracing::warn!(timeout = ?config.connect_timeout, "timed out ensuring database exists"),
    }
    let store = PgAccountStore::connect(config).await?;
    match probe(store.pool()).await {
        Ok(solution) => tracing::info!(solution, "database pool test query successful"),
        Err(e) => tracing::error!(error = ?e, "database pool test query failed"),
    }
    if let Err(e) = ensure_accounts_table(store.pool()).await {
        tracing::warn!(error = %e, "could not ensure accounts table exists");
    }
    Ok(store)
}

/// Call `connect` now and then every `every` until it yields a store, which is installed into `slot`.
pub fn spawn_store_setup<F, Fut>(connect: F, slot: StoreSlot, every: Duration) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Arc<dyn AccountStore>, StoreError>> + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every.max(Duration::from_millis(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut attempt: u32 = 0;
        loop {
            interval.tick().await;
            attempt += 1;
            match connect().await {
                Ok(store) => {
                    slot.install(store);
                    tracing::info!(attempt, "database pool created");
                    return;
                }
                Err(e) if attempt == 1 => tracing::error!(
                    error = ?e,
                    retry_in = ?every,
                    "failed to create database pool; /api will answer 503 until it exists"
                ),
                Err(e) => tracing::warn!(error = %e, attempt, retry_in = ?every, "database pool still unavailable"),
            }
        }
    })
}

/// Take the store out of the state and close it. Statements already running finish first.
pub async fn close_store(state: &AppState) {
    if let Some(store) = state.store.take() {
        tracing::info!("closing database pool");
        store.close().await;
        tracing::info!("database pool closed");
    }
}

pub async fn run(config: GatewayConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.listen_addr).await?;
    serve(listener, config, shutdown_signal()).await
}

/// Serve on `listener` until `shutdown` resolves. The database pool is created in the
/// background, so requests are answered (with 503 under `/api`) while it is missing.
pub async fn serve<S>(listener: TcpListener, config: GatewayConfig, shutdown: S) -> std::io::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let state = AppState::unavailable();
    let database = config.database.clone();
    let setup = spawn_store_setup(
        move || postgres_store(database.clone()),
        state.store.clone(),
        config.pool_retry,
    );

    tracing::info!("FinTech Backend listening at http://{}", listener.local_addr()?);
    axum::serve(listener, app(state.clone(), config.cors))
        .with_graceful_shutdown(shutdown)
        .await?;

    setup.abort();
    close_store(&state).await;
    tracing::info!("backend shut down");
    Ok(())
}

async fn postgres_store(config: DatabaseConfig) -> Result<Arc<dyn AccountStore>, StoreError> {
    let store = connect_store(&config).await?;
    Ok(Arc::new(store))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received SIGINT, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
