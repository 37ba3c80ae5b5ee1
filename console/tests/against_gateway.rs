use account_console::{ClientError, Console, ConsoleError, DeleteOutcome, HttpAccountsClient, Mode};
use anyhow::Result;
use fintech_gateway::{app, AppState, MemoryAccountStore};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Serve a gateway backed by an in-memory store on an ephemeral port; returns the accounts URL.
async fn spawn_gateway(state: AppState) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app(state, true)).await;
    });
    Ok(format!("http://{}/api/accounts", addr))
}

#[tokio::test]
async fn console_drives_the_gateway_through_a_full_cycle() -> Result<()> {
    let url = spawn_gateway(AppState::with_store(Arc::new(MemoryAccountStore::new()))).await?;
    let mut console = Console::new(HttpAccountsClient::new(url));
    console.refresh().await?;
    assert!(console.accounts().is_empty());

    console.open_add_form();
    console.set_name("Alice")?;
    console.set_balance("100.50")?;
    let created = console.save_account().await?;
    assert_eq!(created.id, 1);
    assert_eq!(created.balance, Decimal::new(1005, 1));
    assert_eq!(console.mode(), &Mode::Browsing);
    assert_eq!(console.accounts().len(), 1);

    console.edit_account(created.id).await?;
    console.set_balance("200")?;
    let updated = console.save_account().await?;
    assert_eq!(updated.balance, Decimal::from(200));
    assert_eq!(console.accounts()[0].balance, Decimal::from(200));

    let outcome = console.delete_account(created.id, &mut |_: &str| true).await?;
    assert_eq!(outcome, DeleteOutcome::Deleted);
    assert!(console.accounts().is_empty());
    Ok(())
}

#[tokio::test]
async fn rejected_save_keeps_the_draft_editable() -> Result<()> {
    let url = spawn_gateway(AppState::with_store(Arc::new(MemoryAccountStore::new()))).await?;
    let mut console = Console::new(HttpAccountsClient::new(url));

    console.open_add_form();
    console.set_balance("5")?;
    let err = console.save_account().await.unwrap_err();
    assert!(matches!(err, ConsoleError::Request(ClientError::Status { status: 400, .. })));
    assert!(console.is_form_visible());
    assert_eq!(
        console.last_error(),
        Some("Error Code: 400\nBackend Message: Invalid input: name and valid balance are required.")
    );

    console.set_name("Named now")?;
    console.save_account().await?;
    assert_eq!(console.accounts().len(), 1);
    Ok(())
}

#[tokio::test]
async fn unavailable_gateway_is_reported_not_fatal() -> Result<()> {
    let url = spawn_gateway(AppState::unavailable()).await?;
    let mut console = Console::new(HttpAccountsClient::new(url));

    let err = console.refresh().await.unwrap_err();
    assert!(matches!(err, ConsoleError::Request(ClientError::Status { status: 503, .. })));
    assert!(console.accounts().is_empty());
    Ok(())
}
