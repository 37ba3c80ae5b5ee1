use fintech_gateway::{init_tracing, run, GatewayConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing("fintech_gateway=info");

    let config = GatewayConfig::from_env()?;
    tracing::debug!(?config, "configuration loaded");
    run(config).await?;
    Ok(())
}
