use anyhow::Result;
use rmcp::{transport::stdio, ServiceExt};
use stock_minute_mcp::{logging, DatabaseConfig, MySqlSource, StockMinutePriceService};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let config = DatabaseConfig::from_env()?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        database = %config.database,
        "starting stock minute price server"
    );

    let service = StockMinutePriceService::new(MySqlSource::new(&config))
        .serve(stdio())
        .await?;
    service.waiting().await?;
    Ok(())
}
