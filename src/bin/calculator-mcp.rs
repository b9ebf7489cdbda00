use anyhow::Result;
use rmcp::{transport::stdio, ServiceExt};
use stock_minute_mcp::{logging, CalculatorService};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    tracing::info!("starting calculator server");

    let service = CalculatorService.serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
