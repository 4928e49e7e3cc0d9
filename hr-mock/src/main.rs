//! Standalone mock HR backend for local development

use hr_mock::{MockServer, MockState};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::var("HR_MOCK_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let seed = std::env::var("HR_MOCK_EMPLOYEES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(45);

    let listener = TcpListener::bind(&addr).await?;
    let server = MockServer::serve(listener, MockState::with_demo_employees(seed)).await?;
    tracing::info!(url = %server.base_url(), employees = seed, "mock HR backend listening");

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    Ok(())
}
