//! FC Stats API Gateway binary

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fcstats_api_gateway::{router, shutdown_signal, AppState, GatewayConfig, Server};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting FC Stats API Gateway v{}", fcstats_common::VERSION);

    let config = GatewayConfig::load()?;
    info!("Loaded configuration: {:?}", config);

    let state = AppState::from_client(config.cms.build_client());
    let app = router(state);

    info!("Endpoints: /stats/service, /stats/function");

    Server::new(config.bind_address(), app)
        .with_grace_period(config.shutdown_grace())
        .run(shutdown_signal())
        .await;

    Ok(())
}
