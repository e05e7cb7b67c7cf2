use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{error, info};

use console_charts_core::app_state::build_app_state;
use console_charts_core::config::AppConfig;
use console_charts_core::logging::init_logging;
use console_charts_core::routes::app_router;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; real deployments set the environment directly.
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    let _log_guard = init_logging(&config)?;

    info!(
        "Starting console-charts-core v{} (counters API: {})",
        env!("CARGO_PKG_VERSION"),
        config.counters_base_url
    );

    let state = build_app_state(&config)?;
    let app = app_router().with_state(state);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
