//! Festive Countdown - countdown-to-celebration sequencer
//! 
//! This is the main entry point for the festive-countdown server.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use festive_countdown::{
    config::Config,
    state::AppState,
    api::create_router,
    utils::{shutdown_signal, SystemClock},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("festive_countdown={},tower_http=info", config.log_level()))
        .init();

    info!("Starting festive-countdown server v{}", env!("CARGO_PKG_VERSION"));

    let target = config.target.resolve_local().map_err(anyhow::Error::msg)?;
    info!("Configuration: host={}, port={}, target={} (local) / {} (UTC), tick={}ms, auto_start={}",
          config.host, config.port, config.target, target, config.tick_ms, config.auto_start);

    // Create application state
    let state = Arc::new(
        AppState::new(target, Arc::new(SystemClock))
            .with_address(config.host.clone(), config.port)
            .with_auto_start(config.auto_start),
    );

    // Start the countdown ticker background task
    state.spawn_ticker(config.tick_period());

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /countdown          - Remaining time and celebration stage");
    info!("  POST /celebration/start  - Start the celebration (after the target)");
    info!("  POST /celebration/test   - Start the celebration in test mode");
    info!("  POST /celebration/skip   - Skip to the final content");
    info!("  POST /celebration/reset  - Return to the countdown");
    info!("  GET  /events             - Stream of fired cues (SSE)");
    info!("  GET  /status             - Countdown and server status");
    info!("  GET  /health             - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.teardown();
    info!("Server shutdown complete");
    Ok(())
}
