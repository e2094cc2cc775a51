//! Shutdown Timer - schedule an OS shutdown with a live countdown
//!
//! This is the main entry point for the shutdown-timer service.

use std::sync::{Arc, Mutex};

use tokio::net::TcpListener;
use tracing::info;

use shutdown_timer::{
    api::create_router,
    config::Config,
    services::SystemShutdown,
    state::{AppState, DurationSelection},
    tasks::controller,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "shutdown_timer={},tower_http=info",
            config.log_level()
        ))
        .init();

    info!("Starting shutdown-timer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, display_only={}",
        config.host, config.port, config.display_only
    );

    let selection = Arc::new(Mutex::new(DurationSelection::default()));
    let (cmd_tx, status_rx, controller_handle) =
        controller::spawn(Arc::new(SystemShutdown), Arc::clone(&selection));

    let state = Arc::new(AppState::new(
        cmd_tx,
        status_rx,
        selection,
        !config.display_only,
    ));

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Control API on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start      - Schedule shutdown and start the countdown");
    info!("  POST /stop       - Cancel the shutdown and reset the countdown");
    info!("  POST /arm        - Arm the OS shutdown call");
    info!("  POST /disarm     - Countdown only, no OS shutdown");
    info!("  POST /preset/:p  - Apply a duration preset (15m/30m/45m/1h/2h/3h)");
    info!("  POST /reset      - Clear the duration selection");
    info!("  GET  /status     - Countdown phase, display and selection");
    info!("  GET  /health     - Health check");

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

    // Leave no scheduled OS shutdown behind without a visible countdown. The
    // stop ack covers the cancel command, so teardown cannot lose it.
    if let Err(e) = state.stop_countdown().await {
        tracing::warn!("Failed to stop countdown during shutdown: {}", e);
    }
    controller_handle.abort();

    info!("Service shutdown complete");
    Ok(())
}
