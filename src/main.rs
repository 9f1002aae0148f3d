use anyhow::Result;
use provincial_energy_forecast::{api, config, state, telemetry};
use config::Config;
use state::AppState;
use telemetry::init_tracing;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cfg = Config::load()?;
    let addr = cfg.server.socket_addr()?;

    if cfg.server.host == "0.0.0.0" {
        warn!("server binding to 0.0.0.0 - service will be accessible from the network");
    }

    // Catalog load finishes before the listener binds.
    let app_state = AppState::new(cfg);
    if app_state.catalog.is_none() {
        warn!("starting without a province catalog; /api/getprovinces will answer 503");
    }

    let app = api::router(app_state);

    info!(%addr, "starting provincial energy forecast service");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    warn!("shutdown complete");
    Ok(())
}
