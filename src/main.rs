use std::sync::Arc;
use tokio::net::TcpListener;
use minimal_scraper::{
    config::Config,
    api::routes::create_router,
    telemetry,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_telemetry();

    // Load configuration
    let config = Config::load()?;
    let server_addr = config.server_addr;

    // Create application state
    let app_state = AppState {
        config: Arc::new(config),
    };

    // Build the router with routes
    let app = create_router(app_state);

    // Create the listener
    let listener = TcpListener::bind(server_addr).await?;

    // Start the server
    tracing::info!("Listening on {}", server_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
