// Kronos - Web Server
// Serves the detainee listing page rendered on the server

use anyhow::{Context, Result};
use kronos::{config::Config, telemetry::init_tracing, web::router};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let config = Config::from_env()?;
    let addr = config.bind_addr.clone();
    info!(version = kronos::VERSION, page_size = config.page_size, "starting kronos server");

    let app = router(config);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to address {}", addr))?;

    info!("listening on http://{}", addr);
    info!("page: http://{}/detentos", addr);

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
