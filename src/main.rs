use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use faqbot_backend::core::config::{AppPaths, Settings};
use faqbot_backend::core::logging;
use faqbot_backend::server;
use faqbot_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let paths = AppPaths::new();
    logging::init(&paths, "server.log");

    let settings = Settings::load(&paths).context("Failed to load settings")?;
    let bind_addr = settings.bind_address();
    let state = AppState::initialize(paths, settings)?;

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    let addr = listener.local_addr()?;
    tracing::info!("Listening on {}", addr);

    let app: Router = server::router::router(state);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
