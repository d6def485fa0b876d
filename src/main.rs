use anyhow::Context;
use log::info;
use mindscreen_lib::config::AppConfig;
use mindscreen_lib::{routes, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let settings = AppConfig::load().context("loading configuration")?;
    info!("=== Starting MindScreen Questionnaire Service ===");

    let state = AppState::initialize(settings.clone()).context("initializing classifiers")?;
    let app = routes::router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr)
        .await
        .with_context(|| format!("binding {}", settings.bind_addr))?;
    info!("✅ Listening on http://{}", settings.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
