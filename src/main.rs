// Plant Disease Recognition API
//
// Serves POST /predict, GET /classes and a browser dashboard at /dashboard.
// Configuration comes from flags, the environment, or a .env file.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use plant_disease_api::config::Config;
use plant_disease_api::disease_info::DiseaseInfoService;
use plant_disease_api::model::OnnxClassifier;
use plant_disease_api::{llm, router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    info!(path = %config.model_path.display(), "loading model");
    let classifier = OnnxClassifier::load(&config.model_path).context("failed to load model")?;
    info!("model loaded");

    let generator = llm::from_config(&config).context("failed to build LLM client")?;
    info!(
        provider = ?config.llm_provider,
        model = %config.llm_model(),
        url = %config.llm_base_url(),
        language = ?config.language,
        "text generation configured"
    );

    let state = AppState::new(
        Arc::new(classifier),
        DiseaseInfoService::new(Arc::from(generator), config.language),
    )
    .with_dashboard_api_base(config.dashboard_api_base.clone());

    let app = router(state, config.body_limit_bytes());

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("server running on http://{addr}");
    info!("dashboard at http://{addr}/dashboard");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
