//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful for development when you want the REST server (with OpenAPI/Swagger UI) without the
//! workspace's `dx-run` wrapper. Both read the same environment variables.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use dx_core::{
    GatewayConfig, HttpModelGateway, ModelSlot, SymptomAnalysisService, DEFAULT_REST_ADDR,
};

/// Main entry point for the REST API server
///
/// # Environment Variables
/// - `DX_REST_ADDR`: listen address (default: "0.0.0.0:3000")
/// - `DX_REASONING_*` / `DX_CHAT_*`: model slot endpoint, model and key
/// - `DX_MODEL_TIMEOUT_SECS`: per-call model timeout
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("dx_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("DX_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());

    let config = GatewayConfig::from_env()?;
    tracing::info!(
        reasoning = config.slot(ModelSlot::Reasoning).model(),
        chat = config.slot(ModelSlot::Chat).model(),
        timeout_secs = config.timeout().as_secs(),
        "model gateway configured"
    );
    let gateway = HttpModelGateway::new(config)?;

    tracing::info!("-- Starting DX REST API on {}", addr);

    let app = router(AppState {
        analysis: SymptomAnalysisService::new(Arc::new(gateway)),
    });

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
