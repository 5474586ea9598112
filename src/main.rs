use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use dx_core::{DEFAULT_REST_ADDR, GatewayConfig, HttpModelGateway, SymptomAnalysisService};

/// Main entry point for the DX application
///
/// Resolves the model gateway configuration, probes both model slots once so operators can see
/// at startup whether analysis will use the models or the demo fallback, then serves the REST
/// API with Swagger UI.
///
/// # Environment Variables
/// - `DX_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `DX_REASONING_ENDPOINT`, `DX_REASONING_MODEL`, `DX_REASONING_API_KEY`
/// - `DX_CHAT_ENDPOINT`, `DX_CHAT_MODEL`, `DX_CHAT_API_KEY`
/// - `DX_MODEL_TIMEOUT_SECS`: per-call model timeout in seconds (default: 60)
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration is invalid or the listener cannot bind
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dx_run=info".parse()?)
                .add_directive("dx_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("DX_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());

    let gateway = HttpModelGateway::new(GatewayConfig::from_env()?)?;
    let analysis = SymptomAnalysisService::new(Arc::new(gateway));

    let models = analysis.check_models().await;
    for (slot, status) in [("reasoning", &models.reasoning), ("chat", &models.chat)] {
        match &status.error {
            None => tracing::info!("++ {} model {} connected", slot, status.model),
            Some(e) => tracing::warn!(
                "++ {} model {} unavailable, demo fallback will answer: {}",
                slot,
                status.model,
                e
            ),
        }
    }

    tracing::info!("++ Starting DX REST on {}", rest_addr);

    let rest_app = router(AppState { analysis });
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, rest_app).await?;

    Ok(())
}
