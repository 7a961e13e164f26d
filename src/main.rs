use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, config_from_process_env, router};
use triage_core::Dispatcher;

/// Main entry point for the triage service
///
/// Resolves configuration once, builds the shared dispatcher and serves the REST API.
///
/// # Environment Variables
/// - `TRIAGE_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `TRIAGE_USE_AI`: enable the AI analyzer (default: false)
/// - `OPENAI_API_KEY`: AI credential
/// - `TRIAGE_AI_MODEL`, `TRIAGE_AI_BASE_URL`, `TRIAGE_AI_TIMEOUT_SECS`: AI client settings
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, startup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("triage_run=info".parse()?)
                .add_directive("triage_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr: SocketAddr = std::env::var("TRIAGE_REST_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".into())
        .parse()?;

    let cfg = Arc::new(config_from_process_env()?);
    let dispatcher = Arc::new(Dispatcher::new(cfg));

    tracing::info!(
        ai = dispatcher.ai_available(),
        "++ Starting triage REST on {}",
        rest_addr
    );

    let app = router(AppState { dispatcher });
    let listener = tokio::net::TcpListener::bind(rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
