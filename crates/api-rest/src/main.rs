//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the Aarogya REST API on its own, without the workspace's `aarogya-run` wrapper.
//!
//! ## Intended use
//! Handy during development when iterating on handlers or the OpenAPI document. Swagger UI is
//! served at `/swagger-ui`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aarogya_core::CoreConfig;
use api_rest::{serve, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = CoreConfig::from_env()?;
    tracing::info!("-- Data directory: {}", cfg.data_dir().display());

    let state = AppState::from_config(&cfg, std::env::var("API_KEY").ok())?;
    if state.api_key.is_none() {
        tracing::warn!("API_KEY is not set, REST routes are open");
    }

    serve(cfg.rest_addr(), state).await
}
