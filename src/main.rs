use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aarogya_core::CoreConfig;
use api_rest::{AppState, serve};

/// Main entry point for the Aarogya application
///
/// Loads `.env`, resolves the environment into a [`CoreConfig`] once, loads the catalog and
/// serves the REST API until the server fails or the process receives Ctrl-C.
///
/// # Environment Variables
/// - `AAROGYA_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `AAROGYA_DATA_DIR`: Directory for profile storage (default: "aarogya_data")
/// - `AAROGYA_CATALOG_DIR`: Directory of catalog YAML overrides (optional)
/// - `AAROGYA_DEFAULT_LANGUAGE`: Fallback reply language (default: "english")
/// - `WHATSAPP_NUMBER`: Helpline number used in WhatsApp links (optional)
/// - `API_KEY`: API key required in `x-api-key` for every route but `/health` (optional)
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("aarogya=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = CoreConfig::from_env()?;
    let state = AppState::from_config(&cfg, std::env::var("API_KEY").ok())?;

    let catalog = state.assistant.catalog();
    tracing::info!(
        "++ Catalog loaded: {} conditions, {} vaccines, {} alerts",
        catalog.conditions().len(),
        catalog.vaccines().len(),
        catalog.alerts(None).len()
    );
    tracing::info!(
        "++ Default language {}, profiles under {}",
        cfg.default_language(),
        cfg.profiles_dir().display()
    );

    tokio::select! {
        result = serve(cfg.rest_addr(), state) => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("-- Shutting down"),
    }

    Ok(())
}
