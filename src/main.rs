use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use medrec_core::{CoreConfig, RecordServices};

/// Main entry point for the medrec application
///
/// Resolves configuration once, opens the record store, connects the UMLS client and serves
/// the REST API until Ctrl-C.
///
/// # Environment Variables
/// - `MEDREC_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `MEDREC_DATA_DIR`: Directory holding the resource files (default: "data")
/// - `UMLS_API_KEY`: UMLS API key; if unset, read from `UMLS_API_KEY_FILE` (default: "key.txt")
/// - `UMLS_BASE_URL`: UMLS REST base URL (default: "https://uts-ws.nlm.nih.gov/rest/")
/// - `UMLS_TIMEOUT_SECS`: Per-lookup timeout in seconds (default: 10)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - configuration is invalid or no UMLS API key is available,
/// - the data directory cannot be opened,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medrec_run=info".parse()?)
                .add_directive("medrec_core=info".parse()?)
                .add_directive("medrec_store=info".parse()?)
                .add_directive("medrec_terminology=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = CoreConfig::from_env()?;
    let services = RecordServices::open(&cfg)?;
    let app = router(AppState::new(services));

    tracing::info!("++ Starting medrec REST on {}", cfg.rest_addr());
    tracing::info!("++ Record store at {}", cfg.data_dir().display());

    let listener = tokio::net::TcpListener::bind(cfg.rest_addr()).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- medrec REST stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
