//! Coffee landed-cost ledger server

use std::{net::SocketAddr, sync::Arc};

use landed_cost_backend::{create_app, AppState, Config, Ledger, LedgerSettings, LedgerWorker};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "landed_cost_server=debug,landed_cost_backend=debug,tower_http=debug".into()
    });
    let json_logs = std::env::var("LCS_LOG_FORMAT").is_ok_and(|format| format == "json");
    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    let config = Config::load()?;

    tracing::info!("Starting Coffee Landed Cost Server");
    tracing::info!("Environment: {}", config.environment);

    // Start the single ledger writer
    let settings = LedgerSettings::from_config(&config);
    tracing::info!(
        queue_capacity = config.ledger.queue_capacity,
        standard_bag_kg = %settings.standard_bag_kg,
        audit_after_every_write = settings.audit_after_every_write,
        "starting ledger writer"
    );
    let ledger = LedgerWorker::spawn(Ledger::new(settings), config.ledger.queue_capacity);

    // Create application state
    let state = AppState {
        ledger,
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
