//! Coffee landed-cost ledger
//!
//! Tracks coffee lots from farm purchase through export and import logistics
//! to final sale, keeping a landed cost per kilogram on every bag:
//!
//! - [`store`]: transactional entity store
//! - [`services`]: cost propagation, stage advancement, contract aggregation
//!   and the shadow auditor
//! - [`ledger`]: the ledger facade and its single-writer task
//! - [`handlers`] / [`routes`]: the HTTP surface

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod error;
pub mod handlers;
pub mod ledger;
pub mod routes;
pub mod services;
pub mod store;

pub use config::Config;
pub use ledger::{Ledger, LedgerHandle, LedgerSettings, LedgerWorker};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub ledger: LedgerHandle,
    pub config: Arc<Config>,
}

/// Create the application router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Coffee Landed Cost Ledger API v1.0"
}
