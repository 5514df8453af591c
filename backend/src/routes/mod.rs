//! Route definitions for the landed-cost ledger

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/producers", post(handlers::register_producer))
        .route("/farms", post(handlers::register_farm))
        .route("/clients", post(handlers::register_client))
        .nest("/lots", lot_routes())
        .nest("/costs", cost_routes())
        .nest("/contracts", contract_routes())
        .route("/inventory/available", get(handlers::get_available_inventory))
        .nest("/audit", audit_routes())
        .route("/maintenance/recompute", post(handlers::recompute_all))
}

/// Lot purchase routes
fn lot_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::buy_lot))
        .route("/:lot_id", patch(handlers::correct_lot))
        .route("/:lot_id/bags", get(handlers::get_lot_bags))
}

/// Cost ledger routes
fn cost_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::log_cost))
        .route(
            "/:cost_id",
            put(handlers::update_cost).delete(handlers::delete_cost),
        )
}

/// Contract routes
fn contract_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_contracts).post(handlers::finalize_allocation),
        )
        .route("/:contract_id", get(handlers::get_contract))
        .route("/:contract_id/advance", post(handlers::advance_stage))
}

/// Shadow audit routes
fn audit_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::audit_all))
        .route("/bags/:bag_id", get(handlers::audit_bag))
        .route("/contracts/:contract_id", get(handlers::audit_contract))
}
