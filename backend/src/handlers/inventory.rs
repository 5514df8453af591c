//! Inventory HTTP handlers

use axum::{extract::State, Json};
use shared::AvailableBag;

use crate::error::AppResult;
use crate::AppState;

/// Bags available for allocation
pub async fn get_available_inventory(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<AvailableBag>>> {
    let bags = state.ledger.available_inventory().await?;
    Ok(Json(bags))
}
