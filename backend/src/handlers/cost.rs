//! Cost ledger HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::{CostLedgerEntry, LogCostInput, LogCostResult, UpdateCostInput};
use uuid::Uuid;

use crate::error::AppResult;
use crate::AppState;

/// Record a lot-wide cost
pub async fn log_cost(
    State(state): State<AppState>,
    Json(input): Json<LogCostInput>,
) -> AppResult<(StatusCode, Json<LogCostResult>)> {
    let result = state.ledger.log_cost(input).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// Edit a ledger entry
pub async fn update_cost(
    State(state): State<AppState>,
    Path(cost_id): Path<Uuid>,
    Json(input): Json<UpdateCostInput>,
) -> AppResult<Json<CostLedgerEntry>> {
    let entry = state.ledger.update_cost(cost_id, input).await?;
    Ok(Json(entry))
}

/// Remove a ledger entry
pub async fn delete_cost(
    State(state): State<AppState>,
    Path(cost_id): Path<Uuid>,
) -> AppResult<Json<LogCostResult>> {
    let result = state.ledger.delete_cost(cost_id).await?;
    Ok(Json(result))
}
