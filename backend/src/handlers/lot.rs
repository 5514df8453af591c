//! Lot purchase HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::{BagView, BuyLotInput, BuyLotResult, CorrectLotInput, Lot};
use uuid::Uuid;

use crate::error::AppResult;
use crate::AppState;

/// Buy a lot: creates the lot, its bags and their milestones atomically
pub async fn buy_lot(
    State(state): State<AppState>,
    Json(input): Json<BuyLotInput>,
) -> AppResult<(StatusCode, Json<BuyLotResult>)> {
    let result = state.ledger.buy_lot(input).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// Administrative correction of a lot's weight or base cost
pub async fn correct_lot(
    State(state): State<AppState>,
    Path(lot_id): Path<Uuid>,
    Json(input): Json<CorrectLotInput>,
) -> AppResult<Json<Lot>> {
    let lot = state.ledger.correct_lot(lot_id, input).await?;
    Ok(Json(lot))
}

/// List a lot's bags with their milestones
pub async fn get_lot_bags(
    State(state): State<AppState>,
    Path(lot_id): Path<Uuid>,
) -> AppResult<Json<Vec<BagView>>> {
    let bags = state.ledger.bags_of_lot(lot_id).await?;
    Ok(Json(bags))
}
