//! Contract HTTP handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use shared::{AdvanceStageInput, AdvanceStageResult, Contract, ContractJourney, FinalizeAllocationInput};
use uuid::Uuid;

use crate::error::AppResult;
use crate::AppState;

/// Turn an allocation of bags into a contract
pub async fn finalize_allocation(
    State(state): State<AppState>,
    Json(input): Json<FinalizeAllocationInput>,
) -> AppResult<(StatusCode, Json<Contract>)> {
    let contract = state.ledger.finalize_allocation(input).await?;
    Ok((StatusCode::CREATED, Json(contract)))
}

/// List contract journeys
pub async fn list_contracts(State(state): State<AppState>) -> AppResult<Json<Vec<ContractJourney>>> {
    let journeys = state.ledger.list_contract_journeys().await?;
    Ok(Json(journeys))
}

/// Get one contract journey
pub async fn get_contract(
    State(state): State<AppState>,
    Path(contract_id): Path<Uuid>,
) -> AppResult<Json<ContractJourney>> {
    let journey = state.ledger.contract_journey(contract_id).await?;
    Ok(Json(journey))
}

/// Advance every bag of a contract to the next stage
pub async fn advance_stage(
    State(state): State<AppState>,
    Path(contract_id): Path<Uuid>,
    Json(input): Json<AdvanceStageInput>,
) -> AppResult<Json<AdvanceStageResult>> {
    let result = state
        .ledger
        .advance_stage(contract_id, input.cost_amount)
        .await?;
    Ok(Json(result))
}
