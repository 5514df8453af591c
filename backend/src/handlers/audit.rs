//! Shadow audit and maintenance handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::audit::{AuditSweep, BagAudit, ContractAudit};
use crate::AppState;

#[derive(Serialize)]
pub struct RecomputeResponse {
    pub repriced: usize,
}

/// Audit one bag
pub async fn audit_bag(
    State(state): State<AppState>,
    Path(bag_id): Path<Uuid>,
) -> AppResult<Json<BagAudit>> {
    let audit = state.ledger.audit_bag(bag_id).await?;
    Ok(Json(audit))
}

/// Audit one contract
pub async fn audit_contract(
    State(state): State<AppState>,
    Path(contract_id): Path<Uuid>,
) -> AppResult<Json<ContractAudit>> {
    let audit = state.ledger.audit_contract(contract_id).await?;
    Ok(Json(audit))
}

/// Audit everything, returning only mismatches
pub async fn audit_all(State(state): State<AppState>) -> AppResult<Json<AuditSweep>> {
    let sweep = state.ledger.audit_all().await?;
    Ok(Json(sweep))
}

/// Reprice every bag from scratch
pub async fn recompute_all(State(state): State<AppState>) -> AppResult<Json<RecomputeResponse>> {
    let repriced = state.ledger.recompute_all().await?;
    Ok(Json(RecomputeResponse { repriced }))
}
