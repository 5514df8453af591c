//! Contract stage advancement
//!
//! An operator enters one whole-shipment amount per transition. It is spread
//! evenly over the contract's total weight and written per kilogram into the
//! column owned by the stage being left, on every bag of the contract. This
//! denominator is the contract weight, unlike ledger costs which amortize
//! over the whole lot.

use rust_decimal::Decimal;
use shared::{
    amortize, validate_stage_cost, AdvanceStageResult, BagStatus, ContractStatus, Stage,
};
use tracing::info;
use uuid::Uuid;

use super::propagation::CostPropagationEngine;
use crate::error::{AppError, AppResult, TransitionError};
use crate::store::Tables;

/// Stage shared by every milestone of a contract
pub fn contract_stage(tables: &Tables, contract_id: Uuid) -> AppResult<Stage> {
    let mut stages = tables
        .bags_of_contract(contract_id)
        .filter_map(|bag| tables.milestones.get(&bag.id))
        .map(|milestone| milestone.current_stage);

    let stage = stages
        .next()
        .ok_or(TransitionError::NoMilestones { contract_id })?;
    if stages.any(|other| other != stage) {
        return Err(AppError::Conflict(format!(
            "milestones of contract {} disagree on their stage",
            contract_id
        )));
    }
    Ok(stage)
}

/// Move every bag of a contract to the next stage
pub fn advance_stage(
    tx: &mut Tables,
    contract_id: Uuid,
    cost_amount: Decimal,
) -> AppResult<AdvanceStageResult> {
    validate_stage_cost(cost_amount)?;
    tx.contract(contract_id)?;

    let stage = contract_stage(tx, contract_id)?;
    let transition = stage
        .advance()
        .map_err(|_| TransitionError::AlreadyTerminal { contract_id })?;

    let cost_per_kg = amortize(cost_amount, tx.total_weight_of_contract(contract_id)?)?;
    let bag_ids: Vec<Uuid> = tx.bags_of_contract(contract_id).map(|bag| bag.id).collect();

    for bag_id in &bag_ids {
        tx.milestone_mut(*bag_id)?.record_transition(cost_per_kg)?;
        if transition.to.is_shipped() {
            if let Some(bag) = tx.bags.get_mut(bag_id) {
                bag.status = BagStatus::Shipped;
            }
        }
        CostPropagationEngine::new(tx).recompute_bag(*bag_id)?;
    }

    let contract = tx
        .contracts
        .get_mut(&contract_id)
        .ok_or(AppError::missing("Contract", contract_id))?;
    if transition.to.is_terminal() {
        contract.status = ContractStatus::Fulfilled;
    }

    info!(
        %contract_id,
        from = %transition.from,
        to = %transition.to,
        field = %transition.field,
        %cost_per_kg,
        bags = bag_ids.len(),
        status = %contract.status,
        "advanced contract stage"
    );

    Ok(AdvanceStageResult {
        contract_id,
        previous_stage: transition.from,
        next_stage: transition.to,
        cost_per_kg,
        bags_advanced: bag_ids.len(),
        contract_status: contract.status,
    })
}
