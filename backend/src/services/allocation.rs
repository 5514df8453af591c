//! Closing a bag selection into a contract
//!
//! The selection heuristic lives elsewhere; it hands over the chosen bags.

use chrono::Utc;
use shared::{validate_allocation, BagStatus, Contract, ContractStatus, FinalizeAllocationInput};
use tracing::info;
use uuid::Uuid;

use super::propagation::CostPropagationEngine;
use crate::error::{AppError, AppResult};
use crate::store::Tables;

/// Create a contract over the selected bags.
///
/// Every bag must exist and be `Available`. Their milestones are re-pointed
/// at the new contract and restart at `Farm` with no logistics costs: the
/// financial journey of a newly allocated bag always begins at the farm,
/// wherever the bag physically sits.
pub fn finalize_allocation(tx: &mut Tables, input: FinalizeAllocationInput) -> AppResult<Contract> {
    validate_allocation(&input)?;
    tx.client(input.client_id)?;

    for bag_id in &input.bag_ids {
        let bag = tx.bag(*bag_id)?;
        if bag.status != BagStatus::Available {
            return Err(AppError::Conflict(format!(
                "bag {} is {} and cannot be allocated",
                bag.id, bag.status
            )));
        }
    }

    let contract = Contract {
        id: Uuid::new_v4(),
        client_id: input.client_id,
        sale_price_per_kg: input.sale_price_per_kg,
        status: ContractStatus::Processing,
        created_at: Utc::now(),
    };
    tx.contracts.insert(contract.id, contract.clone());

    for bag_id in &input.bag_ids {
        if let Some(bag) = tx.bags.get_mut(bag_id) {
            bag.status = BagStatus::Allocated;
            bag.contract_id = Some(contract.id);
        }
        tx.milestone_mut(*bag_id)?.restart_for(contract.id);
        CostPropagationEngine::new(tx).recompute_bag(*bag_id)?;
    }

    info!(
        contract_id = %contract.id,
        client_id = %contract.client_id,
        bags = input.bag_ids.len(),
        "finalized allocation"
    );
    Ok(contract)
}
