//! Contract aggregator
//!
//! Contract figures are derived on every read from the per-bag fields; none
//! of them is cached.

use rust_decimal::Decimal;
use shared::{amortize, ContractJourney, ContractSummary, DomainError};
use uuid::Uuid;

use crate::error::AppResult;
use crate::store::Tables;

/// Roll a contract's bags up into weight, average landed cost, stage and margin.
///
/// A contract without bags reports zeros.
pub fn summarize(tables: &Tables, contract_id: Uuid) -> AppResult<ContractSummary> {
    let contract = tables.contract(contract_id)?;

    let mut bag_count = 0usize;
    let mut total_weight_kg = Decimal::ZERO;
    let mut weighted_cost = Decimal::ZERO;
    let mut price_sum = Decimal::ZERO;
    let mut current_stage = None;

    for bag in tables.bags_of_contract(contract_id) {
        let Some(milestone) = tables.milestones.get(&bag.id) else {
            continue;
        };
        let bag_cost = milestone
            .final_sale_price
            .checked_mul(bag.weight_kg)
            .ok_or(DomainError::Overflow("avg_landed_cost"))?;
        bag_count += 1;
        total_weight_kg = total_weight_kg
            .checked_add(bag.weight_kg)
            .ok_or(DomainError::Overflow("total_weight_kg"))?;
        weighted_cost = weighted_cost
            .checked_add(bag_cost)
            .ok_or(DomainError::Overflow("avg_landed_cost"))?;
        price_sum = price_sum
            .checked_add(milestone.final_sale_price)
            .ok_or(DomainError::Overflow("mean_bag_landed_cost"))?;
        current_stage.get_or_insert(milestone.current_stage);
    }

    let avg_landed_cost = amortize(weighted_cost, total_weight_kg)?;
    let mean_bag_landed_cost = amortize(price_sum, Decimal::from(bag_count))?;
    let margin_per_kg = if bag_count == 0 {
        Decimal::ZERO
    } else {
        contract
            .sale_price_per_kg
            .checked_sub(avg_landed_cost)
            .ok_or(DomainError::Overflow("margin_per_kg"))?
    };

    Ok(ContractSummary {
        contract_id,
        client_id: contract.client_id,
        status: contract.status,
        bag_count,
        total_weight_kg,
        avg_landed_cost,
        mean_bag_landed_cost,
        sale_price_per_kg: contract.sale_price_per_kg,
        margin_per_kg,
        current_stage,
    })
}

/// Journey view of one contract
pub fn journey(tables: &Tables, contract_id: Uuid) -> AppResult<ContractJourney> {
    let summary = summarize(tables, contract_id)?;
    let client_name = tables
        .clients
        .get(&summary.client_id)
        .map(|client| client.name.clone())
        .unwrap_or_default();
    Ok(ContractJourney {
        summary,
        client_name,
    })
}

/// Journey view of every contract, newest first
pub fn list_journeys(tables: &Tables) -> AppResult<Vec<ContractJourney>> {
    let mut contracts: Vec<_> = tables.contracts.values().collect();
    contracts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    contracts
        .into_iter()
        .map(|contract| journey(tables, contract.id))
        .collect()
}
