//! Lot purchase and administrative correction

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use shared::{
    cut_bags, generate_lot_code, validate_buy_lot, validate_correct_lot, Bag, BagMilestone,
    BagStatus, BagView, BuyLotInput, BuyLotResult, CorrectLotInput, DomainError, Lot,
};
use tracing::info;
use uuid::Uuid;

use super::propagation::CostPropagationEngine;
use super::stock_code::StockCodeGenerator;
use crate::error::{AppError, AppResult};
use crate::store::Tables;

/// Create a lot together with its bags and their milestones.
///
/// Runs inside one transaction: the lot, every bag and every milestone
/// appear together or not at all.
pub fn buy_lot(
    tx: &mut Tables,
    input: BuyLotInput,
    standard_bag_kg: Decimal,
    stock_codes: &dyn StockCodeGenerator,
) -> AppResult<BuyLotResult> {
    validate_buy_lot(&input, standard_bag_kg)?;
    if !tx.farms.contains_key(&input.farm_id) {
        return Err(AppError::missing("Farm", input.farm_id));
    }

    tx.lot_sequence = tx
        .lot_sequence
        .checked_add(1)
        .ok_or(DomainError::Overflow("lot_sequence"))?;
    let now = Utc::now();
    let lot = Lot {
        id: Uuid::new_v4(),
        farm_id: input.farm_id,
        code: generate_lot_code(now.year(), tx.lot_sequence),
        variety: input.variety,
        process_method: input.process_method,
        total_weight_kg: input.total_weight_kg,
        base_farm_cost_per_kg: input.base_farm_cost_per_kg,
        purchased_at: now,
    };

    let bag_weight = input.bag_weight_kg.unwrap_or(standard_bag_kg);
    let mut bag_ids = Vec::new();
    for (index, weight_kg) in cut_bags(lot.total_weight_kg, bag_weight).into_iter().enumerate() {
        let bag = Bag {
            id: Uuid::new_v4(),
            lot_id: lot.id,
            stock_code: stock_codes.stock_code(&lot.code, index + 1, weight_kg),
            weight_kg,
            status: BagStatus::Available,
            contract_id: None,
        };
        bag_ids.push(bag.id);
        tx.milestones.insert(bag.id, BagMilestone::new(bag.id));
        tx.bags.insert(bag.id, bag);
    }

    let result = BuyLotResult {
        lot_id: lot.id,
        code: lot.code.clone(),
        num_bags: bag_ids.len(),
        bag_ids,
    };
    tx.lots.insert(lot.id, lot);
    CostPropagationEngine::new(tx).recompute_lot(result.lot_id)?;

    info!(lot_id = %result.lot_id, code = %result.code, bags = result.num_bags, "bought lot");
    Ok(result)
}

/// Correct a lot's weight or base cost and reprice its bags. Bags are not re-cut.
pub fn correct_lot(tx: &mut Tables, lot_id: Uuid, input: CorrectLotInput) -> AppResult<Lot> {
    validate_correct_lot(&input)?;

    let lot = tx.lot_mut(lot_id)?;
    if let Some(weight) = input.total_weight_kg {
        lot.total_weight_kg = weight;
    }
    if let Some(base) = input.base_farm_cost_per_kg {
        lot.base_farm_cost_per_kg = base;
    }
    let lot = lot.clone();

    let repriced = CostPropagationEngine::new(tx).recompute_lot(lot_id)?;
    info!(
        %lot_id,
        total_weight_kg = %lot.total_weight_kg,
        base_farm_cost_per_kg = %lot.base_farm_cost_per_kg,
        repriced,
        "corrected lot"
    );
    Ok(lot)
}

/// Bags of a lot with their milestones
pub fn bags_of_lot(tables: &Tables, lot_id: Uuid) -> AppResult<Vec<BagView>> {
    tables.lot(lot_id)?;
    Ok(tables
        .bags
        .values()
        .filter(|bag| bag.lot_id == lot_id)
        .map(|bag| BagView {
            bag: bag.clone(),
            milestone: tables.milestones.get(&bag.id).cloned(),
        })
        .collect())
}
