//! Available inventory projection

use shared::{AvailableBag, BagStatus};

use crate::error::AppResult;
use crate::store::Tables;

/// Bags still free to allocate, cheapest landed cost first
pub fn available_inventory(tables: &Tables) -> AppResult<Vec<AvailableBag>> {
    let mut rows = Vec::new();
    for bag in tables.bags.values().filter(|bag| bag.status == BagStatus::Available) {
        let lot = tables.lot(bag.lot_id)?;
        let milestone = tables.milestone(bag.id)?;
        rows.push(AvailableBag {
            bag_id: bag.id,
            lot_id: lot.id,
            lot_code: lot.code.clone(),
            stock_code: bag.stock_code.clone(),
            variety: lot.variety.clone(),
            weight_kg: bag.weight_kg,
            landed_cost_per_kg: milestone.final_sale_price,
        });
    }
    rows.sort_by(|a, b| {
        a.landed_cost_per_kg
            .cmp(&b.landed_cost_per_kg)
            .then_with(|| a.stock_code.cmp(&b.stock_code))
    });
    Ok(rows)
}
