//! Cost propagation engine
//!
//! Keeps `final_sale_price` on every milestone equal to the landed-cost
//! formula. Each recompute reads the full current snapshot of the lot, its
//! ledger and the bag's milestone and overwrites the one cached column, so
//! it is idempotent and never depends on the order earlier writes arrived in.

use rust_decimal::Decimal;
use shared::LandedCost;
use tracing::debug;
use uuid::Uuid;

use crate::error::AppResult;
use crate::store::Tables;

/// Price a bag from the current state without writing anything.
///
/// A bag whose lot is missing is a referential-integrity failure, never a
/// zero base cost.
pub fn landed_cost(tables: &Tables, bag_id: Uuid) -> AppResult<LandedCost> {
    let bag = tables.bag(bag_id)?;
    let lot = tables.lot(bag.lot_id)?;
    let milestone = tables.milestone(bag_id)?;
    Ok(LandedCost::for_bag(lot, tables.ledger_of_lot(lot.id), milestone)?)
}

/// Writes recomputed landed costs back into the milestone table
pub struct CostPropagationEngine<'a> {
    tables: &'a mut Tables,
}

impl<'a> CostPropagationEngine<'a> {
    pub fn new(tables: &'a mut Tables) -> Self {
        Self { tables }
    }

    /// Recompute one bag after its milestone changed
    pub fn recompute_bag(&mut self, bag_id: Uuid) -> AppResult<Decimal> {
        let cost = landed_cost(self.tables, bag_id)?;
        let price = cost.total()?;
        self.tables.milestone_mut(bag_id)?.final_sale_price = price;
        debug!(
            %bag_id,
            base = %cost.base_farm_cost_per_kg,
            ledger = %cost.ledger_per_kg,
            logistics = %cost.logistics_per_kg,
            final_sale_price = %price,
            "recomputed landed cost"
        );
        Ok(price)
    }

    /// Recompute every bag of a lot after its ledger or header changed.
    /// Returns how many bags were repriced.
    pub fn recompute_lot(&mut self, lot_id: Uuid) -> AppResult<usize> {
        self.tables.lot(lot_id)?;
        let bag_ids = self.tables.bag_ids_of_lot(lot_id);
        for bag_id in &bag_ids {
            self.recompute_bag(*bag_id)?;
        }
        debug!(%lot_id, bags = bag_ids.len(), "recomputed lot");
        Ok(bag_ids.len())
    }

    /// Recompute every bag that has a milestone
    pub fn recompute_all(&mut self) -> AppResult<usize> {
        let bag_ids: Vec<Uuid> = self.tables.milestones.keys().copied().collect();
        for bag_id in &bag_ids {
            self.recompute_bag(*bag_id)?;
        }
        Ok(bag_ids.len())
    }
}
