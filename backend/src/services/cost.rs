//! Lot-wide cost ledger writes
//!
//! Every insert, edit or removal reprices all bags of the lot(s) involved
//! inside the same transaction as the ledger write.

use shared::{validate_cost_amount, validate_log_cost, CostLedgerEntry, LogCostInput, LogCostResult, UpdateCostInput};
use tracing::info;
use uuid::Uuid;

use super::propagation::CostPropagationEngine;
use crate::error::{AppError, AppResult};
use crate::store::Tables;

/// Record a new ledger entry
pub fn log_cost(tx: &mut Tables, input: LogCostInput) -> AppResult<LogCostResult> {
    validate_log_cost(&input)?;
    tx.lot(input.lot_id)?;

    let entry = CostLedgerEntry {
        id: Uuid::new_v4(),
        lot_id: input.lot_id,
        cost_type: input.cost_type,
        amount_usd: input.amount_usd,
        date_incurred: input.date_incurred,
        notes: input.notes,
    };
    let id = entry.id;
    let lot_id = entry.lot_id;
    tx.ledger.insert(id, entry);

    let bags_recomputed = CostPropagationEngine::new(tx).recompute_lot(lot_id)?;
    info!(cost_id = %id, %lot_id, amount_usd = %input.amount_usd, bags_recomputed, "logged cost");
    Ok(LogCostResult { id, bags_recomputed })
}

/// Edit a ledger entry. Moving it to another lot reprices both lots.
pub fn update_cost(tx: &mut Tables, id: Uuid, input: UpdateCostInput) -> AppResult<CostLedgerEntry> {
    if let Some(amount) = input.amount_usd {
        validate_cost_amount(amount)?;
    }
    if let Some(lot_id) = input.lot_id {
        tx.lot(lot_id)?;
    }

    let entry = tx
        .ledger
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound("Cost ledger entry".to_string()))?;
    let previous_lot = entry.lot_id;
    if let Some(lot_id) = input.lot_id {
        entry.lot_id = lot_id;
    }
    if let Some(cost_type) = input.cost_type {
        entry.cost_type = cost_type;
    }
    if let Some(amount) = input.amount_usd {
        entry.amount_usd = amount;
    }
    if let Some(date) = input.date_incurred {
        entry.date_incurred = date;
    }
    if input.notes.is_some() {
        entry.notes = input.notes;
    }
    let entry = entry.clone();

    let mut engine = CostPropagationEngine::new(tx);
    let mut bags_recomputed = engine.recompute_lot(entry.lot_id)?;
    if previous_lot != entry.lot_id {
        bags_recomputed += engine.recompute_lot(previous_lot)?;
    }
    info!(cost_id = %id, lot_id = %entry.lot_id, bags_recomputed, "updated cost");
    Ok(entry)
}

/// Remove a ledger entry
pub fn delete_cost(tx: &mut Tables, id: Uuid) -> AppResult<LogCostResult> {
    let entry = tx
        .ledger
        .remove(&id)
        .ok_or_else(|| AppError::NotFound("Cost ledger entry".to_string()))?;

    let bags_recomputed = CostPropagationEngine::new(tx).recompute_lot(entry.lot_id)?;
    info!(cost_id = %id, lot_id = %entry.lot_id, bags_recomputed, "deleted cost");
    Ok(LogCostResult { id, bags_recomputed })
}
