//! Shadow auditor
//!
//! Recomputes landed costs straight from the raw tables, deliberately
//! without going through the propagation engine or the shared formula, and
//! compares the result with what is stored. Findings are reports, not
//! errors; each mismatch is logged at `warn`.
//!
//! Contracts are checked two ways which must agree with each other and with
//! the aggregator:
//! - per bag: weight-weighted average of each bag's own landed cost;
//! - per lot: each lot's ledger total is spread over only the weight of that
//!   lot's bags in this contract (`ledger * contract_kg / lot_kg`), then the
//!   bags' logistics costs are added.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{BagMilestone, DiscrepancyReport, DomainError};
use tracing::warn;
use uuid::Uuid;

use super::contract;
use crate::error::{AppError, AppResult};
use crate::store::Tables;

/// Audit of one bag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BagAudit {
    pub bag_id: Uuid,
    #[serde(flatten)]
    pub report: DiscrepancyReport,
}

/// Audit of one contract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractAudit {
    pub contract_id: Uuid,
    pub bag_count: usize,
    pub total_weight_kg: Decimal,
    pub per_bag: DiscrepancyReport,
    pub per_lot: DiscrepancyReport,
    pub is_match: bool,
}

/// Result of auditing everything; only mismatches are kept
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditSweep {
    pub bags_checked: usize,
    pub contracts_checked: usize,
    pub bag_findings: Vec<BagAudit>,
    pub contract_findings: Vec<ContractAudit>,
}

impl AuditSweep {
    pub fn is_clean(&self) -> bool {
        self.bag_findings.is_empty() && self.contract_findings.is_empty()
    }

    pub fn finding_count(&self) -> usize {
        self.bag_findings.len() + self.contract_findings.len()
    }
}

fn add(a: Decimal, b: Decimal) -> AppResult<Decimal> {
    Ok(a.checked_add(b).ok_or(DomainError::Overflow("audit"))?)
}

fn mul(a: Decimal, b: Decimal) -> AppResult<Decimal> {
    Ok(a.checked_mul(b).ok_or(DomainError::Overflow("audit"))?)
}

fn div(a: Decimal, b: Decimal) -> AppResult<Decimal> {
    Ok(a.checked_div(b).ok_or(DomainError::Overflow("audit"))?)
}

fn stored_logistics(milestone: &BagMilestone) -> AppResult<Decimal> {
    let mut sum = Decimal::ZERO;
    for value in [
        milestone.cost_to_warehouse,
        milestone.cost_to_export,
        milestone.cost_to_import,
        milestone.cost_to_client,
    ]
    .into_iter()
    .flatten()
    {
        sum = add(sum, value)?;
    }
    Ok(sum)
}

fn lot_ledger_total(tables: &Tables, lot_id: Uuid) -> AppResult<Decimal> {
    let mut total = Decimal::ZERO;
    for entry in tables.ledger.values() {
        if entry.lot_id == lot_id {
            total = add(total, entry.amount_usd)?;
        }
    }
    Ok(total)
}

/// Ground-truth landed cost of one bag from live aggregates
fn shadow_bag_cost(tables: &Tables, bag_id: Uuid) -> AppResult<(Decimal, Decimal)> {
    let bag = tables.bags.get(&bag_id).ok_or(AppError::missing("Bag", bag_id))?;
    let lot = tables.lots.get(&bag.lot_id).ok_or(AppError::missing("Lot", bag.lot_id))?;
    let milestone = tables
        .milestones
        .get(&bag_id)
        .ok_or(AppError::missing("BagMilestone", bag_id))?;

    let ledger_term = if lot.total_weight_kg > Decimal::ZERO {
        div(lot_ledger_total(tables, lot.id)?, lot.total_weight_kg)?
    } else {
        Decimal::ZERO
    };
    let calculated = add(
        add(lot.base_farm_cost_per_kg, ledger_term)?,
        stored_logistics(milestone)?,
    )?;
    Ok((calculated, milestone.final_sale_price))
}

/// Audits stored landed costs against an independent recomputation
pub struct ShadowAuditor<'a> {
    tables: &'a Tables,
    tolerance: Decimal,
}

impl<'a> ShadowAuditor<'a> {
    pub fn new(tables: &'a Tables, tolerance: Decimal) -> Self {
        Self { tables, tolerance }
    }

    pub fn audit_bag(&self, bag_id: Uuid) -> AppResult<BagAudit> {
        let (calculated, stored) = shadow_bag_cost(self.tables, bag_id)?;
        let report = DiscrepancyReport::compare(calculated, stored, self.tolerance);
        if !report.is_match {
            warn!(
                %bag_id,
                calculated = %report.calculated,
                stored = %report.actual,
                discrepancy = %report.discrepancy,
                "landed cost discrepancy"
            );
        }
        Ok(BagAudit { bag_id, report })
    }

    pub fn audit_contract(&self, contract_id: Uuid) -> AppResult<ContractAudit> {
        let reported = contract::summarize(self.tables, contract_id)?.avg_landed_cost;

        let bags: Vec<_> = self
            .tables
            .bags
            .values()
            .filter(|bag| bag.contract_id == Some(contract_id))
            .filter(|bag| self.tables.milestones.contains_key(&bag.id))
            .collect();

        let mut contract_kg = Decimal::ZERO;
        let mut per_bag_cost = Decimal::ZERO;
        let mut logistics_cost = Decimal::ZERO;
        let mut kg_by_lot: BTreeMap<Uuid, Decimal> = BTreeMap::new();

        for bag in &bags {
            let (bag_cost, _) = shadow_bag_cost(self.tables, bag.id)?;
            let milestone = self
                .tables
                .milestones
                .get(&bag.id)
                .ok_or(AppError::missing("BagMilestone", bag.id))?;
            contract_kg = add(contract_kg, bag.weight_kg)?;
            per_bag_cost = add(per_bag_cost, mul(bag_cost, bag.weight_kg)?)?;
            logistics_cost = add(logistics_cost, mul(stored_logistics(milestone)?, bag.weight_kg)?)?;
            let lot_kg = kg_by_lot.entry(bag.lot_id).or_insert(Decimal::ZERO);
            *lot_kg = add(*lot_kg, bag.weight_kg)?;
        }

        let mut per_lot_cost = logistics_cost;
        for (lot_id, kg_in_contract) in &kg_by_lot {
            let lot = self
                .tables
                .lots
                .get(lot_id)
                .ok_or(AppError::missing("Lot", *lot_id))?;
            per_lot_cost = add(per_lot_cost, mul(lot.base_farm_cost_per_kg, *kg_in_contract)?)?;
            if lot.total_weight_kg > Decimal::ZERO {
                let share = div(*kg_in_contract, lot.total_weight_kg)?;
                per_lot_cost = add(
                    per_lot_cost,
                    mul(lot_ledger_total(self.tables, *lot_id)?, share)?,
                )?;
            }
        }

        let (per_bag_avg, per_lot_avg) = if contract_kg > Decimal::ZERO {
            (div(per_bag_cost, contract_kg)?, div(per_lot_cost, contract_kg)?)
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };

        let per_bag = DiscrepancyReport::compare(per_bag_avg, reported, self.tolerance);
        let per_lot = DiscrepancyReport::compare(per_lot_avg, reported, self.tolerance);
        let is_match = per_bag.is_match && per_lot.is_match;
        if !is_match {
            warn!(
                %contract_id,
                reported = %per_bag.actual,
                per_bag = %per_bag.calculated,
                per_lot = %per_lot.calculated,
                "contract landed cost discrepancy"
            );
        }

        Ok(ContractAudit {
            contract_id,
            bag_count: bags.len(),
            total_weight_kg: contract_kg,
            per_bag,
            per_lot,
            is_match,
        })
    }

    /// Audit every bag and every contract
    pub fn audit_all(&self) -> AppResult<AuditSweep> {
        let mut sweep = AuditSweep::default();
        for bag_id in self.tables.milestones.keys() {
            let audit = self.audit_bag(*bag_id)?;
            sweep.bags_checked += 1;
            if !audit.report.is_match {
                sweep.bag_findings.push(audit);
            }
        }
        for contract_id in self.tables.contracts.keys() {
            let audit = self.audit_contract(*contract_id)?;
            sweep.contracts_checked += 1;
            if !audit.is_match {
                sweep.contract_findings.push(audit);
            }
        }
        Ok(sweep)
    }
}
