//! The ledger: entity store plus the engines that keep it consistent
//!
//! [`Ledger`] is a plain synchronous value; [`LedgerHandle`] serializes all
//! access to one instance through a single writer task.

mod worker;

pub use worker::{LedgerHandle, LedgerWorker};

use rust_decimal::Decimal;
use shared::{
    AdvanceStageResult, AvailableBag, BagView, BuyLotInput, BuyLotResult, Client, Contract,
    ContractJourney, CorrectLotInput, CostLedgerEntry, Farm, FinalizeAllocationInput, Lot,
    LogCostInput, LogCostResult, Producer, RegisterClientInput, RegisterFarmInput,
    RegisterProducerInput, UpdateCostInput,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppResult;
use crate::services::audit::{AuditSweep, BagAudit, ContractAudit, ShadowAuditor};
use crate::services::stock_code::{SequentialStockCodes, StockCodeGenerator};
use crate::services::{
    allocation, contract, cost, inventory, lot, propagation::CostPropagationEngine, registry,
    stage,
};
use crate::store::{EntityStore, Tables};

/// Ledger behaviour knobs
#[derive(Debug, Clone)]
pub struct LedgerSettings {
    pub standard_bag_kg: Decimal,
    pub audit_tolerance: Decimal,
    pub audit_after_every_write: bool,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl LedgerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            standard_bag_kg: config.ledger.standard_bag_kg,
            audit_tolerance: config.audit.tolerance,
            audit_after_every_write: config.audit.after_every_write,
        }
    }
}

/// Single-process ledger of lots, bags, costs and contracts
pub struct Ledger {
    store: EntityStore,
    settings: LedgerSettings,
    stock_codes: Box<dyn StockCodeGenerator>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(LedgerSettings::default())
    }
}

impl Ledger {
    pub fn new(settings: LedgerSettings) -> Self {
        Self::with_stock_codes(settings, Box::new(SequentialStockCodes))
    }

    pub fn with_stock_codes(settings: LedgerSettings, stock_codes: Box<dyn StockCodeGenerator>) -> Self {
        Self {
            store: EntityStore::new(),
            settings,
            stock_codes,
        }
    }

    pub fn settings(&self) -> &LedgerSettings {
        &self.settings
    }

    /// Committed state
    pub fn tables(&self) -> &Tables {
        self.store.read()
    }

    /// Raw transactional access, bypassing the engines. Repair tooling only.
    pub fn store_mut(&mut self) -> &mut EntityStore {
        &mut self.store
    }

    /// Run one write atomically, then optionally audit the committed state
    fn write<T>(
        &mut self,
        operation: &'static str,
        op: impl FnOnce(&mut Tables, &LedgerSettings, &dyn StockCodeGenerator) -> AppResult<T>,
    ) -> AppResult<T> {
        let Self {
            store,
            settings,
            stock_codes,
        } = &mut *self;
        let result = store.transaction(|tx| op(tx, settings, &**stock_codes));

        match &result {
            Ok(_) => {
                if self.settings.audit_after_every_write {
                    self.audit_after(operation);
                }
            }
            Err(e) => warn!(operation, error = %e, "write rolled back"),
        }
        result
    }

    fn audit_after(&self, operation: &'static str) {
        match self.audit_all() {
            Ok(sweep) if sweep.is_clean() => {}
            Ok(sweep) => warn!(
                operation,
                findings = sweep.finding_count(),
                "audit after write found discrepancies"
            ),
            Err(e) => warn!(operation, error = %e, "audit after write failed"),
        }
    }

    // ---------------------------------------------------------------------
    // Writes
    // ---------------------------------------------------------------------

    pub fn register_producer(&mut self, input: RegisterProducerInput) -> AppResult<Producer> {
        self.write("register_producer", |tx, _, _| registry::register_producer(tx, input))
    }

    pub fn register_farm(&mut self, input: RegisterFarmInput) -> AppResult<Farm> {
        self.write("register_farm", |tx, _, _| registry::register_farm(tx, input))
    }

    pub fn register_client(&mut self, input: RegisterClientInput) -> AppResult<Client> {
        self.write("register_client", |tx, _, _| registry::register_client(tx, input))
    }

    pub fn buy_lot(&mut self, input: BuyLotInput) -> AppResult<BuyLotResult> {
        self.write("buy_lot", |tx, settings, codes| {
            lot::buy_lot(tx, input, settings.standard_bag_kg, codes)
        })
    }

    pub fn correct_lot(&mut self, lot_id: Uuid, input: CorrectLotInput) -> AppResult<Lot> {
        self.write("correct_lot", |tx, _, _| lot::correct_lot(tx, lot_id, input))
    }

    pub fn log_cost(&mut self, input: LogCostInput) -> AppResult<LogCostResult> {
        self.write("log_cost", |tx, _, _| cost::log_cost(tx, input))
    }

    pub fn update_cost(&mut self, id: Uuid, input: UpdateCostInput) -> AppResult<CostLedgerEntry> {
        self.write("update_cost", |tx, _, _| cost::update_cost(tx, id, input))
    }

    pub fn delete_cost(&mut self, id: Uuid) -> AppResult<LogCostResult> {
        self.write("delete_cost", |tx, _, _| cost::delete_cost(tx, id))
    }

    pub fn finalize_allocation(&mut self, input: FinalizeAllocationInput) -> AppResult<Contract> {
        self.write("finalize_allocation", |tx, _, _| {
            allocation::finalize_allocation(tx, input)
        })
    }

    pub fn advance_stage(
        &mut self,
        contract_id: Uuid,
        cost_amount: Decimal,
    ) -> AppResult<AdvanceStageResult> {
        self.write("advance_stage", |tx, _, _| {
            stage::advance_stage(tx, contract_id, cost_amount)
        })
    }

    /// Reprice every bag from scratch
    pub fn recompute_all(&mut self) -> AppResult<usize> {
        let repriced = self.write("recompute_all", |tx, _, _| {
            CostPropagationEngine::new(tx).recompute_all()
        })?;
        info!(repriced, "recomputed all landed costs");
        Ok(repriced)
    }

    // ---------------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------------

    pub fn bags_of_lot(&self, lot_id: Uuid) -> AppResult<Vec<BagView>> {
        lot::bags_of_lot(self.tables(), lot_id)
    }

    pub fn available_inventory(&self) -> AppResult<Vec<AvailableBag>> {
        inventory::available_inventory(self.tables())
    }

    pub fn contract_journey(&self, contract_id: Uuid) -> AppResult<ContractJourney> {
        contract::journey(self.tables(), contract_id)
    }

    pub fn list_contract_journeys(&self) -> AppResult<Vec<ContractJourney>> {
        contract::list_journeys(self.tables())
    }

    fn auditor(&self) -> ShadowAuditor<'_> {
        ShadowAuditor::new(self.tables(), self.settings.audit_tolerance)
    }

    pub fn audit_bag(&self, bag_id: Uuid) -> AppResult<BagAudit> {
        self.auditor().audit_bag(bag_id)
    }

    pub fn audit_contract(&self, contract_id: Uuid) -> AppResult<ContractAudit> {
        self.auditor().audit_contract(contract_id)
    }

    pub fn audit_all(&self) -> AppResult<AuditSweep> {
        self.auditor().audit_all()
    }
}
