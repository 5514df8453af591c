//! Single-writer ledger task
//!
//! One task owns the [`Ledger`] and drains a bounded FIFO queue. Each job
//! runs to completion, recompute cascade included, before the next one
//! starts. Reads use the same queue so a read always observes every write
//! queued before it.

use rust_decimal::Decimal;
use shared::{
    AdvanceStageResult, AvailableBag, BagView, BuyLotInput, BuyLotResult, Client, Contract,
    ContractJourney, CorrectLotInput, CostLedgerEntry, Farm, FinalizeAllocationInput, Lot,
    LogCostInput, LogCostResult, Producer, RegisterClientInput, RegisterFarmInput,
    RegisterProducerInput, UpdateCostInput,
};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};
use uuid::Uuid;

use super::Ledger;
use crate::error::{AppError, AppResult};
use crate::services::audit::{AuditSweep, BagAudit, ContractAudit};

type Job = Box<dyn FnOnce(&mut Ledger) + Send>;

/// Owns the ledger and applies queued jobs one at a time
pub struct LedgerWorker {
    ledger: Ledger,
    rx: mpsc::Receiver<Job>,
}

impl LedgerWorker {
    /// Spawn the writer task and return a handle to its queue
    pub fn spawn(ledger: Ledger, queue_capacity: usize) -> LedgerHandle {
        let (tx, rx) = mpsc::channel(queue_capacity.max(1));
        let worker = LedgerWorker { ledger, rx };
        tokio::spawn(worker.run());
        LedgerHandle { tx }
    }

    async fn run(mut self) {
        info!("ledger writer started");
        let mut processed: u64 = 0;
        while let Some(job) = self.rx.recv().await {
            job(&mut self.ledger);
            processed += 1;
            debug!(processed, "ledger job done");
        }
        info!(processed, "ledger writer stopped");
    }
}

/// Cloneable entry point to the writer queue
#[derive(Clone)]
pub struct LedgerHandle {
    tx: mpsc::Sender<Job>,
}

impl LedgerHandle {
    /// Queue `f` behind every job already submitted and wait for its result
    pub async fn run<T, F>(&self, f: F) -> AppResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Ledger) -> AppResult<T> + Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let job: Job = Box::new(move |ledger| {
            // The caller may have gone away; the write still stands.
            let _ = reply_tx.send(f(ledger));
        });
        self.tx
            .send(job)
            .await
            .map_err(|_| AppError::WriterUnavailable)?;
        reply_rx.await.map_err(|_| AppError::WriterUnavailable)?
    }

    pub async fn register_producer(&self, input: RegisterProducerInput) -> AppResult<Producer> {
        self.run(move |ledger| ledger.register_producer(input)).await
    }

    pub async fn register_farm(&self, input: RegisterFarmInput) -> AppResult<Farm> {
        self.run(move |ledger| ledger.register_farm(input)).await
    }

    pub async fn register_client(&self, input: RegisterClientInput) -> AppResult<Client> {
        self.run(move |ledger| ledger.register_client(input)).await
    }

    pub async fn buy_lot(&self, input: BuyLotInput) -> AppResult<BuyLotResult> {
        self.run(move |ledger| ledger.buy_lot(input)).await
    }

    pub async fn correct_lot(&self, lot_id: Uuid, input: CorrectLotInput) -> AppResult<Lot> {
        self.run(move |ledger| ledger.correct_lot(lot_id, input)).await
    }

    pub async fn bags_of_lot(&self, lot_id: Uuid) -> AppResult<Vec<BagView>> {
        self.run(move |ledger| ledger.bags_of_lot(lot_id)).await
    }

    pub async fn log_cost(&self, input: LogCostInput) -> AppResult<LogCostResult> {
        self.run(move |ledger| ledger.log_cost(input)).await
    }

    pub async fn update_cost(&self, id: Uuid, input: UpdateCostInput) -> AppResult<CostLedgerEntry> {
        self.run(move |ledger| ledger.update_cost(id, input)).await
    }

    pub async fn delete_cost(&self, id: Uuid) -> AppResult<LogCostResult> {
        self.run(move |ledger| ledger.delete_cost(id)).await
    }

    pub async fn finalize_allocation(&self, input: FinalizeAllocationInput) -> AppResult<Contract> {
        self.run(move |ledger| ledger.finalize_allocation(input)).await
    }

    pub async fn advance_stage(
        &self,
        contract_id: Uuid,
        cost_amount: Decimal,
    ) -> AppResult<AdvanceStageResult> {
        self.run(move |ledger| ledger.advance_stage(contract_id, cost_amount))
            .await
    }

    pub async fn recompute_all(&self) -> AppResult<usize> {
        self.run(|ledger| ledger.recompute_all()).await
    }

    pub async fn available_inventory(&self) -> AppResult<Vec<AvailableBag>> {
        self.run(|ledger| ledger.available_inventory()).await
    }

    pub async fn contract_journey(&self, contract_id: Uuid) -> AppResult<ContractJourney> {
        self.run(move |ledger| ledger.contract_journey(contract_id))
            .await
    }

    pub async fn list_contract_journeys(&self) -> AppResult<Vec<ContractJourney>> {
        self.run(|ledger| ledger.list_contract_journeys()).await
    }

    pub async fn audit_bag(&self, bag_id: Uuid) -> AppResult<BagAudit> {
        self.run(move |ledger| ledger.audit_bag(bag_id)).await
    }

    pub async fn audit_contract(&self, contract_id: Uuid) -> AppResult<ContractAudit> {
        self.run(move |ledger| ledger.audit_contract(contract_id))
            .await
    }

    pub async fn audit_all(&self) -> AppResult<AuditSweep> {
        self.run(|ledger| ledger.audit_all()).await
    }

    /// Whether the writer task still answers
    pub async fn ping(&self) -> bool {
        self.run(|_| Ok(())).await.is_ok()
    }
}
