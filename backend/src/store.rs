//! In-process entity store
//!
//! All records live in ordered maps so every sweep over them is
//! deterministic. Writes go through [`EntityStore::transaction`], which runs
//! the operation against a staged copy and publishes it only when the
//! operation succeeds: a failed write is never observable.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use shared::{
    checked_sum, Bag, BagMilestone, Client, Contract, CostLedgerEntry, Farm, Lot, Producer,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Every table of the ledger
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub producers: BTreeMap<Uuid, Producer>,
    pub farms: BTreeMap<Uuid, Farm>,
    pub clients: BTreeMap<Uuid, Client>,
    pub lots: BTreeMap<Uuid, Lot>,
    pub ledger: BTreeMap<Uuid, CostLedgerEntry>,
    pub bags: BTreeMap<Uuid, Bag>,
    /// Keyed by bag id, one-to-one with `bags`
    pub milestones: BTreeMap<Uuid, BagMilestone>,
    pub contracts: BTreeMap<Uuid, Contract>,
    /// Last lot purchase sequence number handed out
    pub lot_sequence: u32,
}

impl Tables {
    pub fn lot(&self, id: Uuid) -> AppResult<&Lot> {
        self.lots.get(&id).ok_or(AppError::missing("Lot", id))
    }

    pub fn lot_mut(&mut self, id: Uuid) -> AppResult<&mut Lot> {
        self.lots.get_mut(&id).ok_or(AppError::missing("Lot", id))
    }

    pub fn bag(&self, id: Uuid) -> AppResult<&Bag> {
        self.bags.get(&id).ok_or(AppError::missing("Bag", id))
    }

    pub fn contract(&self, id: Uuid) -> AppResult<&Contract> {
        self.contracts.get(&id).ok_or(AppError::missing("Contract", id))
    }

    pub fn client(&self, id: Uuid) -> AppResult<&Client> {
        self.clients.get(&id).ok_or(AppError::missing("Client", id))
    }

    pub fn milestone(&self, bag_id: Uuid) -> AppResult<&BagMilestone> {
        self.milestones
            .get(&bag_id)
            .ok_or(AppError::missing("BagMilestone", bag_id))
    }

    pub fn milestone_mut(&mut self, bag_id: Uuid) -> AppResult<&mut BagMilestone> {
        self.milestones
            .get_mut(&bag_id)
            .ok_or(AppError::missing("BagMilestone", bag_id))
    }

    /// Ids of every bag cut from a lot
    pub fn bag_ids_of_lot(&self, lot_id: Uuid) -> Vec<Uuid> {
        self.bags
            .values()
            .filter(|bag| bag.lot_id == lot_id)
            .map(|bag| bag.id)
            .collect()
    }

    /// Bags currently bound to a contract
    pub fn bags_of_contract(&self, contract_id: Uuid) -> impl Iterator<Item = &Bag> {
        self.bags
            .values()
            .filter(move |bag| bag.contract_id == Some(contract_id))
    }

    /// Ledger rows billed to a lot
    pub fn ledger_of_lot(&self, lot_id: Uuid) -> impl Iterator<Item = &CostLedgerEntry> {
        self.ledger
            .values()
            .filter(move |entry| entry.lot_id == lot_id)
    }

    pub fn total_weight_of_contract(&self, contract_id: Uuid) -> AppResult<Decimal> {
        Ok(checked_sum(
            self.bags_of_contract(contract_id).map(|bag| bag.weight_kg),
            "total_weight_kg",
        )?)
    }
}

/// Transactional store over [`Tables`]
#[derive(Debug, Default)]
pub struct EntityStore {
    tables: Tables,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read-only view of the committed state
    pub fn read(&self) -> &Tables {
        &self.tables
    }

    /// Run `op` atomically. On error every change it made is discarded.
    ///
    /// `op` works on a full copy of the tables, so a write costs time in
    /// proportion to the size of the ledger.
    pub fn transaction<T>(
        &mut self,
        op: impl FnOnce(&mut Tables) -> AppResult<T>,
    ) -> AppResult<T> {
        let mut staged = self.tables.clone();
        let value = op(&mut staged)?;
        self.tables = staged;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn producer() -> Producer {
        Producer {
            id: Uuid::new_v4(),
            name: "Finca Alta".to_string(),
            country: "Colombia".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_transaction_commits_on_success() {
        let mut store = EntityStore::new();
        let p = producer();
        let id = p.id;
        store
            .transaction(|tx| {
                tx.producers.insert(p.id, p);
                Ok(())
            })
            .unwrap();
        assert!(store.read().producers.contains_key(&id));
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let mut store = EntityStore::new();
        let p = producer();
        let missing = Uuid::new_v4();
        let result = store.transaction(|tx| {
            tx.producers.insert(p.id, p);
            tx.lot_sequence += 1;
            tx.lot(missing).map(|_| ())
        });
        assert!(matches!(
            result,
            Err(AppError::ReferentialIntegrity { entity: "Lot", .. })
        ));
        assert!(store.read().producers.is_empty());
        assert_eq!(store.read().lot_sequence, 0);
    }
}
