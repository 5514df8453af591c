//! Fixtures shared by the ledger integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use landed_cost_backend::store::Tables;
use landed_cost_backend::{Ledger, LedgerSettings};
use rust_decimal::Decimal;
use shared::{
    BuyLotInput, BuyLotResult, Contract, CostType, FinalizeAllocationInput, LogCostInput,
    LogCostResult, ProcessMethod, RegisterClientInput, RegisterFarmInput, RegisterProducerInput,
};
use std::str::FromStr;
use uuid::Uuid;

/// Helper to create Decimal from string
pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
}

/// A ledger with one producer, one farm and one client registered
pub struct Fixture {
    pub ledger: Ledger,
    pub farm_id: Uuid,
    pub client_id: Uuid,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_settings(LedgerSettings::default())
    }

    pub fn with_settings(settings: LedgerSettings) -> Self {
        let mut ledger = Ledger::new(settings);
        let producer = ledger
            .register_producer(RegisterProducerInput {
                name: "Cooperativa El Cedro".to_string(),
                country: "Honduras".to_string(),
            })
            .unwrap();
        let farm = ledger
            .register_farm(RegisterFarmInput {
                producer_id: producer.id,
                name: "Finca La Esperanza".to_string(),
                region: Some("Marcala".to_string()),
                altitude_m: Some(1600),
                location: None,
            })
            .unwrap();
        let client = ledger
            .register_client(RegisterClientInput {
                name: "Nordic Roasters".to_string(),
                country: "Norway".to_string(),
            })
            .unwrap();

        Self {
            ledger,
            farm_id: farm.id,
            client_id: client.id,
        }
    }

    pub fn buy_input(&self, weight_kg: &str, base_cost: &str) -> BuyLotInput {
        BuyLotInput {
            farm_id: self.farm_id,
            variety: "Catuai".to_string(),
            process_method: ProcessMethod::Washed,
            total_weight_kg: dec(weight_kg),
            base_farm_cost_per_kg: dec(base_cost),
            bag_weight_kg: None,
        }
    }

    pub fn buy(&mut self, weight_kg: &str, base_cost: &str) -> BuyLotResult {
        let input = self.buy_input(weight_kg, base_cost);
        self.ledger.buy_lot(input).unwrap()
    }

    pub fn cost_input(lot_id: Uuid, amount: &str) -> LogCostInput {
        LogCostInput {
            lot_id,
            cost_type: CostType::Milling,
            amount_usd: dec(amount),
            date_incurred: date(),
            notes: None,
        }
    }

    pub fn log(&mut self, lot_id: Uuid, amount: &str) -> LogCostResult {
        self.ledger.log_cost(Self::cost_input(lot_id, amount)).unwrap()
    }

    pub fn allocate(&mut self, bag_ids: &[Uuid], sale_price: &str) -> Contract {
        self.ledger
            .finalize_allocation(FinalizeAllocationInput {
                client_id: self.client_id,
                sale_price_per_kg: dec(sale_price),
                bag_ids: bag_ids.to_vec(),
            })
            .unwrap()
    }

    /// Stored landed cost of a bag
    pub fn price(&self, bag_id: Uuid) -> Decimal {
        self.ledger.tables().milestones[&bag_id].final_sale_price
    }

    pub fn tables(&self) -> &Tables {
        self.ledger.tables()
    }
}

/// The landed-cost formula written out longhand
pub fn expected_price(tables: &Tables, bag_id: Uuid) -> Decimal {
    let bag = &tables.bags[&bag_id];
    let lot = &tables.lots[&bag.lot_id];
    let milestone = &tables.milestones[&bag_id];
    let ledger_sum: Decimal = tables
        .ledger
        .values()
        .filter(|e| e.lot_id == lot.id)
        .map(|e| e.amount_usd)
        .sum();
    let ledger_term = if lot.total_weight_kg.is_zero() {
        Decimal::ZERO
    } else {
        ledger_sum / lot.total_weight_kg
    };
    lot.base_farm_cost_per_kg
        + ledger_term
        + milestone.cost_to_warehouse.unwrap_or_default()
        + milestone.cost_to_export.unwrap_or_default()
        + milestone.cost_to_import.unwrap_or_default()
        + milestone.cost_to_client.unwrap_or_default()
}

/// Assert the landed-cost invariant for every bag, to 4 decimal places
pub fn assert_invariant(tables: &Tables) {
    for bag_id in tables.milestones.keys() {
        let stored = tables.milestones[bag_id].final_sale_price;
        let expected = expected_price(tables, *bag_id);
        assert_eq!(
            stored.round_dp(4),
            expected.round_dp(4),
            "bag {} drifted from the formula",
            bag_id
        );
    }
}
