//! Bags cut from a lot and the milestone record that prices each of them

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CostField, Stage, Transition};
use crate::{checked_sum, DomainError};

/// Standard green-coffee export bag
pub const STANDARD_BAG_KG: u32 = 69;

/// A fixed-weight physical unit cut from a lot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bag {
    pub id: Uuid,
    pub lot_id: Uuid,
    /// Warehouse slot identifier assigned at creation
    pub stock_code: String,
    pub weight_kg: Decimal,
    pub status: BagStatus,
    pub contract_id: Option<Uuid>,
}

/// Inventory status of a bag
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BagStatus {
    Available,
    Allocated,
    Shipped,
}

impl std::fmt::Display for BagStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BagStatus::Available => write!(f, "Available"),
            BagStatus::Allocated => write!(f, "Allocated"),
            BagStatus::Shipped => write!(f, "Shipped"),
        }
    }
}

/// Financial journey of one bag.
///
/// The `cost_to_*` fields are per-kilogram costs, unset until the matching
/// transition happens. `final_sale_price` is the cached landed cost per kg.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BagMilestone {
    pub bag_id: Uuid,
    pub contract_id: Option<Uuid>,
    pub current_stage: Stage,
    pub cost_to_warehouse: Option<Decimal>,
    pub cost_to_export: Option<Decimal>,
    pub cost_to_import: Option<Decimal>,
    pub cost_to_client: Option<Decimal>,
    pub final_sale_price: Decimal,
}

impl BagMilestone {
    /// Milestone for a freshly cut bag
    pub fn new(bag_id: Uuid) -> Self {
        Self {
            bag_id,
            contract_id: None,
            current_stage: Stage::Farm,
            cost_to_warehouse: None,
            cost_to_export: None,
            cost_to_import: None,
            cost_to_client: None,
            final_sale_price: Decimal::ZERO,
        }
    }

    pub fn cost(&self, field: CostField) -> Option<Decimal> {
        match field {
            CostField::CostToWarehouse => self.cost_to_warehouse,
            CostField::CostToExport => self.cost_to_export,
            CostField::CostToImport => self.cost_to_import,
            CostField::CostToClient => self.cost_to_client,
        }
    }

    fn cost_mut(&mut self, field: CostField) -> &mut Option<Decimal> {
        match field {
            CostField::CostToWarehouse => &mut self.cost_to_warehouse,
            CostField::CostToExport => &mut self.cost_to_export,
            CostField::CostToImport => &mut self.cost_to_import,
            CostField::CostToClient => &mut self.cost_to_client,
        }
    }

    /// Sum of the four logistics columns, unset columns counting as zero
    pub fn logistics_per_kg(&self) -> Result<Decimal, DomainError> {
        checked_sum(
            CostField::ALL.iter().filter_map(|field| self.cost(*field)),
            "logistics_per_kg",
        )
    }

    /// Leave the current stage, writing `cost_per_kg` into the column owned
    /// by the stage being left. Columns of earlier stages are never touched.
    pub fn record_transition(&mut self, cost_per_kg: Decimal) -> Result<Transition, DomainError> {
        let transition = self.current_stage.advance()?;
        *self.cost_mut(transition.field) = Some(cost_per_kg);
        self.current_stage = transition.to;
        Ok(transition)
    }

    /// Restart the financial journey at `Farm` under a new contract
    pub fn restart_for(&mut self, contract_id: Uuid) {
        self.contract_id = Some(contract_id);
        self.current_stage = Stage::Farm;
        for field in CostField::ALL {
            *self.cost_mut(field) = None;
        }
    }
}

/// Bag with its milestone, as listed for a lot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BagView {
    #[serde(flatten)]
    pub bag: Bag,
    pub milestone: Option<BagMilestone>,
}

/// Row of the available-inventory projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableBag {
    pub bag_id: Uuid,
    pub lot_id: Uuid,
    pub lot_code: String,
    pub stock_code: String,
    pub variety: String,
    pub weight_kg: Decimal,
    pub landed_cost_per_kg: Decimal,
}
