//! Sale contracts binding bags to a client

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Stage;

/// A client contract covering N bags
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contract {
    pub id: Uuid,
    pub client_id: Uuid,
    pub sale_price_per_kg: Decimal,
    pub status: ContractStatus,
    pub created_at: DateTime<Utc>,
}

/// Fulfilled exactly when every bag has reached the terminal stage
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ContractStatus {
    Processing,
    Fulfilled,
}

impl std::fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContractStatus::Processing => write!(f, "Processing"),
            ContractStatus::Fulfilled => write!(f, "Fulfilled"),
        }
    }
}

/// Input for closing an allocation into a contract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalizeAllocationInput {
    pub client_id: Uuid,
    pub sale_price_per_kg: Decimal,
    pub bag_ids: Vec<Uuid>,
}

/// Input for advancing a contract one stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceStageInput {
    /// Whole-shipment amount in USD, spread evenly over the contract weight
    pub cost_amount: Decimal,
}

/// Outcome of a stage advance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceStageResult {
    pub contract_id: Uuid,
    pub previous_stage: Stage,
    pub next_stage: Stage,
    pub cost_per_kg: Decimal,
    pub bags_advanced: usize,
    pub contract_status: ContractStatus,
}

/// Contract-level rollup, computed on read
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContractSummary {
    pub contract_id: Uuid,
    pub client_id: Uuid,
    pub status: ContractStatus,
    pub bag_count: usize,
    pub total_weight_kg: Decimal,
    /// Average landed cost per kilogram, each bag weighted by its weight.
    ///
    /// A plain mean over bags would overstate the cost of a contract holding
    /// a light remainder bag and would stop agreeing with the auditor's
    /// per-lot figure, which prices kilograms, not bags. The unweighted
    /// figure is `mean_bag_landed_cost`.
    pub avg_landed_cost: Decimal,
    /// Plain mean of the bags' landed cost
    pub mean_bag_landed_cost: Decimal,
    pub sale_price_per_kg: Decimal,
    pub margin_per_kg: Decimal,
    pub current_stage: Option<Stage>,
}

/// Contract journey view with client details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractJourney {
    #[serde(flatten)]
    pub summary: ContractSummary,
    pub client_name: String,
}
