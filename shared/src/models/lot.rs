//! Lots and the lot-wide cost ledger

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single farm purchase, the unit lot-wide costs are billed to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lot {
    pub id: Uuid,
    pub farm_id: Uuid,
    /// Human-readable purchase number (e.g., "LOT-2026-0007")
    pub code: String,
    pub variety: String,
    pub process_method: ProcessMethod,
    pub total_weight_kg: Decimal,
    pub base_farm_cost_per_kg: Decimal,
    pub purchased_at: DateTime<Utc>,
}

/// Post-harvest processing method
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProcessMethod {
    Washed,
    Natural,
    Honey,
    Anaerobic,
    Other,
}

impl std::fmt::Display for ProcessMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessMethod::Washed => write!(f, "Washed"),
            ProcessMethod::Natural => write!(f, "Natural"),
            ProcessMethod::Honey => write!(f, "Honey"),
            ProcessMethod::Anaerobic => write!(f, "Anaerobic"),
            ProcessMethod::Other => write!(f, "Other"),
        }
    }
}

/// A lot-wide expense amortized over the lot's total weight
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostLedgerEntry {
    pub id: Uuid,
    pub lot_id: Uuid,
    pub cost_type: CostType,
    /// Negative amounts are credit notes
    pub amount_usd: Decimal,
    pub date_incurred: NaiveDate,
    pub notes: Option<String>,
}

/// Kinds of lot-level overhead
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CostType {
    Milling,
    Drying,
    Grading,
    Sorting,
    Bagging,
    Certification,
    Storage,
    Transport,
    Other,
}

/// Input for a lot purchase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyLotInput {
    pub farm_id: Uuid,
    pub variety: String,
    pub process_method: ProcessMethod,
    pub total_weight_kg: Decimal,
    pub base_farm_cost_per_kg: Decimal,
    /// Overrides the standard bag weight for this purchase
    pub bag_weight_kg: Option<Decimal>,
}

/// Result of a lot purchase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyLotResult {
    pub lot_id: Uuid,
    pub code: String,
    pub num_bags: usize,
    pub bag_ids: Vec<Uuid>,
}

/// Administrative correction of a purchased lot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorrectLotInput {
    pub total_weight_kg: Option<Decimal>,
    pub base_farm_cost_per_kg: Option<Decimal>,
}

/// Input for recording a ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogCostInput {
    pub lot_id: Uuid,
    pub cost_type: CostType,
    pub amount_usd: Decimal,
    pub date_incurred: NaiveDate,
    pub notes: Option<String>,
}

/// Input for editing a ledger entry; absent fields are left as they are
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCostInput {
    pub lot_id: Option<Uuid>,
    pub cost_type: Option<CostType>,
    pub amount_usd: Option<Decimal>,
    pub date_incurred: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Outcome of a ledger write
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogCostResult {
    pub id: Uuid,
    pub bags_recomputed: usize,
}

/// Most bags a single purchase may be cut into
pub const MAX_BAGS_PER_LOT: u32 = 100_000;

/// Cut a lot's weight into bags of `bag_weight_kg`, the last one holding the remainder.
///
/// A zero-weight lot yields no bags.
pub fn cut_bags(total_weight_kg: Decimal, bag_weight_kg: Decimal) -> Vec<Decimal> {
    let mut bags = Vec::new();
    if total_weight_kg <= Decimal::ZERO || bag_weight_kg <= Decimal::ZERO {
        return bags;
    }
    let mut remaining = total_weight_kg;
    while remaining > Decimal::ZERO {
        let weight = remaining.min(bag_weight_kg);
        bags.push(weight);
        remaining -= weight;
    }
    bags
}

/// Generate a lot purchase code
pub fn generate_lot_code(year: i32, sequence: u32) -> String {
    format!("LOT-{}-{:04}", year, sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cut_bags_with_remainder() {
        let bags = cut_bags(Decimal::from(1000), Decimal::from(69));
        assert_eq!(bags.len(), 15);
        assert!(bags[..14].iter().all(|w| *w == Decimal::from(69)));
        assert_eq!(bags[14], Decimal::from(34));
        assert_eq!(bags.iter().sum::<Decimal>(), Decimal::from(1000));
    }

    #[test]
    fn test_cut_bags_exact_multiple() {
        let bags = cut_bags(Decimal::from(138), Decimal::from(69));
        assert_eq!(bags, vec![Decimal::from(69), Decimal::from(69)]);
    }

    #[test]
    fn test_cut_bags_zero_weight() {
        assert!(cut_bags(Decimal::ZERO, Decimal::from(69)).is_empty());
    }

    #[test]
    fn test_lot_code_format() {
        assert_eq!(generate_lot_code(2026, 7), "LOT-2026-0007");
    }
}
