//! Landed cost per kilogram
//!
//! ```text
//! landed = base_farm_cost_per_kg
//!        + SUM(ledger.amount_usd for the lot) / lot.total_weight_kg
//!        + cost_to_warehouse + cost_to_export + cost_to_import + cost_to_client
//! ```
//!
//! Unset logistics columns count as zero. A lot weighing zero contributes
//! nothing through the ledger term instead of dividing by zero. Every step
//! is checked: a figure outside the `Decimal` range is an error, not a panic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{BagMilestone, CostLedgerEntry, Lot};
use crate::DomainError;

/// The three terms of a bag's landed cost
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LandedCost {
    pub base_farm_cost_per_kg: Decimal,
    pub ledger_per_kg: Decimal,
    pub logistics_per_kg: Decimal,
}

impl LandedCost {
    /// Price a bag from its lot, the lot's ledger rows and its milestone
    pub fn for_bag<'a>(
        lot: &Lot,
        ledger: impl IntoIterator<Item = &'a CostLedgerEntry>,
        milestone: &BagMilestone,
    ) -> Result<Self, DomainError> {
        let ledger_total = checked_sum(
            ledger
                .into_iter()
                .filter(|entry| entry.lot_id == lot.id)
                .map(|entry| entry.amount_usd),
            "amount_usd",
        )?;

        Ok(Self {
            base_farm_cost_per_kg: lot.base_farm_cost_per_kg,
            ledger_per_kg: amortize(ledger_total, lot.total_weight_kg)?,
            logistics_per_kg: milestone.logistics_per_kg()?,
        })
    }

    pub fn total(&self) -> Result<Decimal, DomainError> {
        checked_sum(
            [
                self.base_farm_cost_per_kg,
                self.ledger_per_kg,
                self.logistics_per_kg,
            ],
            "final_sale_price",
        )
    }
}

/// Add up figures, reporting `field` if the running total overflows
pub fn checked_sum(
    values: impl IntoIterator<Item = Decimal>,
    field: &'static str,
) -> Result<Decimal, DomainError> {
    values.into_iter().try_fold(Decimal::ZERO, |total, value| {
        total.checked_add(value).ok_or(DomainError::Overflow(field))
    })
}

/// Spread an amount over a weight; zero (or negative) weight spreads to zero
pub fn amortize(amount: Decimal, weight_kg: Decimal) -> Result<Decimal, DomainError> {
    if weight_kg <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    amount
        .checked_div(weight_kg)
        .ok_or(DomainError::Overflow("cost_per_kg"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CostType, ProcessMethod};
    use chrono::{NaiveDate, Utc};
    use proptest::prelude::*;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn lot(weight: &str, base: &str) -> Lot {
        Lot {
            id: Uuid::new_v4(),
            farm_id: Uuid::new_v4(),
            code: "LOT-2026-0001".to_string(),
            variety: "Typica".to_string(),
            process_method: ProcessMethod::Washed,
            total_weight_kg: dec(weight),
            base_farm_cost_per_kg: dec(base),
            purchased_at: Utc::now(),
        }
    }

    fn entry(lot_id: Uuid, amount: &str) -> CostLedgerEntry {
        CostLedgerEntry {
            id: Uuid::new_v4(),
            lot_id,
            cost_type: CostType::Milling,
            amount_usd: dec(amount),
            date_incurred: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            notes: None,
        }
    }

    #[test]
    fn test_ledger_term_amortizes_over_lot_weight() {
        let lot = lot("1000", "10");
        let ledger = vec![entry(lot.id, "500")];
        let milestone = BagMilestone::new(Uuid::new_v4());

        let cost = LandedCost::for_bag(&lot, &ledger, &milestone).unwrap();
        assert_eq!(cost.ledger_per_kg, dec("0.5"));
        assert_eq!(cost.total().unwrap(), dec("10.5"));
    }

    #[test]
    fn test_other_lots_ledger_rows_are_ignored() {
        let lot = lot("1000", "10");
        let ledger = vec![entry(lot.id, "500"), entry(Uuid::new_v4(), "9999")];
        let milestone = BagMilestone::new(Uuid::new_v4());

        let cost = LandedCost::for_bag(&lot, &ledger, &milestone).unwrap();
        assert_eq!(cost.total().unwrap(), dec("10.5"));
    }

    #[test]
    fn test_zero_weight_lot_has_no_ledger_term() {
        let lot = lot("0", "10");
        let ledger = vec![entry(lot.id, "500")];
        let milestone = BagMilestone::new(Uuid::new_v4());

        let cost = LandedCost::for_bag(&lot, &ledger, &milestone).unwrap();
        assert_eq!(cost.ledger_per_kg, Decimal::ZERO);
        assert_eq!(cost.total().unwrap(), dec("10"));
    }

    #[test]
    fn test_logistics_columns_are_added() {
        let lot = lot("1000", "10");
        let mut milestone = BagMilestone::new(Uuid::new_v4());
        milestone.record_transition(dec("0.25")).unwrap();
        milestone.record_transition(dec("0.75")).unwrap();

        let cost = LandedCost::for_bag(&lot, std::iter::empty(), &milestone).unwrap();
        assert_eq!(cost.total().unwrap(), dec("11"));
    }

    #[test]
    fn test_ledger_total_beyond_decimal_range_is_an_error() {
        let lot = lot("138", "10");
        let ledger = vec![
            entry(lot.id, &Decimal::MAX.to_string()),
            entry(lot.id, &Decimal::MAX.to_string()),
        ];
        let milestone = BagMilestone::new(Uuid::new_v4());

        assert_eq!(
            LandedCost::for_bag(&lot, &ledger, &milestone),
            Err(DomainError::Overflow("amount_usd"))
        );
    }

    #[test]
    fn test_amortize_over_fraction_of_a_kilo_can_overflow() {
        assert_eq!(
            amortize(Decimal::MAX, dec("0.5")),
            Err(DomainError::Overflow("cost_per_kg"))
        );
        assert_eq!(amortize(Decimal::MAX, Decimal::ZERO), Ok(Decimal::ZERO));
    }

    #[test]
    fn test_total_overflow_is_an_error() {
        let cost = LandedCost {
            base_farm_cost_per_kg: Decimal::MAX,
            ledger_per_kg: Decimal::ONE,
            logistics_per_kg: Decimal::ZERO,
        };
        assert_eq!(cost.total(), Err(DomainError::Overflow("final_sale_price")));
    }

    proptest! {
        #[test]
        fn prop_amortize_spreads_back_to_amount(
            cents in -1_000_000i64..1_000_000,
            weight in 1u32..100_000
        ) {
            let amount = Decimal::new(cents, 2);
            let weight = Decimal::from(weight);
            prop_assert_eq!((amortize(amount, weight).unwrap() * weight).round_dp(8), amount);
        }

        #[test]
        fn prop_splitting_an_entry_keeps_the_price(
            first in 1i64..500_000,
            second in 1i64..500_000,
            weight in 1u32..5000
        ) {
            let lot = lot(&weight.to_string(), "10");
            let milestone = BagMilestone::new(Uuid::new_v4());
            let split = vec![
                entry(lot.id, &Decimal::new(first, 2).to_string()),
                entry(lot.id, &Decimal::new(second, 2).to_string()),
            ];
            let whole = vec![entry(lot.id, &Decimal::new(first + second, 2).to_string())];

            prop_assert_eq!(
                LandedCost::for_bag(&lot, &split, &milestone).unwrap().total().unwrap().round_dp(12),
                LandedCost::for_bag(&lot, &whole, &milestone).unwrap().total().unwrap().round_dp(12)
            );
        }
    }
}
