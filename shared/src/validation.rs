//! Validation utilities for ledger inputs

use rust_decimal::Decimal;

use crate::error::DomainError;
use crate::models::{
    BuyLotInput, CorrectLotInput, FinalizeAllocationInput, LogCostInput, MAX_BAGS_PER_LOT,
};

fn invalid(field: &'static str, message: &'static str) -> DomainError {
    DomainError::Invalid { field, message }
}

/// Validate that a required name is present
pub fn validate_name(field: &'static str, name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(invalid(field, "must not be empty"));
    }
    Ok(())
}

/// Validate a lot purchase. Bags default to `standard_bag_kg` when the
/// input names no bag weight.
pub fn validate_buy_lot(input: &BuyLotInput, standard_bag_kg: Decimal) -> Result<(), DomainError> {
    validate_name("variety", &input.variety)?;
    if input.total_weight_kg < Decimal::ZERO {
        return Err(invalid("total_weight_kg", "must not be negative"));
    }
    if input.base_farm_cost_per_kg < Decimal::ZERO {
        return Err(invalid("base_farm_cost_per_kg", "must not be negative"));
    }
    let bag_weight = input.bag_weight_kg.unwrap_or(standard_bag_kg);
    if bag_weight <= Decimal::ZERO {
        return Err(invalid("bag_weight_kg", "must be positive"));
    }
    validate_bag_count(input.total_weight_kg, bag_weight)
}

/// Reject a cut that would yield more than [`MAX_BAGS_PER_LOT`] bags
pub fn validate_bag_count(total_weight_kg: Decimal, bag_weight_kg: Decimal) -> Result<(), DomainError> {
    let too_many = || invalid("bag_weight_kg", "too small for the lot weight");
    let bags = total_weight_kg
        .checked_div(bag_weight_kg)
        .ok_or_else(too_many)?
        .ceil();
    if bags > Decimal::from(MAX_BAGS_PER_LOT) {
        return Err(too_many());
    }
    Ok(())
}

/// Validate an administrative lot correction
pub fn validate_correct_lot(input: &CorrectLotInput) -> Result<(), DomainError> {
    if input.total_weight_kg.is_none() && input.base_farm_cost_per_kg.is_none() {
        return Err(invalid("total_weight_kg/base_farm_cost_per_kg", "nothing to correct"));
    }
    if matches!(input.total_weight_kg, Some(w) if w < Decimal::ZERO) {
        return Err(invalid("total_weight_kg", "must not be negative"));
    }
    if matches!(input.base_farm_cost_per_kg, Some(c) if c < Decimal::ZERO) {
        return Err(invalid("base_farm_cost_per_kg", "must not be negative"));
    }
    Ok(())
}

/// Validate a ledger entry. Negative amounts (credit notes) are allowed, zero is not.
pub fn validate_log_cost(input: &LogCostInput) -> Result<(), DomainError> {
    validate_cost_amount(input.amount_usd)
}

pub fn validate_cost_amount(amount_usd: Decimal) -> Result<(), DomainError> {
    if amount_usd.is_zero() {
        return Err(invalid("amount_usd", "must not be zero"));
    }
    Ok(())
}

/// Validate an allocation about to become a contract
pub fn validate_allocation(input: &FinalizeAllocationInput) -> Result<(), DomainError> {
    if input.bag_ids.is_empty() {
        return Err(invalid("bag_ids", "at least one bag is required"));
    }
    let mut seen = std::collections::HashSet::new();
    if !input.bag_ids.iter().all(|id| seen.insert(*id)) {
        return Err(invalid("bag_ids", "bags must not repeat"));
    }
    if input.sale_price_per_kg < Decimal::ZERO {
        return Err(invalid("sale_price_per_kg", "must not be negative"));
    }
    Ok(())
}

/// Validate the whole-shipment amount entered when advancing a stage
pub fn validate_stage_cost(cost_amount: Decimal) -> Result<(), DomainError> {
    if cost_amount < Decimal::ZERO {
        return Err(invalid("cost_amount", "must not be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProcessMethod;
    use uuid::Uuid;

    fn standard() -> Decimal {
        Decimal::from(69)
    }

    fn buy(total: i64, base: i64) -> BuyLotInput {
        BuyLotInput {
            farm_id: Uuid::new_v4(),
            variety: "Geisha".to_string(),
            process_method: ProcessMethod::Natural,
            total_weight_kg: Decimal::from(total),
            base_farm_cost_per_kg: Decimal::from(base),
            bag_weight_kg: None,
        }
    }

    #[test]
    fn test_buy_lot_accepts_zero_weight() {
        assert!(validate_buy_lot(&buy(0, 10), standard()).is_ok());
    }

    #[test]
    fn test_buy_lot_rejects_negative_figures() {
        assert!(validate_buy_lot(&buy(-1, 10), standard()).is_err());
        assert!(validate_buy_lot(&buy(100, -1), standard()).is_err());
    }

    #[test]
    fn test_buy_lot_rejects_zero_bag_weight() {
        let mut input = buy(100, 10);
        input.bag_weight_kg = Some(Decimal::ZERO);
        assert_eq!(
            validate_buy_lot(&input, standard()),
            Err(DomainError::Invalid {
                field: "bag_weight_kg",
                message: "must be positive"
            })
        );
    }

    #[test]
    fn test_buy_lot_bounds_the_bag_count() {
        let mut input = buy(1_000_000, 10);
        input.bag_weight_kg = Some(Decimal::new(1, 6));
        assert_eq!(
            validate_buy_lot(&input, standard()),
            Err(DomainError::Invalid {
                field: "bag_weight_kg",
                message: "too small for the lot weight"
            })
        );

        input.bag_weight_kg = Some(Decimal::from(10));
        assert!(validate_buy_lot(&input, standard()).is_ok());
    }

    #[test]
    fn test_bag_count_limit_is_inclusive() {
        let limit = Decimal::from(MAX_BAGS_PER_LOT);
        assert!(validate_bag_count(limit, Decimal::ONE).is_ok());
        assert!(validate_bag_count(limit + Decimal::new(1, 1), Decimal::ONE).is_err());
    }

    #[test]
    fn test_standard_bag_weight_applies_when_none_given() {
        let input = buy(1_000_000, 10);
        assert!(validate_buy_lot(&input, standard()).is_ok());
        assert!(validate_buy_lot(&input, Decimal::new(1, 3)).is_err());
        assert!(validate_buy_lot(&input, Decimal::ZERO).is_err());
    }

    #[test]
    fn test_bag_count_division_overflow_is_rejected() {
        assert!(validate_bag_count(Decimal::MAX, Decimal::new(1, 28)).is_err());
    }

    #[test]
    fn test_correct_lot_requires_a_change() {
        assert!(validate_correct_lot(&CorrectLotInput::default()).is_err());
        let input = CorrectLotInput {
            total_weight_kg: Some(Decimal::ZERO),
            base_farm_cost_per_kg: None,
        };
        assert!(validate_correct_lot(&input).is_ok());
    }

    #[test]
    fn test_allocation_rejects_empty_and_duplicates() {
        let mut input = FinalizeAllocationInput {
            client_id: Uuid::new_v4(),
            sale_price_per_kg: Decimal::from(12),
            bag_ids: vec![],
        };
        assert!(validate_allocation(&input).is_err());

        let bag = Uuid::new_v4();
        input.bag_ids = vec![bag, bag];
        assert!(validate_allocation(&input).is_err());

        input.bag_ids = vec![bag];
        assert!(validate_allocation(&input).is_ok());
    }

    #[test]
    fn test_cost_amount_rules() {
        assert!(validate_cost_amount(Decimal::from(-20)).is_ok());
        assert!(validate_cost_amount(Decimal::ZERO).is_err());
        assert!(validate_stage_cost(Decimal::ZERO).is_ok());
        assert!(validate_stage_cost(Decimal::from(-1)).is_err());
    }
}
