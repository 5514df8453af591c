//! Warehouse stock codes for freshly cut bags
//!
//! Slotting lives outside the ledger; the ledger only needs a code per bag.

use rust_decimal::Decimal;

/// Assigns a warehouse slot identifier to each new bag
pub trait StockCodeGenerator: Send {
    fn stock_code(&self, lot_code: &str, bag_number: usize, weight_kg: Decimal) -> String;
}

/// `<lot code>-<bag number>`, e.g. `LOT-2026-0007-003`
#[derive(Debug, Clone, Default)]
pub struct SequentialStockCodes;

impl StockCodeGenerator for SequentialStockCodes {
    fn stock_code(&self, lot_code: &str, bag_number: usize, _weight_kg: Decimal) -> String {
        format!("{}-{:03}", lot_code, bag_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_codes() {
        let codes = SequentialStockCodes;
        assert_eq!(
            codes.stock_code("LOT-2026-0007", 3, Decimal::from(69)),
            "LOT-2026-0007-003"
        );
    }
}
