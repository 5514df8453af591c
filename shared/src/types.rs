//! Common types used across the ledger

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Absolute tolerance under which two landed-cost figures are considered equal
pub const AUDIT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 4);

/// Decimal places money figures are reported with
pub const REPORT_DP: u32 = 4;

/// Round a figure for reporting
pub fn round4(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(REPORT_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// GPS coordinates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

/// Result of comparing an independently calculated figure with a stored one
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiscrepancyReport {
    pub calculated: Decimal,
    pub actual: Decimal,
    pub discrepancy: Decimal,
    pub is_match: bool,
}

impl DiscrepancyReport {
    /// Compare on the unrounded figures, report rounded to four places.
    /// A difference too wide for a `Decimal` saturates and never matches.
    pub fn compare(calculated: Decimal, actual: Decimal, tolerance: Decimal) -> Self {
        let difference = calculated.saturating_sub(actual).abs();
        Self {
            calculated: round4(calculated),
            actual: round4(actual),
            discrepancy: round4(difference),
            is_match: difference < tolerance,
        }
    }
}
