//! Logistics stages a bag's financial journey passes through

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Stage of a bag in the export/import chain.
///
/// Stages are strictly ordered. A bag only ever moves to the next stage and
/// `FinalDestination` cannot be left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    #[serde(rename = "Farm")]
    Farm,
    /// Dry mill / warehouse
    #[serde(rename = "Cora")]
    Cora,
    #[serde(rename = "Port-Export")]
    PortExport,
    #[serde(rename = "Port-Import")]
    PortImport,
    #[serde(rename = "Final Destination")]
    FinalDestination,
}

/// Per-kilogram logistics cost column on a milestone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostField {
    CostToWarehouse,
    CostToExport,
    CostToImport,
    CostToClient,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::Farm,
        Stage::Cora,
        Stage::PortExport,
        Stage::PortImport,
        Stage::FinalDestination,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Farm => "Farm",
            Stage::Cora => "Cora",
            Stage::PortExport => "Port-Export",
            Stage::PortImport => "Port-Import",
            Stage::FinalDestination => "Final Destination",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Stage::ALL.into_iter().find(|stage| stage.as_str() == s)
    }

    /// Zero-based position in the journey
    pub fn order(&self) -> u8 {
        match self {
            Stage::Farm => 0,
            Stage::Cora => 1,
            Stage::PortExport => 2,
            Stage::PortImport => 3,
            Stage::FinalDestination => 4,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::FinalDestination)
    }

    /// The stage that follows this one, or `None` at the terminal stage
    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::Farm => Some(Stage::Cora),
            Stage::Cora => Some(Stage::PortExport),
            Stage::PortExport => Some(Stage::PortImport),
            Stage::PortImport => Some(Stage::FinalDestination),
            Stage::FinalDestination => None,
        }
    }

    /// Cost column written when a bag leaves this stage
    pub fn cost_field(&self) -> Option<CostField> {
        match self {
            Stage::Farm => Some(CostField::CostToWarehouse),
            Stage::Cora => Some(CostField::CostToExport),
            Stage::PortExport => Some(CostField::CostToImport),
            Stage::PortImport => Some(CostField::CostToClient),
            Stage::FinalDestination => None,
        }
    }

    /// Resolve a single transition out of this stage.
    ///
    /// Advancing from the terminal stage is an error, never a no-op.
    pub fn advance(&self) -> Result<Transition, DomainError> {
        match (self.next(), self.cost_field()) {
            (Some(to), Some(field)) => Ok(Transition {
                from: *self,
                to,
                field,
            }),
            _ => Err(DomainError::AlreadyTerminal(*self)),
        }
    }

    /// Bags that have left the warehouse no longer count as inventory
    pub fn is_shipped(&self) -> bool {
        self.order() > Stage::Cora.order()
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CostField {
    pub const ALL: [CostField; 4] = [
        CostField::CostToWarehouse,
        CostField::CostToExport,
        CostField::CostToImport,
        CostField::CostToClient,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CostField::CostToWarehouse => "cost_to_warehouse",
            CostField::CostToExport => "cost_to_export",
            CostField::CostToImport => "cost_to_import",
            CostField::CostToClient => "cost_to_client",
        }
    }
}

impl std::fmt::Display for CostField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One legal step of the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub from: Stage,
    pub to: Stage,
    pub field: CostField,
}
