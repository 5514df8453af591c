//! Business logic services for the landed-cost ledger
//!
//! Write services take the transaction's staged [`Tables`](crate::store::Tables)
//! and run inside one [`EntityStore::transaction`](crate::store::EntityStore::transaction).

pub mod allocation;
pub mod audit;
pub mod contract;
pub mod cost;
pub mod inventory;
pub mod lot;
pub mod propagation;
pub mod registry;
pub mod stage;
pub mod stock_code;

pub use audit::ShadowAuditor;
pub use propagation::CostPropagationEngine;
