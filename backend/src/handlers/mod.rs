//! HTTP handlers for the landed-cost ledger

mod audit;
mod contract;
mod cost;
mod health;
mod inventory;
mod lot;
mod party;

pub use audit::*;
pub use contract::*;
pub use cost::*;
pub use health::*;
pub use inventory::*;
pub use lot::*;
pub use party::*;
