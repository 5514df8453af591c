//! Domain models for the coffee landed-cost ledger

mod bag;
mod contract;
mod lot;
mod party;
mod stage;

pub use bag::*;
pub use contract::*;
pub use lot::*;
pub use party::*;
pub use stage::*;
