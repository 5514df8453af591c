//! Shared types and models for the coffee landed-cost ledger
//!
//! Pure domain code shared by the backend and any tooling that needs to
//! price a bag: entities, the stage state machine, the landed-cost formula
//! and input validation. Nothing here performs I/O.

pub mod costing;
pub mod error;
pub mod models;
pub mod types;
pub mod validation;

pub use costing::*;
pub use error::*;
pub use models::*;
pub use types::*;
pub use validation::*;
