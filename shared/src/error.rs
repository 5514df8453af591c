//! Errors raised by pure domain rules

use thiserror::Error;

use crate::models::Stage;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("stage {0} is terminal and cannot be advanced")]
    AlreadyTerminal(Stage),

    #[error("{field}: {message}")]
    Invalid {
        field: &'static str,
        message: &'static str,
    },

    /// A money or weight figure left the range a `Decimal` can hold
    #[error("{0}: arithmetic overflow")]
    Overflow(&'static str),
}
