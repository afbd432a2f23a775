use alloy::primitives::U256;
use thiserror::Error;

use crate::ports::PortError;
use crate::state_machine::TransitionError;

/// Input rejected before anything is sent to the wallet.
///
/// The `Display` text is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Insufficient balance")]
    InsufficientBalance { requested: U256, available: U256 },
    #[error("Invalid recipient address")]
    InvalidRecipient,
}

#[derive(Debug, Error)]
pub enum TransferError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Transfer failed: {0}")]
    Submission(String),
    #[error("unknown token: {0}")]
    UnknownToken(String),
    #[error(transparent)]
    Port(#[from] PortError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("transfer state error: {0}")]
    State(String),
}
