use alloy::primitives::{Address, U256};
use thiserror::Error;

use crate::domain::{CallBatch, CallsStatus, Notification, SubmissionHandle};

#[derive(Debug, Error)]
pub enum PortError {
    #[error("port not implemented: {0}")]
    NotImplemented(&'static str),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("policy error: {0}")]
    Policy(String),
    #[error("not found: {0}")]
    NotFound(String),
}

/// Wallet capability surface: account, balances and EIP-5792 batched calls.
pub trait WalletPort {
    fn connected_account(&self) -> Result<Option<Address>, PortError>;
    fn token_balance(&self, owner: Address, token: Address) -> Result<U256, PortError>;
    fn send_calls(&self, batch: &CallBatch) -> Result<SubmissionHandle, PortError>;
    fn calls_status(&self, handle: &SubmissionHandle) -> Result<CallsStatus, PortError>;
}

pub trait NotifierPort {
    fn notify(&self, notification: Notification) -> Result<(), PortError>;
}

pub trait ClockPort {
    fn now_ms(&self) -> Result<u64, PortError>;
    fn sleep_ms(&self, ms: u64) -> Result<(), PortError>;
}

/// Process environment, read on demand rather than cached at startup.
pub trait EnvironmentPort {
    fn paymaster_url(&self) -> Option<String>;
}
