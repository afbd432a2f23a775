pub mod controller;
pub mod domain;
pub mod encode;
pub mod error;
pub mod ports;
pub mod registry;
pub mod state_machine;
pub mod units;

pub use controller::{TransferController, TransferSettings};
pub use domain::{
    BatchStatus, CallBatch, CallCapabilities, CallReceipt, CallsStatus, Notification,
    PaymasterService, SubmissionHandle, TimestampMs, Token, TransferOutcome, TransferRequest,
    WalletCall,
};
pub use encode::{decode_uint, encode_balance_of, encode_transfer, parse_recipient, transfer_call};
pub use error::{TransferError, ValidationError};
pub use ports::{ClockPort, EnvironmentPort, NotifierPort, PortError, WalletPort};
pub use registry::{default_token, find_token, TOKENS};
pub use state_machine::{
    transfer_transition, StateTransition, TransferAction, TransferPhase, TransitionError,
};
pub use units::{format_amount, parse_amount};
