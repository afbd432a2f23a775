use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferPhase {
    Idle,
    Validating,
    Encoding,
    Submitting,
    AwaitingConfirmation,
    Confirmed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferAction {
    Validate,
    Encode,
    Reject,
    Submit,
    SubmitFailed,
    Accepted,
    Confirm,
    Fail,
    TimedOut,
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransition {
    pub from: TransferPhase,
    pub to: TransferPhase,
    pub action: TransferAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("illegal transfer transition: {from:?} --{action:?}-->")]
pub struct TransitionError {
    pub from: TransferPhase,
    pub action: TransferAction,
}

pub fn transfer_transition(
    from: TransferPhase,
    action: TransferAction,
) -> Result<(TransferPhase, StateTransition), TransitionError> {
    use TransferAction as A;
    use TransferPhase as P;

    let to = match (from, action) {
        (P::Idle, A::Validate) => P::Validating,
        (P::Validating, A::Reject) | (P::Encoding, A::Reject) => P::Idle,
        (P::Validating, A::Encode) => P::Encoding,
        (P::Encoding, A::Submit) => P::Submitting,
        (P::Submitting, A::SubmitFailed) => P::Idle,
        (P::Submitting, A::Accepted) => P::AwaitingConfirmation,
        (P::AwaitingConfirmation, A::Confirm) => P::Confirmed,
        (P::AwaitingConfirmation, A::Fail) | (P::AwaitingConfirmation, A::TimedOut) => P::Failed,
        (P::Confirmed, A::Reset) | (P::Failed, A::Reset) => P::Idle,
        _ => return Err(TransitionError { from, action }),
    };
    Ok((
        to,
        StateTransition {
            from,
            to,
            action,
        },
    ))
}

impl TransferPhase {
    /// A transfer is in flight between submission and its terminal status.
    pub fn is_busy(self) -> bool {
        matches!(
            self,
            Self::Validating | Self::Encoding | Self::Submitting | Self::AwaitingConfirmation
        )
    }
}
