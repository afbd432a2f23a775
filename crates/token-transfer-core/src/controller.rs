//! Transfer flow controller.
//!
//! Owns the transfer form, turns it into a single ERC-20 `transfer` call,
//! hands that call to the wallet as a one-item batch and reacts to the
//! batch status the wallet reports back.

use std::sync::{Mutex, MutexGuard};

use alloy::primitives::{Address, U256};
use tracing::{debug, info, warn};

use crate::domain::{
    BatchStatus, CallBatch, CallCapabilities, CallsStatus, Notification, PaymasterService,
    SubmissionHandle, Token, TransferOutcome, TransferRequest,
};
use crate::encode::{parse_recipient, transfer_call};
use crate::error::{TransferError, ValidationError};
use crate::ports::{ClockPort, EnvironmentPort, NotifierPort, WalletPort};
use crate::registry::{default_token, find_token};
use crate::state_machine::{transfer_transition, TransferAction, TransferPhase};
use crate::units::parse_amount;

#[derive(Debug, Clone)]
pub struct TransferSettings {
    pub explorer_base_url: String,
    pub poll_interval_ms: u64,
    /// `None` waits for a terminal batch status indefinitely.
    pub confirmation_timeout_ms: Option<u64>,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            explorer_base_url: "https://basescan.org".to_owned(),
            poll_interval_ms: 1_000,
            confirmation_timeout_ms: Some(5 * 60 * 1000),
        }
    }
}

#[derive(Debug)]
struct ControllerState {
    request: TransferRequest,
    phase: TransferPhase,
    balance: Option<U256>,
    handle: Option<SubmissionHandle>,
    submitted_at_ms: Option<u64>,
    last_outcome: Option<TransferOutcome>,
}

pub struct TransferController<W, N, C, E>
where
    W: WalletPort,
    N: NotifierPort,
    C: ClockPort,
    E: EnvironmentPort,
{
    pub wallet: W,
    pub notifier: N,
    pub clock: C,
    pub environment: E,
    settings: TransferSettings,
    state: Mutex<ControllerState>,
}

impl<W, N, C, E> TransferController<W, N, C, E>
where
    W: WalletPort,
    N: NotifierPort,
    C: ClockPort,
    E: EnvironmentPort,
{
    pub fn new(wallet: W, notifier: N, clock: C, environment: E, settings: TransferSettings) -> Self {
        Self {
            wallet,
            notifier,
            clock,
            environment,
            settings,
            state: Mutex::new(ControllerState {
                request: TransferRequest::new(*default_token()),
                phase: TransferPhase::Idle,
                balance: None,
                handle: None,
                submitted_at_ms: None,
                last_outcome: None,
            }),
        }
    }

    pub fn select_token(&self, symbol: &str) -> Result<Token, TransferError> {
        let token =
            *find_token(symbol).ok_or_else(|| TransferError::UnknownToken(symbol.to_owned()))?;
        let mut state = self.state()?;
        if state.request.token != token {
            state.request.token = token;
            state.balance = None;
        }
        Ok(token)
    }

    pub fn set_recipient(&self, raw: impl Into<String>) -> Result<(), TransferError> {
        self.state()?.request.recipient = raw.into();
        Ok(())
    }

    pub fn set_amount(&self, raw: impl Into<String>) -> Result<(), TransferError> {
        self.state()?.request.amount = raw.into();
        Ok(())
    }

    /// Re-reads the connected account's balance of the selected token.
    ///
    /// A failed lookup leaves the balance unknown, which disables the
    /// insufficient-balance check rather than blocking the transfer.
    pub fn refresh_balance(&self) -> Result<Option<U256>, TransferError> {
        let token = self.state()?.request.token;
        let balance = match self.lookup_balance(token.address) {
            Ok(balance) => balance,
            Err(e) => {
                warn!(token = token.symbol, error = %e, "balance lookup failed");
                None
            }
        };

        let mut state = self.state()?;
        if state.request.token == token {
            state.balance = balance;
        }
        Ok(balance)
    }

    fn lookup_balance(&self, token: Address) -> Result<Option<U256>, TransferError> {
        let Some(owner) = self.wallet.connected_account()? else {
            return Ok(None);
        };
        Ok(Some(self.wallet.token_balance(owner, token)?))
    }

    /// Validates the form and submits the transfer as a one-call batch.
    ///
    /// Returns `Ok(None)` without contacting the wallet while another
    /// transfer is in flight.
    pub fn submit(&self) -> Result<Option<SubmissionHandle>, TransferError> {
        let (token, call) = {
            let mut state = self.state()?;
            if state.request.busy {
                debug!("submit ignored, transfer already in flight");
                return Ok(None);
            }
            advance(&mut state, TransferAction::Validate)?;
            let (recipient, amount) = match validate(&state.request, state.balance) {
                Ok(checked) => checked,
                Err(e) => {
                    advance(&mut state, TransferAction::Reject)?;
                    drop(state);
                    warn!(reason = %e, "transfer rejected");
                    self.emit(Notification::error(e.to_string()));
                    return Err(e.into());
                }
            };
            advance(&mut state, TransferAction::Encode)?;
            let token = state.request.token;
            let call = transfer_call(&token, recipient, amount);
            advance(&mut state, TransferAction::Submit)?;
            (token, call)
        };

        let batch = CallBatch {
            calls: vec![call],
            capabilities: CallCapabilities {
                paymaster_service: self
                    .environment
                    .paymaster_url()
                    .filter(|url| !url.trim().is_empty())
                    .map(|url| PaymasterService { url }),
            },
        };
        info!(
            token = token.symbol,
            contract = %token.address,
            sponsored = batch.capabilities.paymaster_service.is_some(),
            "submitting transfer batch"
        );

        match self.wallet.send_calls(&batch) {
            Ok(handle) => {
                let now = self.clock.now_ms().ok();
                let mut state = self.state()?;
                advance(&mut state, TransferAction::Accepted)?;
                state.handle = Some(handle.clone());
                state.submitted_at_ms = now;
                info!(handle = %handle, "transfer batch accepted");
                Ok(Some(handle))
            }
            Err(e) => {
                {
                    let mut state = self.state()?;
                    advance(&mut state, TransferAction::SubmitFailed)?;
                }
                warn!(error = %e, "transfer batch submission failed");
                let err = TransferError::Submission(e.to_string());
                self.emit(Notification::error(err.to_string()));
                Err(err)
            }
        }
    }

    /// Reacts to a batch status report for the in-flight transfer.
    ///
    /// Returns the terminal outcome once one is reached, `None` while the
    /// batch is still pending or when nothing is awaiting confirmation.
    /// Reports for any batch other than the in-flight one are ignored.
    pub fn on_calls_status(
        &self,
        handle: &SubmissionHandle,
        status: &CallsStatus,
    ) -> Result<Option<TransferOutcome>, TransferError> {
        let mut state = self.state()?;
        if state.phase != TransferPhase::AwaitingConfirmation {
            return Ok(None);
        }
        if state.handle.as_ref() != Some(handle) {
            debug!(handle = %handle, "ignoring status for a batch that is not in flight");
            return Ok(None);
        }

        match status.status {
            BatchStatus::Pending => Ok(None),
            BatchStatus::Failed => self.finish_failed(
                state,
                TransferAction::Fail,
                "wallet reported the call batch as failed".to_owned(),
            ),
            BatchStatus::Confirmed => {
                let Some(receipt) = status.receipts.first() else {
                    debug!("batch confirmed without receipts, waiting");
                    return Ok(None);
                };
                let tx_hash = receipt.transaction_hash;
                if receipt.succeeded == Some(false) {
                    return self.finish_failed(
                        state,
                        TransferAction::Fail,
                        format!("transaction {tx_hash} reverted"),
                    );
                }

                advance(&mut state, TransferAction::Confirm)?;
                advance(&mut state, TransferAction::Reset)?;
                state.request.clear_fields();
                state.handle = None;
                state.submitted_at_ms = None;
                let outcome = TransferOutcome::Confirmed(tx_hash);
                state.last_outcome = Some(outcome.clone());
                drop(state);

                info!(tx_hash = %tx_hash, "transfer confirmed");
                self.emit(Notification::success(
                    tx_hash,
                    &self.settings.explorer_base_url,
                ));
                Ok(Some(outcome))
            }
        }
    }

    /// Looks up the status of the in-flight batch once.
    pub fn poll_status(&self) -> Result<Option<TransferOutcome>, TransferError> {
        let Some(handle) = self.state()?.handle.clone() else {
            return Ok(None);
        };
        let status = self.wallet.calls_status(&handle)?;
        debug!(handle = %handle, status = ?status.status, "polled batch status");
        self.on_calls_status(&handle, &status)
    }

    /// Polls until the in-flight batch reaches a terminal status or the
    /// confirmation timeout elapses.
    ///
    /// Status lookup failures are logged and retried on the next tick.
    pub fn await_outcome(&self) -> Result<TransferOutcome, TransferError> {
        let started_at_ms = {
            let state = self.state()?;
            if state.handle.is_none() {
                return Err(TransferError::State(
                    "no transfer awaiting confirmation".to_owned(),
                ));
            }
            state.submitted_at_ms
        };
        let started_at_ms = match started_at_ms {
            Some(ms) => ms,
            None => self.clock.now_ms()?,
        };

        loop {
            match self.poll_status() {
                Ok(Some(outcome)) => return Ok(outcome),
                Ok(None) => {}
                Err(TransferError::Port(e)) => {
                    warn!(error = %e, "batch status lookup failed, retrying");
                }
                Err(e) => return Err(e),
            }

            if let Some(timeout_ms) = self.settings.confirmation_timeout_ms {
                let elapsed = self.clock.now_ms()?.saturating_sub(started_at_ms);
                if elapsed >= timeout_ms {
                    let state = self.state()?;
                    if state.phase != TransferPhase::AwaitingConfirmation {
                        return state.last_outcome.clone().ok_or_else(|| {
                            TransferError::State("transfer finished without outcome".to_owned())
                        });
                    }
                    let outcome = self.finish_failed(
                        state,
                        TransferAction::TimedOut,
                        format!("confirmation timed out after {timeout_ms} ms"),
                    )?;
                    return outcome.ok_or_else(|| {
                        TransferError::State("timeout produced no outcome".to_owned())
                    });
                }
            }

            self.clock.sleep_ms(self.settings.poll_interval_ms)?;
        }
    }

    pub fn snapshot(&self) -> Result<TransferRequest, TransferError> {
        Ok(self.state()?.request.clone())
    }

    pub fn phase(&self) -> Result<TransferPhase, TransferError> {
        Ok(self.state()?.phase)
    }

    pub fn balance(&self) -> Result<Option<U256>, TransferError> {
        Ok(self.state()?.balance)
    }

    pub fn current_handle(&self) -> Result<Option<SubmissionHandle>, TransferError> {
        Ok(self.state()?.handle.clone())
    }

    pub fn last_outcome(&self) -> Result<Option<TransferOutcome>, TransferError> {
        Ok(self.state()?.last_outcome.clone())
    }

    fn finish_failed(
        &self,
        mut state: MutexGuard<'_, ControllerState>,
        action: TransferAction,
        reason: String,
    ) -> Result<Option<TransferOutcome>, TransferError> {
        advance(&mut state, action)?;
        advance(&mut state, TransferAction::Reset)?;
        state.handle = None;
        state.submitted_at_ms = None;
        let outcome = TransferOutcome::Failed(reason.clone());
        state.last_outcome = Some(outcome.clone());
        drop(state);

        warn!(reason = %reason, "transfer failed");
        self.emit(Notification::error(format!("Transfer failed: {reason}")));
        Ok(Some(outcome))
    }

    fn emit(&self, notification: Notification) {
        if let Err(e) = self.notifier.notify(notification) {
            warn!(error = %e, "notification dropped");
        }
    }

    fn state(&self) -> Result<MutexGuard<'_, ControllerState>, TransferError> {
        self.state
            .lock()
            .map_err(|e| TransferError::State(format!("controller lock poisoned: {e}")))
    }
}

fn advance(state: &mut ControllerState, action: TransferAction) -> Result<(), TransferError> {
    let (to, transition) = transfer_transition(state.phase, action)?;
    debug!(from = ?transition.from, to = ?transition.to, action = ?transition.action, "transfer transition");
    state.phase = to;
    state.request.busy = to.is_busy();
    Ok(())
}

/// Precondition checks, in order; the first failure wins.
fn validate(
    request: &TransferRequest,
    balance: Option<U256>,
) -> Result<(Address, U256), ValidationError> {
    if request.recipient.trim().is_empty() || request.amount.trim().is_empty() {
        return Err(ValidationError::MissingFields);
    }
    let amount = parse_amount(&request.amount, request.token.decimals)?;
    if let Some(available) = balance {
        if amount > available {
            return Err(ValidationError::InsufficientBalance {
                requested: amount,
                available,
            });
        }
    }
    let recipient = parse_recipient(&request.recipient)?;
    Ok((recipient, amount))
}
