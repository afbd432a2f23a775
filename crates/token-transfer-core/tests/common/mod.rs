#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use alloy::primitives::{Address, B256, U256};

use token_transfer_core::{
    BatchStatus, CallBatch, CallReceipt, CallsStatus, ClockPort, EnvironmentPort, Notification,
    NotifierPort, PortError, SubmissionHandle, TransferController, TransferSettings, WalletPort,
};

#[derive(Debug, Default)]
pub struct FakeWallet {
    pub account: Option<Address>,
    pub balance: Mutex<Option<U256>>,
    pub submissions: Mutex<Vec<CallBatch>>,
    pub submit_error: Mutex<Option<String>>,
    pub statuses: Mutex<VecDeque<Result<CallsStatus, String>>>,
    pub status_lookups: AtomicU64,
}

impl FakeWallet {
    pub fn submission_count(&self) -> usize {
        self.submissions.lock().expect("submissions lock").len()
    }

    pub fn last_submission(&self) -> CallBatch {
        self.submissions
            .lock()
            .expect("submissions lock")
            .last()
            .cloned()
            .expect("at least one submission")
    }

    pub fn push_status(&self, status: CallsStatus) {
        self.statuses
            .lock()
            .expect("statuses lock")
            .push_back(Ok(status));
    }

    pub fn push_status_error(&self, message: &str) {
        self.statuses
            .lock()
            .expect("statuses lock")
            .push_back(Err(message.to_owned()));
    }
}

impl WalletPort for FakeWallet {
    fn connected_account(&self) -> Result<Option<Address>, PortError> {
        Ok(self.account)
    }

    fn token_balance(&self, _owner: Address, _token: Address) -> Result<U256, PortError> {
        self.balance
            .lock()
            .expect("balance lock")
            .ok_or_else(|| PortError::Transport("balance unavailable".to_owned()))
    }

    fn send_calls(&self, batch: &CallBatch) -> Result<SubmissionHandle, PortError> {
        if let Some(message) = self.submit_error.lock().expect("error lock").take() {
            return Err(PortError::Transport(message));
        }
        let mut g = self.submissions.lock().expect("submissions lock");
        g.push(batch.clone());
        Ok(SubmissionHandle(format!("batch-{}", g.len())))
    }

    fn calls_status(&self, _handle: &SubmissionHandle) -> Result<CallsStatus, PortError> {
        self.status_lookups.fetch_add(1, Ordering::SeqCst);
        match self.statuses.lock().expect("statuses lock").pop_front() {
            Some(Ok(status)) => Ok(status),
            Some(Err(message)) => Err(PortError::Transport(message)),
            None => Ok(CallsStatus::pending()),
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().expect("notifier lock").clone()
    }

    pub fn last(&self) -> Notification {
        self.all().last().cloned().expect("a notification")
    }
}

impl NotifierPort for RecordingNotifier {
    fn notify(&self, notification: Notification) -> Result<(), PortError> {
        self.seen.lock().expect("notifier lock").push(notification);
        Ok(())
    }
}

/// Clock that only moves when the code under test sleeps.
#[derive(Debug, Default)]
pub struct TestClock {
    now: AtomicU64,
}

impl TestClock {
    pub fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

impl ClockPort for TestClock {
    fn now_ms(&self) -> Result<u64, PortError> {
        Ok(self.now.load(Ordering::SeqCst))
    }

    fn sleep_ms(&self, ms: u64) -> Result<(), PortError> {
        self.now.fetch_add(ms, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FixedEnvironment {
    pub paymaster_url: Option<String>,
}

impl EnvironmentPort for FixedEnvironment {
    fn paymaster_url(&self) -> Option<String> {
        self.paymaster_url.clone()
    }
}

pub type TestController =
    TransferController<FakeWallet, RecordingNotifier, TestClock, FixedEnvironment>;

pub fn owner_address() -> Address {
    "0x1000000000000000000000000000000000000001"
        .parse()
        .expect("valid owner address")
}

pub fn recipient_checksummed() -> &'static str {
    "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
}

pub fn new_controller() -> TestController {
    controller_with(FakeWallet::default(), TransferSettings::default())
}

pub fn controller_with_balance(balance: U256) -> TestController {
    let wallet = FakeWallet {
        account: Some(owner_address()),
        balance: Mutex::new(Some(balance)),
        ..FakeWallet::default()
    };
    controller_with(wallet, TransferSettings::default())
}

pub fn controller_with(wallet: FakeWallet, settings: TransferSettings) -> TestController {
    TransferController::new(
        wallet,
        RecordingNotifier::default(),
        TestClock::default(),
        FixedEnvironment {
            paymaster_url: Some("https://paymaster.example/v1".to_owned()),
        },
        settings,
    )
}

pub fn tx_hash(byte: u8) -> B256 {
    B256::repeat_byte(byte)
}

pub fn confirmed(hash: B256) -> CallsStatus {
    CallsStatus {
        status: BatchStatus::Confirmed,
        receipts: vec![CallReceipt {
            transaction_hash: hash,
            succeeded: Some(true),
            block_number: Some(1),
        }],
    }
}

pub fn fill_form(ctrl: &TestController, recipient: &str, amount: &str) {
    ctrl.set_recipient(recipient).expect("set recipient");
    ctrl.set_amount(amount).expect("set amount");
}
