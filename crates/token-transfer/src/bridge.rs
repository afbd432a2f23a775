//! Bridge between the egui shell and the transfer workspace crates.
//! This must remain the only shell-facing boundary for transfer operations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::U256;
use eframe::egui;
use tracing::{info, warn};

use token_transfer_adapters::{
    EnvConfigAdapter, Eip5792Adapter, SystemClockAdapter, Toast, ToastNotifier,
    TransferAdapterConfig,
};
use token_transfer_core::{
    Token, TransferController, TransferError, TransferOutcome, TransferRequest,
};

type Controller =
    TransferController<Eip5792Adapter, ToastNotifier, SystemClockAdapter, EnvConfigAdapter>;

#[derive(Clone)]
pub struct TransferBridge {
    controller: Arc<Controller>,
    balance_loading: Arc<AtomicBool>,
    /// Set by every refresh request; the worker keeps going until it is clear.
    balance_stale: Arc<AtomicBool>,
}

impl TransferBridge {
    pub fn from_env() -> Self {
        Self::with_config(TransferAdapterConfig::from_env())
    }

    pub fn with_config(config: TransferAdapterConfig) -> Self {
        let wallet = Eip5792Adapter::with_config(config.clone());
        info!(
            proxy = wallet.is_proxy(),
            chain_id = config.chain_id,
            sponsored = config.paymaster_url.is_some(),
            "transfer runtime configured"
        );
        Self {
            controller: Arc::new(TransferController::new(
                wallet,
                ToastNotifier::new(config.notification_ttl_ms),
                SystemClockAdapter,
                EnvConfigAdapter::new(config.paymaster_url.clone()),
                config.transfer_settings(),
            )),
            balance_loading: Arc::new(AtomicBool::new(false)),
            balance_stale: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn snapshot(&self) -> Result<TransferRequest, TransferError> {
        self.controller.snapshot()
    }

    pub fn balance(&self) -> Option<U256> {
        self.controller.balance().ok().flatten()
    }

    /// True while a lookup is running or queued.
    pub fn balance_loading(&self) -> bool {
        self.balance_loading.load(Ordering::SeqCst) || self.balance_stale.load(Ordering::SeqCst)
    }

    pub fn select_token(&self, symbol: &str, ctx: &egui::Context) -> Result<Token, TransferError> {
        let token = self.controller.select_token(symbol)?;
        self.refresh_balance(ctx);
        Ok(token)
    }

    pub fn set_recipient(&self, raw: &str) -> Result<(), TransferError> {
        self.controller.set_recipient(raw)
    }

    pub fn set_amount(&self, raw: &str) -> Result<(), TransferError> {
        self.controller.set_amount(raw)
    }

    /// Re-reads the balance on a worker thread.
    ///
    /// A request made while a lookup is running is picked up by that worker
    /// once the current lookup returns.
    pub fn refresh_balance(&self, ctx: &egui::Context) {
        self.balance_stale.store(true, Ordering::SeqCst);
        if self.balance_loading.swap(true, Ordering::SeqCst) {
            return;
        }
        let controller = Arc::clone(&self.controller);
        let loading = Arc::clone(&self.balance_loading);
        let stale = Arc::clone(&self.balance_stale);
        let ctx = ctx.clone();
        std::thread::spawn(move || loop {
            while stale.swap(false, Ordering::SeqCst) {
                if let Err(e) = controller.refresh_balance() {
                    warn!(error = %e, "balance refresh failed");
                }
            }
            loading.store(false, Ordering::SeqCst);
            ctx.request_repaint();
            if !stale.load(Ordering::SeqCst) || loading.swap(true, Ordering::SeqCst) {
                break;
            }
        });
    }

    /// Submits the current form and waits for the wallet's verdict on a
    /// worker thread. Rejections and failures reach the user as toasts.
    pub fn start_transfer(&self, ctx: &egui::Context) {
        let controller = Arc::clone(&self.controller);
        let bridge = self.clone();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let outcome = match controller.submit() {
                Ok(Some(_)) => {
                    ctx.request_repaint();
                    controller.await_outcome()
                }
                Ok(None) => return,
                Err(e) => Err(e),
            };
            match outcome {
                Ok(TransferOutcome::Confirmed(hash)) => {
                    info!(tx_hash = %hash, "transfer finished");
                    bridge.refresh_balance(&ctx);
                }
                Ok(TransferOutcome::Failed(reason)) => {
                    warn!(reason = %reason, "transfer finished without confirmation");
                }
                Err(e) => warn!(error = %e, "transfer aborted"),
            }
            ctx.request_repaint();
        });
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.controller.notifier.active().unwrap_or_default()
    }

    pub fn dismiss_toast(&self, id: u64) {
        if let Err(e) = self.controller.notifier.dismiss(id) {
            warn!(error = %e, "toast dismiss failed");
        }
    }

    pub fn next_toast_expiry(&self) -> Option<Duration> {
        self.controller
            .notifier
            .next_expiry_in_ms()
            .ok()
            .flatten()
            .map(Duration::from_millis)
    }
}
