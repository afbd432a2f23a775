mod common;

use alloy::primitives::U256;
use token_transfer_adapters::{Eip5792Adapter, RuntimeProfile, TransferAdapterConfig};
use token_transfer_core::{
    find_token, BatchStatus, CallsStatus, ClockPort, Notification, PortError, SubmissionHandle,
    TransferError, TransferOutcome, WalletPort,
};

use common::{deterministic_config, new_controller, recipient};

#[test]
fn deterministic_wallet_confirms_after_configured_polls() {
    let (ctrl, toasts, clock) = new_controller(deterministic_config());
    ctrl.set_recipient(recipient()).expect("recipient");
    ctrl.set_amount("1.25").expect("amount");

    let handle = ctrl.submit().expect("submit").expect("handle");
    let outcome = ctrl.await_outcome().expect("outcome");
    let TransferOutcome::Confirmed(hash) = outcome else {
        panic!("expected confirmation, got {outcome:?}");
    };
    assert_eq!(hash, alloy::primitives::keccak256(handle.0.as_bytes()));
    assert_eq!(clock.now_ms().expect("now"), 500);

    let batches = ctrl.wallet.submitted_batches().expect("batches");
    assert_eq!(batches.len(), 1);
    assert_eq!(
        batches[0]
            .capabilities
            .paymaster_service
            .as_ref()
            .map(|p| p.url.as_str()),
        Some("https://paymaster.example/base")
    );

    let active = toasts.active().expect("toasts");
    assert_eq!(active.len(), 1);
    match &active[0].notification {
        Notification::Success { short_hash, .. } => {
            let full = hash.to_string();
            assert!(short_hash.ends_with(&full[full.len() - 4..]));
        }
        other => panic!("expected success toast, got {other:?}"),
    }

    let snapshot = ctrl.snapshot().expect("snapshot");
    assert!(snapshot.recipient.is_empty() && snapshot.amount.is_empty() && !snapshot.busy);
}

#[test]
fn default_config_wallet_is_funded_for_local_runs() {
    let (ctrl, toasts, _clock) = new_controller(TransferAdapterConfig::default());
    assert_eq!(
        ctrl.refresh_balance().expect("refresh"),
        Some(U256::from(1_000_000_000u64))
    );

    ctrl.set_recipient(recipient()).expect("recipient");
    ctrl.set_amount("1000.000001").expect("amount");
    ctrl.submit().expect_err("above funding");
    assert_eq!(
        toasts.active().expect("toasts")[0].notification,
        Notification::error("Insufficient balance")
    );

    ctrl.set_amount("1").expect("amount");
    assert!(ctrl.submit().expect("submit").is_some());
    let outcome = ctrl.await_outcome().expect("outcome");
    assert!(matches!(outcome, TransferOutcome::Confirmed(_)));

    ctrl.select_token("USDT").expect("usdt");
    assert_eq!(
        ctrl.refresh_balance().expect("refresh usdt"),
        Some(U256::from(1_000_000_000u64))
    );
}

#[test]
fn toasts_expire_and_can_be_dismissed() {
    let (ctrl, toasts, clock) = new_controller(deterministic_config());
    ctrl.submit().expect_err("empty form");
    ctrl.set_recipient("0x123").expect("recipient");
    ctrl.set_amount("1").expect("amount");
    ctrl.submit().expect_err("bad recipient");

    let active = toasts.active().expect("toasts");
    assert_eq!(active.len(), 2);
    assert!(active.iter().all(|t| t.notification.is_error()));
    assert_eq!(toasts.next_expiry_in_ms().expect("expiry"), Some(5_000));

    assert!(toasts.dismiss(active[0].id).expect("dismiss"));
    assert!(!toasts.dismiss(active[0].id).expect("dismiss again"));
    assert_eq!(toasts.active().expect("toasts").len(), 1);

    clock.advance(5_000);
    assert!(toasts.active().expect("toasts").is_empty());
}

#[test]
fn deterministic_balance_feeds_insufficient_balance_check() {
    let (ctrl, toasts, _clock) = new_controller(deterministic_config());
    let usdc = find_token("USDC").expect("usdc");
    ctrl.wallet
        .debug_set_balance(usdc.address, U256::from(2_000_000u64))
        .expect("balance");
    assert_eq!(
        ctrl.refresh_balance().expect("refresh"),
        Some(U256::from(2_000_000u64))
    );

    ctrl.set_recipient(recipient()).expect("recipient");
    ctrl.set_amount("2.000001").expect("amount");
    ctrl.submit().expect_err("over balance");
    assert_eq!(
        toasts.active().expect("toasts")[0].notification,
        Notification::error("Insufficient balance")
    );
    assert!(ctrl.wallet.submitted_batches().expect("batches").is_empty());

    ctrl.wallet.debug_set_account(None).expect("disconnect");
    assert_eq!(ctrl.refresh_balance().expect("refresh"), None);
}

#[test]
fn rejected_submission_surfaces_wallet_message() {
    let (ctrl, toasts, _clock) = new_controller(deterministic_config());
    ctrl.wallet
        .debug_fail_next_submission("User rejected the request.")
        .expect("script failure");
    ctrl.set_recipient(recipient()).expect("recipient");
    ctrl.set_amount("1").expect("amount");

    let err = ctrl.submit().expect_err("rejected");
    assert!(matches!(err, TransferError::Submission(_)));
    let text = toasts.active().expect("toasts")[0].notification.text();
    assert!(text.starts_with("Transfer failed: "));
    assert!(text.contains("User rejected the request."));
    assert!(!ctrl.snapshot().expect("snapshot").busy);

    assert!(ctrl.submit().expect("retry").is_some());
}

#[test]
fn scripted_failed_batch_is_reported() {
    let (ctrl, toasts, _clock) = new_controller(deterministic_config());
    ctrl.set_recipient(recipient()).expect("recipient");
    ctrl.set_amount("1").expect("amount");
    let handle = ctrl.submit().expect("submit").expect("handle");

    ctrl.wallet
        .debug_set_status(
            &handle,
            CallsStatus {
                status: BatchStatus::Failed,
                receipts: vec![],
            },
        )
        .expect("script status");
    let outcome = ctrl.await_outcome().expect("outcome");
    assert!(matches!(outcome, TransferOutcome::Failed(_)));
    assert!(toasts.active().expect("toasts")[0].notification.is_error());
    assert_eq!(ctrl.snapshot().expect("snapshot").amount, "1");
}

#[test]
fn unknown_handle_is_not_found() {
    let wallet = Eip5792Adapter::with_config(TransferAdapterConfig::default());
    let err = wallet
        .calls_status(&SubmissionHandle("nope".to_owned()))
        .expect_err("unknown handle");
    assert!(matches!(err, PortError::NotFound(_)));
}

#[test]
fn production_profile_requires_wallet_rpc() {
    let cfg = TransferAdapterConfig {
        runtime_profile: RuntimeProfile::Production,
        wallet_rpc_url: None,
        ..TransferAdapterConfig::default()
    };
    let wallet = Eip5792Adapter::with_config(cfg);
    let err = wallet.connected_account().expect_err("runtime required");
    assert!(matches!(err, PortError::Policy(_)));
}
