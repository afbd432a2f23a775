#![allow(dead_code)]

use std::io::Read;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::{json, Value};
use tiny_http::{Response, Server, StatusCode};

use token_transfer_adapters::{
    EnvConfigAdapter, Eip5792Adapter, ToastNotifier, TransferAdapterConfig,
};
use token_transfer_core::{ClockPort, PortError, TransferController};

/// Shared manual clock; clones observe the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

impl ClockPort for ManualClock {
    fn now_ms(&self) -> Result<u64, PortError> {
        Ok(self.now.load(Ordering::SeqCst))
    }

    fn sleep_ms(&self, ms: u64) -> Result<(), PortError> {
        self.advance(ms);
        Ok(())
    }
}

pub type TestController = TransferController<
    Eip5792Adapter,
    ToastNotifier<ManualClock>,
    ManualClock,
    EnvConfigAdapter,
>;

pub fn deterministic_config() -> TransferAdapterConfig {
    TransferAdapterConfig {
        paymaster_url: Some("https://paymaster.example/base".to_owned()),
        poll_interval_ms: 500,
        notification_ttl_ms: 5_000,
        deterministic_confirm_after_polls: 2,
        ..TransferAdapterConfig::default()
    }
}

pub fn new_controller(
    config: TransferAdapterConfig,
) -> (TestController, ToastNotifier<ManualClock>, ManualClock) {
    let clock = ManualClock::default();
    let toasts = ToastNotifier::with_clock(clock.clone(), config.notification_ttl_ms);
    let controller = TransferController::new(
        Eip5792Adapter::with_config(config.clone()),
        toasts.clone(),
        clock.clone(),
        EnvConfigAdapter::new(config.paymaster_url.clone()),
        config.transfer_settings(),
    );
    (controller, toasts, clock)
}

pub fn recipient() -> &'static str {
    "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
}

pub const TX_HASH: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1234";
pub const ACCOUNT: &str = "0x1000000000000000000000000000000000000001";

/// JSON-RPC wallet stub. Records every request body; reports the batch as
/// pending on the first status lookup and confirmed afterwards.
pub fn spawn_wallet_rpc(
    requests: Arc<Mutex<Vec<Value>>>,
    confirmed_status: Value,
) -> (String, thread::JoinHandle<()>) {
    let server = Server::http("127.0.0.1:0").expect("start server");
    let addr = format!("http://{}", server.server_addr());

    let join = thread::spawn(move || {
        let mut status_lookups = 0u32;
        for _ in 0..32 {
            let mut req = match server.recv() {
                Ok(r) => r,
                Err(_) => break,
            };
            let mut body = String::new();
            if req.as_reader().read_to_string(&mut body).is_err() {
                break;
            }
            let payload: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
            if let Ok(mut g) = requests.lock() {
                g.push(payload.clone());
            }

            let result = match payload.get("method").and_then(Value::as_str) {
                Some("eth_accounts") => json!([ACCOUNT]),
                Some("eth_call") => json!(format!("0x{:064x}", 25_000_000u64)),
                Some("wallet_sendCalls") => json!({ "id": "batch-0001" }),
                Some("wallet_getCallsStatus") => {
                    status_lookups += 1;
                    if status_lookups == 1 {
                        json!({ "status": "PENDING", "receipts": [] })
                    } else {
                        confirmed_status.clone()
                    }
                }
                _ => {
                    let response = Response::from_string(
                        json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32601, "message": "method not found"}})
                            .to_string(),
                    )
                    .with_status_code(StatusCode(200));
                    let _ = req.respond(response);
                    continue;
                }
            };

            let response = Response::from_string(
                json!({"jsonrpc": "2.0", "id": 1, "result": result}).to_string(),
            )
            .with_status_code(StatusCode(200));
            let _ = req.respond(response);
        }
    });

    (addr, join)
}
