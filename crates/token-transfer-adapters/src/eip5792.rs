use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use serde_json::Value;
use tracing::debug;

use token_transfer_core::{
    decode_uint, encode_balance_of, BatchStatus, CallBatch, CallReceipt, CallsStatus, PortError,
    SubmissionHandle, WalletPort, TOKENS,
};

use crate::TransferAdapterConfig;

/// Wallet adapter speaking EIP-5792 (`wallet_sendCalls` /
/// `wallet_getCallsStatus`).
///
/// With a configured JSON-RPC endpoint every call is proxied there.
/// Otherwise the adapter keeps an in-memory wallet holding 1 000 of every
/// registry token. It accepts every batch and confirms it after a fixed
/// number of status polls.
#[derive(Debug, Clone)]
pub struct Eip5792Adapter {
    mode: WalletMode,
    chain_id: u64,
    confirm_after_polls: u32,
    state: Arc<Mutex<DeterministicState>>,
}

#[derive(Debug, Clone)]
enum WalletMode {
    Disabled(String),
    Deterministic,
    Proxy(ProxyRuntime),
}

#[derive(Debug, Clone)]
struct ProxyRuntime {
    base_url: String,
    client: reqwest::blocking::Client,
}

#[derive(Debug)]
struct DeterministicState {
    account: Option<Address>,
    balances: HashMap<Address, U256>,
    batches: Vec<(SubmissionHandle, CallBatch)>,
    polls: HashMap<SubmissionHandle, u32>,
    scripted: HashMap<SubmissionHandle, CallsStatus>,
    fail_next_submission: Option<String>,
}

/// Whole tokens the in-memory account holds of every registry token.
const DETERMINISTIC_FUNDING: u64 = 1_000;

impl Default for DeterministicState {
    fn default() -> Self {
        let balances = TOKENS
            .iter()
            .map(|token| {
                let unit = U256::from(10u64).pow(U256::from(token.decimals));
                (token.address, U256::from(DETERMINISTIC_FUNDING) * unit)
            })
            .collect();
        Self {
            account: Some(Address::repeat_byte(0x10)),
            balances,
            batches: Vec::new(),
            polls: HashMap::new(),
            scripted: HashMap::new(),
            fail_next_submission: None,
        }
    }
}

impl Default for Eip5792Adapter {
    fn default() -> Self {
        Self::with_config(TransferAdapterConfig::from_env())
    }
}

impl Eip5792Adapter {
    pub fn with_config(config: TransferAdapterConfig) -> Self {
        let mode = if let Some(ref base_url) = config.wallet_rpc_url {
            let timeout = std::time::Duration::from_millis(config.rpc_timeout_ms);
            match reqwest::blocking::Client::builder().timeout(timeout).build() {
                Ok(client) => WalletMode::Proxy(ProxyRuntime {
                    base_url: base_url.clone(),
                    client,
                }),
                Err(e) => {
                    if config.strict_runtime_required() {
                        WalletMode::Disabled(format!(
                            "failed to initialize wallet RPC client in production profile: {e}"
                        ))
                    } else {
                        WalletMode::Deterministic
                    }
                }
            }
        } else if config.strict_runtime_required() {
            WalletMode::Disabled("wallet RPC URL not configured in production runtime profile".to_owned())
        } else {
            WalletMode::Deterministic
        };

        Self {
            mode,
            chain_id: config.chain_id,
            confirm_after_polls: config.deterministic_confirm_after_polls.max(1),
            state: Arc::new(Mutex::new(DeterministicState::default())),
        }
    }

    pub fn is_proxy(&self) -> bool {
        matches!(self.mode, WalletMode::Proxy(_))
    }

    fn check_mode(&self) -> Result<(), PortError> {
        if let WalletMode::Disabled(reason) = &self.mode {
            return Err(PortError::Policy(reason.clone()));
        }
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, DeterministicState>, PortError> {
        self.state
            .lock()
            .map_err(|e| PortError::Transport(format!("wallet lock poisoned: {e}")))
    }

    pub fn debug_set_account(&self, account: Option<Address>) -> Result<(), PortError> {
        self.lock()?.account = account;
        Ok(())
    }

    pub fn debug_set_balance(&self, token: Address, balance: U256) -> Result<(), PortError> {
        self.lock()?.balances.insert(token, balance);
        Ok(())
    }

    pub fn debug_fail_next_submission(&self, message: impl Into<String>) -> Result<(), PortError> {
        self.lock()?.fail_next_submission = Some(message.into());
        Ok(())
    }

    pub fn debug_set_status(
        &self,
        handle: &SubmissionHandle,
        status: CallsStatus,
    ) -> Result<(), PortError> {
        self.lock()?.scripted.insert(handle.clone(), status);
        Ok(())
    }

    pub fn submitted_batches(&self) -> Result<Vec<CallBatch>, PortError> {
        Ok(self
            .lock()?
            .batches
            .iter()
            .map(|(_, batch)| batch.clone())
            .collect())
    }

    fn proxy_call(&self, method: &str, params: Value) -> Result<Value, PortError> {
        let proxy = match &self.mode {
            WalletMode::Proxy(proxy) => proxy,
            WalletMode::Disabled(reason) => return Err(PortError::Policy(reason.clone())),
            WalletMode::Deterministic => {
                return Err(PortError::NotImplemented("wallet proxy runtime not enabled"))
            }
        };

        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        debug!(method, "wallet rpc request");
        let response = proxy
            .client
            .post(&proxy.base_url)
            .json(&payload)
            .send()
            .map_err(|e| PortError::Transport(format!("wallet rpc request failed: {e}")))?;
        let status = response.status();
        let body: Value = response
            .json()
            .map_err(|e| PortError::Transport(format!("wallet rpc json decode failed: {e}")))?;
        if !status.is_success() {
            return Err(PortError::Transport(format!(
                "wallet rpc status {}: {}",
                status, body
            )));
        }
        if let Some(err) = body.get("error") {
            let message = err
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned)
                .unwrap_or_else(|| err.to_string());
            return Err(PortError::Transport(format!("wallet rpc returned error: {message}")));
        }
        body.get("result")
            .cloned()
            .ok_or_else(|| PortError::Transport("wallet rpc missing result".to_owned()))
    }

    fn deterministic_send(&self, batch: &CallBatch) -> Result<SubmissionHandle, PortError> {
        let mut g = self.lock()?;
        if let Some(message) = g.fail_next_submission.take() {
            return Err(PortError::Transport(message));
        }
        let mut seed = serde_json::to_vec(batch)
            .map_err(|e| PortError::Validation(format!("batch serialization failed: {e}")))?;
        seed.extend_from_slice(&(g.batches.len() as u64).to_be_bytes());
        let handle = SubmissionHandle(keccak256(seed).to_string());
        g.batches.push((handle.clone(), batch.clone()));
        Ok(handle)
    }

    fn deterministic_status(&self, handle: &SubmissionHandle) -> Result<CallsStatus, PortError> {
        let mut g = self.lock()?;
        if let Some(status) = g.scripted.get(handle) {
            return Ok(status.clone());
        }
        if !g.batches.iter().any(|(h, _)| h == handle) {
            return Err(PortError::NotFound(format!("call batch not found: {handle}")));
        }
        let polls = g.polls.entry(handle.clone()).or_insert(0);
        *polls = polls.saturating_add(1);
        if *polls < self.confirm_after_polls {
            return Ok(CallsStatus::pending());
        }
        Ok(CallsStatus {
            status: BatchStatus::Confirmed,
            receipts: vec![CallReceipt {
                transaction_hash: keccak256(handle.0.as_bytes()),
                succeeded: Some(true),
                block_number: Some(u64::from(*polls)),
            }],
        })
    }
}

impl WalletPort for Eip5792Adapter {
    fn connected_account(&self) -> Result<Option<Address>, PortError> {
        self.check_mode()?;

        if self.is_proxy() {
            let result = self.proxy_call("eth_accounts", serde_json::json!([]))?;
            let arr = result
                .as_array()
                .ok_or_else(|| PortError::Transport("eth_accounts: array expected".to_owned()))?;
            return match arr.first() {
                None => Ok(None),
                Some(item) => {
                    let raw = item.as_str().ok_or_else(|| {
                        PortError::Transport("eth_accounts: string expected".to_owned())
                    })?;
                    let parsed: Address = raw.parse().map_err(|e| {
                        PortError::Validation(format!("invalid account address: {e}"))
                    })?;
                    Ok(Some(parsed))
                }
            };
        }

        Ok(self.lock()?.account)
    }

    fn token_balance(&self, owner: Address, token: Address) -> Result<U256, PortError> {
        self.check_mode()?;

        if self.is_proxy() {
            let call = serde_json::json!({
                "to": token.to_string(),
                "data": encode_balance_of(owner).to_string(),
            });
            let result = self.proxy_call("eth_call", serde_json::json!([call, "latest"]))?;
            let raw = result
                .as_str()
                .ok_or_else(|| PortError::Transport("eth_call must return hex data".to_owned()))?;
            let data: Bytes = raw
                .parse()
                .map_err(|e| PortError::Validation(format!("invalid eth_call result: {e}")))?;
            return decode_uint(&data);
        }

        Ok(self
            .lock()?
            .balances
            .get(&token)
            .copied()
            .unwrap_or(U256::ZERO))
    }

    fn send_calls(&self, batch: &CallBatch) -> Result<SubmissionHandle, PortError> {
        self.check_mode()?;

        if self.is_proxy() {
            let from = self.connected_account()?;
            let calls: Vec<Value> = batch
                .calls
                .iter()
                .map(|c| {
                    serde_json::json!({
                        "to": c.to.to_string(),
                        "data": c.data.to_string(),
                        "value": format!("0x{:x}", c.value),
                    })
                })
                .collect();
            let capabilities = serde_json::to_value(&batch.capabilities).map_err(|e| {
                PortError::Validation(format!("capabilities serialization failed: {e}"))
            })?;
            let mut request = serde_json::json!({
                "version": "1.0",
                "chainId": format!("0x{:x}", self.chain_id),
                "calls": calls,
                "capabilities": capabilities,
            });
            if let Some(from) = from {
                request["from"] = Value::String(from.to_string());
            }
            let result = self.proxy_call("wallet_sendCalls", serde_json::json!([request]))?;
            return parse_batch_id(&result);
        }

        self.deterministic_send(batch)
    }

    fn calls_status(&self, handle: &SubmissionHandle) -> Result<CallsStatus, PortError> {
        self.check_mode()?;

        if self.is_proxy() {
            let result =
                self.proxy_call("wallet_getCallsStatus", serde_json::json!([handle.0]))?;
            return parse_calls_status(&result);
        }

        self.deterministic_status(handle)
    }
}

/// `wallet_sendCalls` returns a bare id in early drafts and `{ id }` since
/// EIP-5792 v2.
fn parse_batch_id(result: &Value) -> Result<SubmissionHandle, PortError> {
    let id = match result {
        Value::String(id) => Some(id.as_str()),
        Value::Object(obj) => obj.get("id").and_then(Value::as_str),
        _ => None,
    };
    id.filter(|id| !id.is_empty())
        .map(|id| SubmissionHandle(id.to_owned()))
        .ok_or_else(|| PortError::Transport("wallet_sendCalls: missing batch id".to_owned()))
}

fn parse_calls_status(result: &Value) -> Result<CallsStatus, PortError> {
    let status = match result.get("status") {
        Some(Value::String(s)) => match s.to_ascii_uppercase().as_str() {
            "PENDING" => BatchStatus::Pending,
            "CONFIRMED" => BatchStatus::Confirmed,
            "FAILED" | "REVERTED" | "DROPPED" => BatchStatus::Failed,
            other => {
                return Err(PortError::Validation(format!(
                    "unknown calls status: {other}"
                )))
            }
        },
        Some(Value::Number(n)) => match n.as_u64() {
            Some(100..=199) => BatchStatus::Pending,
            Some(200..=299) => BatchStatus::Confirmed,
            Some(400..=699) => BatchStatus::Failed,
            _ => {
                return Err(PortError::Validation(format!(
                    "unknown calls status code: {n}"
                )))
            }
        },
        _ => {
            return Err(PortError::Transport(
                "wallet_getCallsStatus: status missing".to_owned(),
            ))
        }
    };

    let receipts = match result.get("receipts") {
        Some(Value::Array(items)) => items
            .iter()
            .map(parse_receipt)
            .collect::<Result<Vec<_>, _>>()?,
        _ => Vec::new(),
    };

    Ok(CallsStatus { status, receipts })
}

fn parse_receipt(value: &Value) -> Result<CallReceipt, PortError> {
    let hash = value
        .get("transactionHash")
        .and_then(Value::as_str)
        .ok_or_else(|| PortError::Transport("receipt missing transactionHash".to_owned()))?;
    let transaction_hash: B256 = hash
        .parse()
        .map_err(|e| PortError::Validation(format!("invalid transaction hash: {e}")))?;
    let succeeded = match value.get("status").and_then(Value::as_str) {
        Some("0x1") | Some("success") => Some(true),
        Some("0x0") | Some("reverted") => Some(false),
        _ => None,
    };
    let block_number = value
        .get("blockNumber")
        .and_then(Value::as_str)
        .and_then(|raw| u64::from_str_radix(raw.trim_start_matches("0x"), 16).ok());

    Ok(CallReceipt {
        transaction_hash,
        succeeded,
        block_number,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_id_accepts_bare_string_and_object() {
        assert_eq!(
            parse_batch_id(&serde_json::json!("0xabc")).expect("bare"),
            SubmissionHandle("0xabc".to_owned())
        );
        assert_eq!(
            parse_batch_id(&serde_json::json!({ "id": "0xdef" })).expect("object"),
            SubmissionHandle("0xdef".to_owned())
        );
        assert!(parse_batch_id(&serde_json::json!({ "id": "" })).is_err());
    }

    #[test]
    fn calls_status_maps_strings_and_codes() {
        let cases = [
            (serde_json::json!("PENDING"), BatchStatus::Pending),
            (serde_json::json!("confirmed"), BatchStatus::Confirmed),
            (serde_json::json!("REVERTED"), BatchStatus::Failed),
            (serde_json::json!(100), BatchStatus::Pending),
            (serde_json::json!(200), BatchStatus::Confirmed),
            (serde_json::json!(500), BatchStatus::Failed),
        ];
        for (raw, expected) in cases {
            let parsed = parse_calls_status(&serde_json::json!({ "status": raw })).expect("status");
            assert_eq!(parsed.status, expected);
            assert!(parsed.receipts.is_empty());
        }
        assert!(parse_calls_status(&serde_json::json!({ "status": 42 })).is_err());
        assert!(parse_calls_status(&serde_json::json!({})).is_err());
    }

    #[test]
    fn receipt_reads_status_and_block_number() {
        let hash = format!("0x{}", "ab".repeat(32));
        let receipt = parse_receipt(&serde_json::json!({
            "transactionHash": hash,
            "status": "0x0",
            "blockNumber": "0x1f"
        }))
        .expect("receipt");
        assert_eq!(receipt.succeeded, Some(false));
        assert_eq!(receipt.block_number, Some(31));
        assert!(parse_receipt(&serde_json::json!({ "status": "0x1" })).is_err());
    }
}
