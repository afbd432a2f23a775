use alloy::primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampMs(pub u64);

/// A fungible token the transfer screen can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    pub symbol: &'static str,
    pub address: Address,
    pub decimals: u8,
}

/// Form state for the transfer screen.
///
/// `recipient` and `amount` hold raw user text; they are only validated when
/// the transfer is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferRequest {
    pub token: Token,
    pub recipient: String,
    pub amount: String,
    pub busy: bool,
}

impl TransferRequest {
    pub fn new(token: Token) -> Self {
        Self {
            token,
            recipient: String::new(),
            amount: String::new(),
            busy: false,
        }
    }

    pub fn clear_fields(&mut self) {
        self.recipient.clear();
        self.amount.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletCall {
    pub to: Address,
    pub data: Bytes,
    pub value: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymasterService {
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallCapabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paymaster_service: Option<PaymasterService>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallBatch {
    pub calls: Vec<WalletCall>,
    pub capabilities: CallCapabilities,
}

/// Opaque batch identifier handed out by the wallet when it accepts a batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionHandle(pub String);

impl std::fmt::Display for SubmissionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchStatus {
    Pending,
    Confirmed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallReceipt {
    pub transaction_hash: B256,
    /// `Some(false)` when the receipt reports a reverted execution.
    pub succeeded: Option<bool>,
    pub block_number: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallsStatus {
    pub status: BatchStatus,
    pub receipts: Vec<CallReceipt>,
}

impl CallsStatus {
    pub fn pending() -> Self {
        Self {
            status: BatchStatus::Pending,
            receipts: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferOutcome {
    Confirmed(B256),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Notification {
    Success {
        tx_hash: B256,
        short_hash: String,
        explorer_url: String,
    },
    Error {
        message: String,
    },
}

impl Notification {
    pub fn success(tx_hash: B256, explorer_base_url: &str) -> Self {
        let full = tx_hash.to_string();
        let short_hash = format!("{}...{}", &full[..6], &full[full.len() - 4..]);
        Self::Success {
            tx_hash,
            short_hash,
            explorer_url: format!("{}/tx/{}", explorer_base_url.trim_end_matches('/'), full),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Plain-text rendering used for logs and text-only surfaces.
    pub fn text(&self) -> String {
        match self {
            Self::Success { short_hash, .. } => format!("Transfer successful! View: {short_hash}"),
            Self::Error { message } => message.clone(),
        }
    }
}
