use token_transfer_core::TransferSettings;

pub const PAYMASTER_URL_ENV: &str = "BASE_PAYMASTER_URL";
pub const WALLET_RPC_URL_ENV: &str = "TOKEN_TRANSFER_WALLET_RPC_URL";
pub const CHAIN_ID_ENV: &str = "TOKEN_TRANSFER_CHAIN_ID";
pub const EXPLORER_URL_ENV: &str = "TOKEN_TRANSFER_EXPLORER_URL";
pub const POLL_INTERVAL_ENV: &str = "TOKEN_TRANSFER_POLL_INTERVAL_MS";
pub const CONFIRMATION_TIMEOUT_ENV: &str = "TOKEN_TRANSFER_CONFIRMATION_TIMEOUT_MS";
pub const PROFILE_ENV: &str = "TOKEN_TRANSFER_PROFILE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeProfile {
    Development,
    Production,
}

#[derive(Debug, Clone)]
pub struct TransferAdapterConfig {
    pub runtime_profile: RuntimeProfile,
    pub paymaster_url: Option<String>,
    /// JSON-RPC endpoint exposing the wallet's EIP-5792 methods. Without it
    /// the wallet adapter runs in deterministic in-memory mode.
    pub wallet_rpc_url: Option<String>,
    pub chain_id: u64,
    pub explorer_base_url: String,
    pub rpc_timeout_ms: u64,
    pub poll_interval_ms: u64,
    /// `None` disables the confirmation timeout.
    pub confirmation_timeout_ms: Option<u64>,
    pub notification_ttl_ms: u64,
    pub deterministic_confirm_after_polls: u32,
}

impl Default for TransferAdapterConfig {
    fn default() -> Self {
        Self {
            runtime_profile: RuntimeProfile::Development,
            paymaster_url: None,
            wallet_rpc_url: None,
            chain_id: 8453,
            explorer_base_url: "https://basescan.org".to_owned(),
            rpc_timeout_ms: 15_000,
            poll_interval_ms: 1_000,
            confirmation_timeout_ms: Some(5 * 60 * 1000),
            notification_ttl_ms: 5_000,
            deterministic_confirm_after_polls: 2,
        }
    }
}

impl TransferAdapterConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Some(profile) = env_string(PROFILE_ENV) {
            if profile.eq_ignore_ascii_case("production") {
                cfg.runtime_profile = RuntimeProfile::Production;
            }
        }
        cfg.paymaster_url = env_string(PAYMASTER_URL_ENV);
        cfg.wallet_rpc_url = env_string(WALLET_RPC_URL_ENV);
        if let Some(chain_id) = env_u64(CHAIN_ID_ENV) {
            cfg.chain_id = chain_id;
        }
        if let Some(url) = env_string(EXPLORER_URL_ENV) {
            cfg.explorer_base_url = url;
        }
        if let Some(ms) = env_u64(POLL_INTERVAL_ENV) {
            cfg.poll_interval_ms = ms.max(1);
        }
        if let Some(ms) = env_u64(CONFIRMATION_TIMEOUT_ENV) {
            cfg.confirmation_timeout_ms = (ms > 0).then_some(ms);
        }
        cfg
    }

    pub fn strict_runtime_required(&self) -> bool {
        self.runtime_profile == RuntimeProfile::Production
    }

    pub fn transfer_settings(&self) -> TransferSettings {
        TransferSettings {
            explorer_base_url: self.explorer_base_url.clone(),
            poll_interval_ms: self.poll_interval_ms,
            confirmation_timeout_ms: self.confirmation_timeout_ms,
        }
    }
}

pub(crate) fn env_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn env_u64(name: &str) -> Option<u64> {
    let raw = env_string(name)?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(var = name, value = %raw, error = %e, "ignoring malformed numeric env var");
            None
        }
    }
}
