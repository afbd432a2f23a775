use token_transfer_core::EnvironmentPort;

use crate::config::{env_string, PAYMASTER_URL_ENV};

/// Reads the paymaster URL from the process environment on every call,
/// falling back to the value captured in the adapter config.
#[derive(Debug, Clone, Default)]
pub struct EnvConfigAdapter {
    fallback_paymaster_url: Option<String>,
}

impl EnvConfigAdapter {
    pub fn new(fallback_paymaster_url: Option<String>) -> Self {
        Self {
            fallback_paymaster_url,
        }
    }
}

impl EnvironmentPort for EnvConfigAdapter {
    fn paymaster_url(&self) -> Option<String> {
        env_string(PAYMASTER_URL_ENV).or_else(|| self.fallback_paymaster_url.clone())
    }
}
