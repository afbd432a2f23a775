use std::str::FromStr;

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::domain::{Token, WalletCall};
use crate::error::ValidationError;
use crate::ports::PortError;

sol! {
    /// The slice of the ERC-20 interface the transfer screen needs.
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
    }
}

/// Strict address syntax: `0x` followed by 40 hex digits.
///
/// Single-case input is accepted as is. Mixed-case input must carry a valid
/// EIP-55 checksum. The returned address displays in checksummed form.
pub fn parse_recipient(raw: &str) -> Result<Address, ValidationError> {
    let raw = raw.trim();
    let hex = raw
        .strip_prefix("0x")
        .ok_or(ValidationError::InvalidRecipient)?;
    if hex.len() != 40 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ValidationError::InvalidRecipient);
    }

    let has_lower = hex.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = hex.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Address::parse_checksummed(raw, None)
            .map_err(|_| ValidationError::InvalidRecipient);
    }
    Address::from_str(raw).map_err(|_| ValidationError::InvalidRecipient)
}

pub fn encode_transfer(recipient: Address, amount: U256) -> Bytes {
    IERC20::transferCall {
        to: recipient,
        amount,
    }
    .abi_encode()
    .into()
}

pub fn encode_balance_of(owner: Address) -> Bytes {
    IERC20::balanceOfCall { account: owner }.abi_encode().into()
}

/// Decodes a single `uint256` return word.
pub fn decode_uint(data: &[u8]) -> Result<U256, PortError> {
    if data.len() != 32 {
        return Err(PortError::Validation(format!(
            "uint256 return must be 32 bytes, got {}",
            data.len()
        )));
    }
    Ok(U256::from_be_slice(data))
}

/// One ERC-20 `transfer` against `token`, sending no native value.
pub fn transfer_call(token: &Token, recipient: Address, amount: U256) -> WalletCall {
    WalletCall {
        to: token.address,
        data: encode_transfer(recipient, amount),
        value: U256::ZERO,
    }
}
