//! Supported tokens on Base.

use alloy::primitives::address;

use crate::domain::Token;

/// Ordered token table. The first entry is the default selection.
pub const TOKENS: &[Token] = &[
    Token {
        symbol: "USDC",
        address: address!("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"),
        decimals: 6,
    },
    Token {
        symbol: "USDT",
        address: address!("50c5725949A6F0c72E6C4a641F24049A917DB0Cb"),
        decimals: 6,
    },
];

pub fn find_token(symbol: &str) -> Option<&'static Token> {
    TOKENS.iter().find(|t| t.symbol == symbol)
}

pub fn default_token() -> &'static Token {
    &TOKENS[0]
}
