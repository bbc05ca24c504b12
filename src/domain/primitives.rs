//! Domain primitives: Address, TxHash, BlockNumber.

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// On-chain account address (0x-prefixed, 40 hex digits).
///
/// Equality and hashing are case-insensitive: event payloads mix checksummed
/// and lowercase forms for the same account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address(String);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid address: {0}")]
pub struct AddressParseError(String);

impl Address {
    /// Parse and validate an address string.
    pub fn parse(input: &str) -> Result<Self, AddressParseError> {
        let hex_part = input
            .strip_prefix("0x")
            .ok_or_else(|| AddressParseError(input.to_string()))?;
        if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AddressParseError(input.to_string()));
        }
        Ok(Address(input.to_string()))
    }

    /// The canonical zero address, used as the mint/burn counterparty.
    pub fn zero() -> Self {
        Address(format!("0x{}", "0".repeat(40)))
    }

    /// True if every hex digit is zero.
    pub fn is_zero(&self) -> bool {
        self.0[2..].bytes().all(|b| b == b'0')
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.0.bytes() {
            b.to_ascii_lowercase().hash(state);
        }
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transaction identifier (0x-prefixed hex string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash(pub String);

impl TxHash {
    pub fn new(hash: String) -> Self {
        TxHash(hash)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TxHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Block height on the chain.
pub type BlockNumber = u64;
