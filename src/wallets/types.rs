//! Wallet types

use serde::{Deserialize, Serialize};

/// A wallet being monitored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedWallet {
    pub address: String,
    pub label: String,
    /// Milliseconds since epoch
    pub added_at: i64,
}

impl TrackedWallet {
    pub fn new(address: &str, label: &str, added_at: i64) -> Self {
        Self {
            address: address.to_string(),
            label: label.to_string(),
            added_at,
        }
    }

    /// First 8 characters of the address
    pub fn short_address(&self) -> &str {
        short_address(&self.address)
    }
}

pub(crate) fn short_address(address: &str) -> &str {
    match address.char_indices().nth(8) {
        Some((end, _)) => &address[..end],
        None => address,
    }
}
