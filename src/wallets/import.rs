//! JSON import of wallet lists
//!
//! Accepts the same array that `export_json` writes. Entries are merged
//! leniently: anything without a valid, new string address is skipped.

use serde_json::Value;
use std::collections::HashSet;

use super::is_valid_solana_address;
use super::types::TrackedWallet;
use crate::errors::TrackerError;

pub const IMPORT_DEFAULT_LABEL: &str = "Imported Wallet";

// =============================================================================
// PARSING
// =============================================================================

/// Wallets in `text` that are valid and not in `existing`, in file order
///
/// Errors when the text is not JSON, is not an array, or contributes no
/// new wallet.
pub fn parse_import(
    text: &str,
    existing: &HashSet<String>,
    now_ms: i64,
) -> Result<Vec<TrackedWallet>, TrackerError> {
    let parsed: Value = serde_json::from_str(text)
        .map_err(|_| TrackerError::ImportFormat("Failed to parse wallet file".to_string()))?;

    let Value::Array(entries) = parsed else {
        return Err(TrackerError::ImportFormat(
            "Invalid file format: expected an array of wallets".to_string(),
        ));
    };

    let mut seen = existing.clone();
    let mut added = Vec::new();

    for entry in &entries {
        let Some(address) = entry.get("address").and_then(Value::as_str) else {
            continue;
        };
        if !is_valid_solana_address(address) || seen.contains(address) {
            continue;
        }

        // Empty labels and zero timestamps count as missing
        let label = entry
            .get("label")
            .and_then(Value::as_str)
            .filter(|label| !label.is_empty())
            .unwrap_or(IMPORT_DEFAULT_LABEL);
        let added_at = entry
            .get("addedAt")
            .and_then(added_at_ms)
            .filter(|ms| *ms != 0)
            .unwrap_or(now_ms);

        seen.insert(address.to_string());
        added.push(TrackedWallet::new(address, label, added_at));
    }

    if added.is_empty() {
        return Err(TrackerError::ImportFormat(
            "No new valid wallets found in file".to_string(),
        ));
    }

    Ok(added)
}

/// Integer or fractional millisecond timestamp
fn added_at_ms(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
}
