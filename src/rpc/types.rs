//! JSON-RPC wire types for `getSignaturesForAddress` and `getTransaction`
//! (`jsonParsed` encoding)
//!
//! Only the fields the classifier and transfer extractor read are modelled;
//! everything else in the response is ignored. Optional sections stay
//! `Option` so "absent" and "empty" remain distinguishable.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// SIGNATURES
// =============================================================================

/// One entry of `getSignaturesForAddress`, most recent first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureInfo {
    pub signature: String,
    #[serde(default)]
    pub slot: u64,
    #[serde(default)]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub err: Option<Value>,
}

impl SignatureInfo {
    pub fn new(signature: &str, block_time: Option<i64>) -> Self {
        Self {
            signature: signature.to_string(),
            slot: 0,
            block_time,
            err: None,
        }
    }
}

// =============================================================================
// TRANSACTIONS
// =============================================================================

/// Parsed transaction returned by `getTransaction`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTransaction {
    #[serde(default)]
    pub slot: u64,
    #[serde(default)]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub transaction: TransactionEnvelope,
    #[serde(default)]
    pub meta: Option<TransactionMeta>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionEnvelope {
    #[serde(default)]
    pub signatures: Vec<String>,
    #[serde(default)]
    pub message: ParsedMessage,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedMessage {
    /// Static account keys, in account-index order
    #[serde(default)]
    pub account_keys: Vec<AccountKey>,
    /// Top-level instructions
    #[serde(default)]
    pub instructions: Vec<ParsedInstruction>,
}

/// Account key as plain base58 or as the parsed object form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccountKey {
    Plain(String),
    Parsed {
        pubkey: String,
        #[serde(default)]
        signer: bool,
        #[serde(default)]
        writable: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source: Option<String>,
    },
}

impl AccountKey {
    pub fn pubkey(&self) -> &str {
        match self {
            AccountKey::Plain(key) => key,
            AccountKey::Parsed { pubkey, .. } => pubkey,
        }
    }
}

/// Instruction in either parsed or partially-decoded form
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedInstruction {
    #[serde(default)]
    pub program_id: Option<String>,
    /// Present only for partially-decoded instructions
    #[serde(default)]
    pub accounts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,
}

/// Transaction metadata with balance changes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMeta {
    #[serde(default)]
    pub err: Option<Value>,
    #[serde(default)]
    pub fee: u64,
    #[serde(default)]
    pub pre_balances: Vec<u64>,
    #[serde(default)]
    pub post_balances: Vec<u64>,
    #[serde(default)]
    pub pre_token_balances: Option<Vec<TokenBalance>>,
    #[serde(default)]
    pub post_token_balances: Option<Vec<TokenBalance>>,
    #[serde(default)]
    pub inner_instructions: Option<Vec<InnerInstructionGroup>>,
    #[serde(default)]
    pub loaded_addresses: Option<LoadedAddresses>,
    #[serde(default)]
    pub log_messages: Option<Vec<String>>,
}

/// Token balance information in transaction metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenBalance {
    #[serde(rename = "accountIndex")]
    pub account_index: u32,
    pub mint: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(rename = "programId", default)]
    pub program_id: Option<String>,
    #[serde(rename = "uiTokenAmount")]
    pub ui_token_amount: UiTokenAmount,
}

/// Token amount with UI representation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiTokenAmount {
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub decimals: u8,
    #[serde(rename = "uiAmount", default)]
    pub ui_amount: Option<f64>,
    #[serde(rename = "uiAmountString", default)]
    pub ui_amount_string: Option<String>,
}

impl UiTokenAmount {
    /// Decimal amount: `uiAmount`, else parsed `uiAmountString`, else 0
    pub fn ui_value(&self) -> f64 {
        if let Some(value) = self.ui_amount {
            return value;
        }
        self.ui_amount_string
            .as_deref()
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(0.0)
    }
}

/// Inner instructions produced by one top-level instruction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InnerInstructionGroup {
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub instructions: Vec<ParsedInstruction>,
}

/// Addresses loaded through address lookup tables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadedAddresses {
    #[serde(default)]
    pub writable: Vec<String>,
    #[serde(default)]
    pub readonly: Vec<String>,
}
