// =============================================================================
// ACTIVITY DATA STRUCTURES
// =============================================================================

use serde::{Deserialize, Serialize};

/// Coarse transaction type shown in the activity feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Transfer,
    Swap,
    JupiterPerp,
    #[default]
    Unknown,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Transfer => "transfer",
            ActivityType::Swap => "swap",
            ActivityType::JupiterPerp => "jupiter_perp",
            ActivityType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferDirection {
    In,
    Out,
}

/// Balance movement of one token (or native SOL) for the tracked wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenTransfer {
    pub mint: String,
    /// Always positive; the sign lives in `direction`
    pub amount: f64,
    pub decimals: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    pub direction: TransferDirection,
}

/// One transaction as seen from one tracked wallet
///
/// `id` is `"<signature>-<walletAddress>"`; the same signature may appear
/// once per tracked wallet it touches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub signature: String,
    pub wallet_address: String,
    pub wallet_label: String,
    /// Milliseconds since epoch, 0 when the block time is unknown
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub transfers: Vec<TokenTransfer>,
    pub is_jupiter_perp: bool,
    /// Network fee in SOL
    pub fee: f64,
    pub success: bool,
}

impl Activity {
    pub fn make_id(signature: &str, wallet_address: &str) -> String {
        format!("{}-{}", signature, wallet_address)
    }
}
