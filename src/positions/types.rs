use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    #[default]
    Long,
    Short,
}

impl PositionSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            PositionSide::Long => "long",
            PositionSide::Short => "short",
        }
    }
}

/// One open perpetuals position, all money values in USD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PerpPosition {
    pub position_pubkey: String,
    pub owner: String,
    pub pool: String,
    pub custody: String,
    pub collateral_custody: String,
    pub side: PositionSide,
    pub size_usd: f64,
    pub collateral_usd: f64,
    pub entry_price: f64,
    pub mark_price: f64,
    pub pnl_usd: f64,
    /// Percent, e.g. -23.47
    pub pnl_percent: f64,
    pub leverage: f64,
    pub liquidation_price: f64,
    pub token: String,
    pub collateral_token: String,
    /// Milliseconds since epoch, 0 when unknown
    pub updated_at: i64,
}

/// Positions fetched for one wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletPositions {
    pub wallet_address: String,
    pub positions: Vec<PerpPosition>,
    pub last_fetched: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
