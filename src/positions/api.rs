/// Jupiter perpetuals positions API
///
/// Endpoint: `GET {base}/v1/positions?walletAddress=<address>`
///
/// The API mixes scales and encodings. Per field:
/// - `size`: USD
/// - `collateralUsd`: micro-USD (divided by 1,000,000)
/// - `pnlAfterFeesUsd`: USD
/// - `pnlChangePctAfterFees`: percent
/// - `entryPrice`, `markPrice`, `liquidationPrice`: USD
/// - `leverage`: plain number
///
/// Numbers may arrive as JSON numbers or strings; anything unparsable is 0.
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::types::{PerpPosition, PositionSide, WalletPositions};
use crate::config::PositionsConfig;
use crate::errors::TrackerError;
use crate::logger::{self, LogTag};

const TIMEOUT_SECS: u64 = 15;

/// Only `collateralUsd` is reported in micro-USD
const COLLATERAL_SCALE: f64 = 1_000_000.0;

/// Prefix of the wrapped SOL mint as it appears in `marketMint`
const SOL_MARKET_MINT_PREFIX: &str = "So1111111111111111111111111111111";

/// Symbol aliases applied before the market filter
const SYMBOL_ALIASES: &[(&str, &str)] = &[("wSOL", "SOL"), ("WBTC", "BTC"), ("WETH", "ETH")];

// =============================================================================
// SOURCE TRAIT
// =============================================================================

#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn fetch_positions(&self, wallet_address: &str) -> Result<Vec<PerpPosition>, TrackerError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

pub struct PositionsClient {
    client: Client,
    base_url: String,
    market_symbol: String,
}

impl PositionsClient {
    pub fn new(config: &PositionsConfig) -> Result<Self, TrackerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .map_err(|e| TrackerError::Positions(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            market_symbol: config.market_symbol.clone(),
        })
    }
}

#[async_trait]
impl PositionSource for PositionsClient {
    async fn fetch_positions(&self, wallet_address: &str) -> Result<Vec<PerpPosition>, TrackerError> {
        let url = format!("{}/v1/positions", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("walletAddress", wallet_address)])
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| TrackerError::Positions(e.to_string()))?;

        if !response.status().is_success() {
            return Err(TrackerError::Positions(format!("HTTP {}", response.status())));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| TrackerError::Positions(format!("Invalid response: {}", e)))?;

        let positions = parse_positions_response(&body, &self.market_symbol);
        logger::debug(
            LogTag::Positions,
            &format!("{}: {} open positions", wallet_address, positions.len()),
        );
        Ok(positions)
    }
}

/// Fetch every wallet in order, pausing `delay` after each request
///
/// A failing wallet gets an empty position list and its error message.
pub async fn fetch_all_positions(
    source: &dyn PositionSource,
    addresses: &[String],
    delay: Duration,
) -> Vec<WalletPositions> {
    let mut results = Vec::with_capacity(addresses.len());

    for address in addresses {
        let entry = match source.fetch_positions(address).await {
            Ok(positions) => WalletPositions {
                wallet_address: address.clone(),
                positions,
                last_fetched: now_ms(),
                error: None,
            },
            Err(e) => {
                let message = match e {
                    TrackerError::Positions(message) => message,
                    other => other.to_string(),
                };
                logger::warning(
                    LogTag::Positions,
                    &format!("Failed to fetch positions for {}: {}", address, message),
                );
                WalletPositions {
                    wallet_address: address.clone(),
                    positions: Vec::new(),
                    last_fetched: now_ms(),
                    error: Some(message),
                }
            }
        };
        results.push(entry);
        tokio::time::sleep(delay).await;
    }

    results
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

// =============================================================================
// NORMALIZATION
// =============================================================================

/// Normalize an API body and keep only positions in `market_symbol`
pub fn parse_positions_response(body: &Value, market_symbol: &str) -> Vec<PerpPosition> {
    let Some(list) = body.get("dataList").and_then(Value::as_array) else {
        return Vec::new();
    };

    list.iter()
        .map(parse_position)
        .filter(|p| canonical_symbol(&p.token).eq_ignore_ascii_case(market_symbol))
        .collect()
}

/// Map wrapped-asset tickers to their base symbol
pub fn canonical_symbol(token: &str) -> &str {
    SYMBOL_ALIASES
        .iter()
        .find(|(alias, _)| *alias == token)
        .map(|(_, symbol)| *symbol)
        .unwrap_or(token)
}

fn parse_position(raw: &Value) -> PerpPosition {
    let market_mint = text(raw, "marketMint");
    let asset = text(raw, "asset");
    let token = if market_mint.contains(SOL_MARKET_MINT_PREFIX) {
        "SOL".to_string()
    } else if !asset.is_empty() {
        asset
    } else {
        "Unknown".to_string()
    };

    let side = match text(raw, "side").as_str() {
        "short" => PositionSide::Short,
        _ => PositionSide::Long,
    };

    let collateral_token = match text(raw, "collateralToken") {
        t if t.is_empty() => "USDC".to_string(),
        t => t,
    };

    let updated_secs = match number(raw, "updatedTime") {
        t if t != 0.0 => t,
        _ => number(raw, "updateTime"),
    };

    PerpPosition {
        position_pubkey: text(raw, "positionPubkey"),
        owner: text(raw, "owner"),
        pool: text(raw, "pool"),
        custody: text(raw, "custody"),
        collateral_custody: text(raw, "collateralCustody"),
        side,
        size_usd: number(raw, "size"),
        collateral_usd: number(raw, "collateralUsd") / COLLATERAL_SCALE,
        entry_price: number(raw, "entryPrice"),
        mark_price: number(raw, "markPrice"),
        pnl_usd: number(raw, "pnlAfterFeesUsd"),
        pnl_percent: number(raw, "pnlChangePctAfterFees"),
        leverage: number(raw, "leverage"),
        liquidation_price: number(raw, "liquidationPrice"),
        token,
        collateral_token,
        updated_at: (updated_secs * 1000.0) as i64,
    }
}

/// Numeric field given as a number or a numeric string
fn number(raw: &Value, key: &str) -> f64 {
    match raw.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0),
        _ => 0.0,
    }
}

fn text(raw: &Value, key: &str) -> String {
    match raw.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
