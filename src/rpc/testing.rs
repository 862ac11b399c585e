//! RPC endpoint testing utilities
//!
//! Used before an endpoint is stored in settings, so a typo is reported
//! instead of failing every poll cycle afterwards.

use crate::logger::{self, LogTag};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Known Solana mainnet genesis hash
const MAINNET_GENESIS_HASH: &str = "5eykt4UsFv8P8NJdTREpY1vzqKqZKvdpKuc147dw2N9d";

/// RPC endpoint test result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcEndpointTestResult {
    pub url: String,
    pub success: bool,
    pub latency_ms: u64,
    pub error: Option<String>,
    pub is_mainnet: Option<bool>,
}

impl RpcEndpointTestResult {
    fn failed(url: &str, latency_ms: u64, error: String) -> Self {
        Self {
            url: url.to_string(),
            success: false,
            latency_ms,
            error: Some(error),
            is_mainnet: None,
        }
    }
}

async fn post(
    client: &reqwest::Client,
    url: &str,
    method: &str,
) -> Result<serde_json::Value, String> {
    let payload = serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": method
    });

    let response = client
        .post(url)
        .header("Content-Type", "application/json")
        .json(&payload)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;

    if !response.status().is_success() {
        return Err(format!("HTTP status: {}", response.status()));
    }

    let body: serde_json::Value = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))?;

    if let Some(err) = body.get("error") {
        return Err(format!("RPC error: {}", err));
    }

    Ok(body)
}

/// Test a single RPC endpoint with `getHealth`, then check it is mainnet
pub async fn test_rpc_endpoint(url: &str, timeout: Duration) -> RpcEndpointTestResult {
    logger::debug(LogTag::Rpc, &format!("Testing RPC endpoint: {}", url));

    let client = match reqwest::Client::builder().timeout(timeout).build() {
        Ok(c) => c,
        Err(e) => {
            return RpcEndpointTestResult::failed(url, 0, format!("Failed to create HTTP client: {}", e))
        }
    };

    let start = Instant::now();
    if let Err(e) = post(&client, url, "getHealth").await {
        return RpcEndpointTestResult::failed(url, start.elapsed().as_millis() as u64, e);
    }
    let latency_ms = start.elapsed().as_millis() as u64;

    let is_mainnet = match post(&client, url, "getGenesisHash").await {
        Ok(body) => body
            .get("result")
            .and_then(|r| r.as_str())
            .map(|hash| hash == MAINNET_GENESIS_HASH),
        Err(e) => {
            logger::debug(LogTag::Rpc, &format!("Genesis hash check failed for {}: {}", url, e));
            None
        }
    };

    RpcEndpointTestResult {
        url: url.to_string(),
        success: true,
        latency_ms,
        error: None,
        is_mainnet,
    }
}
