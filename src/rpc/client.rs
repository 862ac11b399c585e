//! Solana JSON-RPC client over reqwest
//!
//! Requests are plain JSON-RPC 2.0 POSTs; the response is checked for HTTP
//! 429, JSON-RPC errors and a `null` result in that order.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::{Duration, Instant};

use super::types::{ParsedTransaction, SignatureInfo};
use super::LedgerClient;
use crate::errors::{is_rate_limit_message, RpcError};
use crate::logger::{self, LogTag};

pub struct JsonRpcClient {
    url: String,
    http: reqwest::Client,
}

impl JsonRpcClient {
    /// Create a client for `url`. Only http(s) URLs are accepted.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, RpcError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|e| RpcError::InvalidEndpoint(format!("{}: {}", url, e)))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(RpcError::InvalidEndpoint(format!(
                "{}: unsupported scheme '{}'",
                url,
                parsed.scheme()
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RpcError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            url: url.to_string(),
            http,
        })
    }

    /// Perform one JSON-RPC call and return its `result` (possibly `null`)
    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let started = Instant::now();
        let response = self
            .http
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(RpcError::RateLimited(format!("{} returned HTTP 429", method)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if is_rate_limit_message(&body) {
                return Err(RpcError::RateLimited(body));
            }
            return Err(RpcError::Transport(format!("HTTP {} from {}", status.as_u16(), method)));
        }

        let mut body: Value = response
            .json()
            .await
            .map_err(|e| RpcError::InvalidResponse(format!("{} body: {}", method, e)))?;

        logger::verbose(
            LogTag::Rpc,
            &format!("{} answered in {}ms", method, started.elapsed().as_millis()),
        );

        if let Some(error) = body.get("error") {
            let code = error.get("code").and_then(Value::as_i64).unwrap_or(0);
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(RpcError::Rpc { code, message });
        }

        match body.get_mut("result") {
            Some(result) => Ok(result.take()),
            None => Err(RpcError::InvalidResponse(format!("{} response has no result", method))),
        }
    }
}

#[async_trait]
impl LedgerClient for JsonRpcClient {
    fn endpoint(&self) -> &str {
        &self.url
    }

    async fn list_recent_signatures(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<SignatureInfo>, RpcError> {
        let result = self
            .call(
                "getSignaturesForAddress",
                json!([address, { "limit": limit, "commitment": "confirmed" }]),
            )
            .await?;

        serde_json::from_value(result)
            .map_err(|e| RpcError::InvalidResponse(format!("signature list: {}", e)))
    }

    async fn get_parsed_transaction(
        &self,
        signature: &str,
    ) -> Result<Option<ParsedTransaction>, RpcError> {
        let result = self
            .call(
                "getTransaction",
                json!([
                    signature,
                    {
                        "encoding": "jsonParsed",
                        "commitment": "confirmed",
                        "maxSupportedTransactionVersion": 0
                    }
                ]),
            )
            .await?;

        if result.is_null() {
            return Ok(None);
        }

        serde_json::from_value(result)
            .map(Some)
            .map_err(|e| RpcError::InvalidResponse(format!("transaction {}: {}", signature, e)))
    }
}
