//! Scripted in-memory ledger for tests
//!
//! Serves canned signature lists and transactions, injects one-shot
//! failures, and records every call with its (virtual) time so pacing and
//! sequencing can be asserted.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::time::Instant;

use super::types::{ParsedTransaction, SignatureInfo};
use super::LedgerClient;
use crate::errors::RpcError;

#[derive(Debug, Clone)]
pub struct LedgerCall {
    pub method: &'static str,
    pub target: String,
    pub at: Instant,
}

pub struct ScriptedLedger {
    endpoint: String,
    signatures: Mutex<HashMap<String, Vec<SignatureInfo>>>,
    signature_failures: Mutex<HashMap<String, VecDeque<RpcError>>>,
    transactions: Mutex<HashMap<String, ParsedTransaction>>,
    transaction_failures: Mutex<HashMap<String, VecDeque<RpcError>>>,
    calls: Mutex<Vec<LedgerCall>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedLedger {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            signatures: Mutex::new(HashMap::new()),
            signature_failures: Mutex::new(HashMap::new()),
            transactions: Mutex::new(HashMap::new()),
            transaction_failures: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Replace the signature list served for `address` (newest first)
    pub fn set_signatures(&self, address: &str, signatures: Vec<SignatureInfo>) {
        self.signatures.lock().insert(address.to_string(), signatures);
    }

    pub fn add_transaction(&self, signature: &str, tx: ParsedTransaction) {
        self.transactions.lock().insert(signature.to_string(), tx);
    }

    /// Queue a failure for the next signature listing of `address`
    pub fn fail_signatures_once(&self, address: &str, error: RpcError) {
        self.signature_failures
            .lock()
            .entry(address.to_string())
            .or_default()
            .push_back(error);
    }

    /// Queue a failure for the next fetch of `signature`
    pub fn fail_transaction_once(&self, signature: &str, error: RpcError) {
        self.transaction_failures
            .lock()
            .entry(signature.to_string())
            .or_default()
            .push_back(error);
    }

    pub fn calls(&self) -> Vec<LedgerCall> {
        self.calls.lock().clone()
    }

    /// Signatures passed to `get_parsed_transaction`, in call order
    pub fn transaction_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == "getTransaction")
            .map(|c| c.target)
            .collect()
    }

    pub fn signature_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.method == "getSignaturesForAddress")
            .count()
    }

    /// Highest number of calls that were running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn enter(&self, method: &'static str, target: &str) {
        self.calls.lock().push(LedgerCall {
            method,
            target: target.to_string(),
            at: Instant::now(),
        });
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::task::yield_now().await;
    }

    fn leave(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl LedgerClient for ScriptedLedger {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn list_recent_signatures(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<SignatureInfo>, RpcError> {
        self.enter("getSignaturesForAddress", address).await;
        let failure = self
            .signature_failures
            .lock()
            .get_mut(address)
            .and_then(|queue| queue.pop_front());
        let result = match failure {
            Some(error) => Err(error),
            None => Ok(self
                .signatures
                .lock()
                .get(address)
                .map(|list| list.iter().take(limit).cloned().collect())
                .unwrap_or_default()),
        };
        self.leave();
        result
    }

    async fn get_parsed_transaction(
        &self,
        signature: &str,
    ) -> Result<Option<ParsedTransaction>, RpcError> {
        self.enter("getTransaction", signature).await;
        let failure = self
            .transaction_failures
            .lock()
            .get_mut(signature)
            .and_then(|queue| queue.pop_front());
        let result = match failure {
            Some(error) => Err(error),
            None => Ok(self.transactions.lock().get(signature).cloned()),
        };
        self.leave();
        result
    }
}
