/// Ledger access for the activity pipeline
///
/// - `LedgerClient`: the two calls the fetcher needs
/// - `JsonRpcClient`: reqwest implementation against a Solana JSON-RPC node
/// - `ClientResolver`: one cached client, rebuilt when the endpoint changes
/// - `testing`: endpoint health probe
use async_trait::async_trait;

use crate::errors::RpcError;

pub mod client;
pub mod resolver;
pub mod testing;
pub mod types;

#[cfg(test)]
pub mod scripted;

pub use client::JsonRpcClient;
pub use resolver::{ClientFactory, ClientResolver};
pub use types::{ParsedTransaction, SignatureInfo};

#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Endpoint URL this client talks to
    fn endpoint(&self) -> &str;

    /// Most recent signatures for `address`, newest first, at most `limit`
    async fn list_recent_signatures(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<SignatureInfo>, RpcError>;

    /// Parsed transaction, or `None` when unknown or not yet confirmed
    async fn get_parsed_transaction(
        &self,
        signature: &str,
    ) -> Result<Option<ParsedTransaction>, RpcError>;
}
