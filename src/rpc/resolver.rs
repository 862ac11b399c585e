use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use super::client::JsonRpcClient;
use super::LedgerClient;
use crate::errors::RpcError;
use crate::logger::{self, LogTag};

/// Builds a client for an endpoint URL
pub type ClientFactory =
    Arc<dyn Fn(&str) -> Result<Arc<dyn LedgerClient>, RpcError> + Send + Sync>;

/// Caches one ledger client and replaces it when the endpoint changes
pub struct ClientResolver {
    factory: ClientFactory,
    current: Mutex<Option<Arc<dyn LedgerClient>>>,
}

impl ClientResolver {
    pub fn new(factory: ClientFactory) -> Self {
        Self {
            factory,
            current: Mutex::new(None),
        }
    }

    /// Resolver producing `JsonRpcClient`s with the given request timeout
    pub fn json_rpc(timeout: Duration) -> Self {
        Self::new(Arc::new(move |url: &str| {
            let client = JsonRpcClient::new(url, timeout)?;
            Ok(Arc::new(client) as Arc<dyn LedgerClient>)
        }))
    }

    /// Resolver that always hands out the same client
    pub fn fixed(client: Arc<dyn LedgerClient>) -> Self {
        Self::new(Arc::new(move |_url: &str| Ok(client.clone())))
    }

    /// Client for `endpoint`, reusing the cached one when the endpoint matches
    pub fn resolve(&self, endpoint: &str) -> Result<Arc<dyn LedgerClient>, RpcError> {
        let mut current = self.current.lock();
        if let Some(client) = current.as_ref() {
            if client.endpoint() == endpoint {
                return Ok(client.clone());
            }
        }

        let client = (self.factory)(endpoint)?;
        if let Some(previous) = current.as_ref() {
            if previous.endpoint() != client.endpoint() {
                logger::info(LogTag::Rpc, &format!("RPC endpoint switched to {}", endpoint));
            }
        }
        *current = Some(client.clone());
        Ok(client)
    }
}
