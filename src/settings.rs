/// User settings persisted under the `settings` key
///
/// Poll interval and RPC endpoint. Bounds and defaults come from the
/// polling and rpc configuration sections.
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::{PollingConfig, RpcConfig};
use crate::constants::{ACTIVITIES_KEY, SETTINGS_KEY, WALLETS_KEY};
use crate::errors::TrackerError;
use crate::logger::{self, LogTag};
use crate::storage::{load_json_or_default, save_json, KvStore};

pub const DEFAULT_RPC_ENDPOINT: &str = "https://rpc.ankr.com/solana";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Seconds between automatic polls
    pub poll_interval: u64,
    pub rpc_endpoint: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL_SECS,
            rpc_endpoint: DEFAULT_RPC_ENDPOINT.to_string(),
        }
    }
}

impl Settings {
    /// Defaults taken from configuration instead of the built-in constants
    pub fn from_config(polling: &PollingConfig, rpc: &RpcConfig) -> Self {
        Self {
            poll_interval: polling.default_interval_secs,
            rpc_endpoint: rpc.default_endpoint.clone(),
        }
    }
}

// =============================================================================
// SETTINGS STORE
// =============================================================================

pub struct SettingsStore {
    store: Arc<dyn KvStore>,
    bounds: PollingConfig,
    current: RwLock<Settings>,
}

impl SettingsStore {
    /// Load persisted settings; a missing or unreadable blob yields `defaults`
    pub async fn load(
        store: Arc<dyn KvStore>,
        bounds: PollingConfig,
        defaults: Settings,
    ) -> Result<Self, TrackerError> {
        bounds.validate().map_err(TrackerError::Config)?;

        let mut current = match store.get(SETTINGS_KEY).await? {
            Some(text) => match serde_json::from_str::<Settings>(&text) {
                Ok(settings) => settings,
                Err(e) => {
                    logger::warning(
                        LogTag::Config,
                        &format!("Unreadable settings, using defaults: {}", e),
                    );
                    defaults
                }
            },
            None => defaults,
        };
        current.poll_interval = clamp_interval(&bounds, current.poll_interval);

        Ok(Self {
            store,
            bounds,
            current: RwLock::new(current),
        })
    }

    pub async fn get(&self) -> Settings {
        self.current.read().await.clone()
    }

    /// Clamp to the configured bounds and persist; returns the stored value
    pub async fn update_poll_interval(&self, seconds: u64) -> Result<u64, TrackerError> {
        let clamped = clamp_interval(&self.bounds, seconds);
        let mut current = self.current.write().await;
        let mut next = current.clone();
        next.poll_interval = clamped;
        save_json(self.store.as_ref(), SETTINGS_KEY, &next).await?;
        *current = next;

        if clamped != seconds {
            logger::warning(
                LogTag::Config,
                &format!("Poll interval {}s out of range, using {}s", seconds, clamped),
            );
        }
        Ok(clamped)
    }

    /// Store the endpoint as given
    pub async fn update_rpc_endpoint(&self, endpoint: &str) -> Result<(), TrackerError> {
        let mut current = self.current.write().await;
        let mut next = current.clone();
        next.rpc_endpoint = endpoint.to_string();
        save_json(self.store.as_ref(), SETTINGS_KEY, &next).await?;
        *current = next;

        logger::info(LogTag::Config, &format!("RPC endpoint set to {}", endpoint));
        Ok(())
    }
}

/// Callers hold validated bounds
fn clamp_interval(bounds: &PollingConfig, seconds: u64) -> u64 {
    seconds.max(bounds.min_interval_secs).min(bounds.max_interval_secs)
}

/// Remove wallets, settings and activity history from the store
pub async fn clear_all(store: &dyn KvStore) -> Result<(), TrackerError> {
    for key in [WALLETS_KEY, SETTINGS_KEY, ACTIVITIES_KEY] {
        store.remove(key).await?;
    }
    logger::info(LogTag::Storage, "Cleared all stored data");
    Ok(())
}
