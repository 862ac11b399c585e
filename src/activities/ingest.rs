/// Ingestion cycle
///
/// One cycle runs the per-wallet fetcher for every tracked wallet against
/// the known-signatures snapshot taken when the cycle starts, merges the
/// union of new activities into history, and persists the result.
///
/// Failure policy:
/// - a wallet that fails is logged and contributes nothing
/// - an endpoint that cannot be used fails the whole cycle
/// - persistence failures propagate after memory has been updated
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::history::ActivityHistory;
use crate::constants::ACTIVITIES_KEY;
use crate::errors::TrackerError;
use crate::logger::{self, LogTag};
use crate::rpc::ClientResolver;
use crate::storage::{load_json_or_default, save_json, KvStore};
use crate::transactions::{Activity, WalletFetcher};
use crate::wallets::TrackedWallet;

/// Outcome of one ingestion cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub wallets_processed: usize,
    pub wallets_failed: usize,
    pub new_activities: usize,
    /// Ids merged by this cycle, in fetch order
    pub new_ids: Vec<String>,
    pub history_len: usize,
    /// Whether the history was written to the store
    pub persisted: bool,
}

/// Load persisted history; unreadable data yields an empty history
pub async fn load_history(store: &dyn KvStore, cap: usize) -> Result<ActivityHistory, TrackerError> {
    let entries: Vec<Activity> = load_json_or_default(store, ACTIVITIES_KEY).await?;
    let history = ActivityHistory::seeded(entries, cap);
    logger::debug(
        LogTag::Ingest,
        &format!(
            "Loaded {} activities, {} known signatures",
            history.len(),
            history.known_signatures().len()
        ),
    );
    Ok(history)
}

// =============================================================================
// INGESTOR
// =============================================================================

pub struct ActivityIngestor {
    store: Arc<dyn KvStore>,
    resolver: Arc<ClientResolver>,
    fetcher: WalletFetcher,
    state: Arc<RwLock<ActivityHistory>>,
}

impl ActivityIngestor {
    pub fn new(
        store: Arc<dyn KvStore>,
        resolver: Arc<ClientResolver>,
        fetcher: WalletFetcher,
        state: Arc<RwLock<ActivityHistory>>,
    ) -> Self {
        Self {
            store,
            resolver,
            fetcher,
            state,
        }
    }

    /// Shared history handle
    pub fn state(&self) -> Arc<RwLock<ActivityHistory>> {
        self.state.clone()
    }

    pub async fn recent(&self, limit: usize) -> Vec<Activity> {
        self.state.read().await.recent(limit).to_vec()
    }

    /// Fetch new activity for every wallet and merge it into history
    pub async fn ingest_all(
        &self,
        wallets: &[TrackedWallet],
        rpc_endpoint: &str,
    ) -> Result<IngestReport, TrackerError> {
        let client = self.resolver.resolve(rpc_endpoint)?;
        let known: HashSet<String> = self.state.read().await.known_signatures().clone();

        let mut report = IngestReport::default();
        let mut collected: Vec<Activity> = Vec::new();

        for wallet in wallets {
            match self
                .fetcher
                .fetch(client.as_ref(), &wallet.address, &wallet.label, &known)
                .await
            {
                Ok(activities) => {
                    report.wallets_processed += 1;
                    if !activities.is_empty() {
                        logger::debug(
                            LogTag::Ingest,
                            &format!("{}: {} new activities", wallet.label, activities.len()),
                        );
                    }
                    collected.extend(activities);
                }
                Err(e) => {
                    report.wallets_failed += 1;
                    logger::error(
                        LogTag::Ingest,
                        &format!("Error fetching activities for {}: {}", wallet.label, e),
                    );
                }
            }
        }

        if collected.is_empty() {
            report.history_len = self.state.read().await.len();
            return Ok(report);
        }

        // Memory first, then the store
        let snapshot = {
            let mut state = self.state.write().await;
            report.new_ids = state.merge(collected);
            report.new_activities = report.new_ids.len();
            report.history_len = state.len();
            state.entries().to_vec()
        };

        save_json(self.store.as_ref(), ACTIVITIES_KEY, &snapshot).await?;
        report.persisted = true;

        logger::info(
            LogTag::Ingest,
            &format!(
                "Found {} new activities ({} in history)",
                report.new_activities, report.history_len
            ),
        );
        Ok(report)
    }

    /// Empty the history and the known-signatures set, persisting an empty list
    pub async fn clear_activities(&self) -> Result<(), TrackerError> {
        self.state.write().await.clear();
        save_json(self.store.as_ref(), ACTIVITIES_KEY, &Vec::<Activity>::new()).await?;
        logger::info(LogTag::Ingest, "Activity history cleared");
        Ok(())
    }
}
