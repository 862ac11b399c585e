/// Wiring of the tracker's services around one key-value store
///
/// `Tracker` owns the wallet book, the settings store and the activity
/// ingestor, and runs ingestion cycles for the poll scheduler.
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::activities::{load_history, ActivityIngestor, IngestReport};
use crate::config::Config;
use crate::errors::TrackerError;
use crate::logger::{self, LogTag};
use crate::poller::CycleRunner;
use crate::rpc::ClientResolver;
use crate::settings::{self, Settings, SettingsStore};
use crate::storage::KvStore;
use crate::transactions::WalletFetcher;
use crate::wallets::WalletBook;

pub struct Tracker {
    store: Arc<dyn KvStore>,
    wallets: Arc<WalletBook>,
    settings: Arc<SettingsStore>,
    ingestor: Arc<ActivityIngestor>,
}

impl Tracker {
    /// Open against `store` with JSON-RPC clients built from configuration
    pub async fn open(config: &Config, store: Arc<dyn KvStore>) -> Result<Self, TrackerError> {
        let resolver = ClientResolver::json_rpc(Duration::from_secs(config.rpc.request_timeout_secs));
        Self::with_resolver(config, store, Arc::new(resolver)).await
    }

    pub async fn with_resolver(
        config: &Config,
        store: Arc<dyn KvStore>,
        resolver: Arc<ClientResolver>,
    ) -> Result<Self, TrackerError> {
        let wallets = WalletBook::load(store.clone()).await?;
        let settings = SettingsStore::load(
            store.clone(),
            config.polling.clone(),
            Settings::from_config(&config.polling, &config.rpc),
        )
        .await?;
        let history = load_history(store.as_ref(), config.fetcher.history_cap).await?;

        let ingestor = ActivityIngestor::new(
            store.clone(),
            resolver,
            WalletFetcher::new(config.fetcher.clone()),
            Arc::new(RwLock::new(history)),
        );

        Ok(Self {
            store,
            wallets: Arc::new(wallets),
            settings: Arc::new(settings),
            ingestor: Arc::new(ingestor),
        })
    }

    pub fn wallets(&self) -> &Arc<WalletBook> {
        &self.wallets
    }

    pub fn settings(&self) -> &Arc<SettingsStore> {
        &self.settings
    }

    pub fn ingestor(&self) -> &Arc<ActivityIngestor> {
        &self.ingestor
    }

    /// One ingestion cycle over every tracked wallet
    pub async fn poll_once(&self) -> Result<IngestReport, TrackerError> {
        let wallets = self.wallets.list().await;
        if wallets.is_empty() {
            logger::debug(LogTag::Ingest, "No wallets to poll");
            return Ok(IngestReport {
                history_len: self.ingestor.recent(usize::MAX).await.len(),
                ..IngestReport::default()
            });
        }
        let endpoint = self.settings.get().await.rpc_endpoint;
        self.ingestor.ingest_all(&wallets, &endpoint).await
    }

    /// Remove every stored key and reset in-memory history
    pub async fn clear_all(&self) -> Result<(), TrackerError> {
        self.ingestor.clear_activities().await?;
        settings::clear_all(self.store.as_ref()).await
    }
}

#[async_trait]
impl CycleRunner for Tracker {
    async fn run_cycle(&self) -> Result<IngestReport, TrackerError> {
        self.poll_once().await
    }
}
