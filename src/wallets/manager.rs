//! Wallet Book
//!
//! In-memory wallet list backed by the key-value store. Every mutation
//! persists the full list before the in-memory copy is replaced, so a failed
//! write leaves the book unchanged.

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};

use super::import::parse_import;
use super::is_valid_solana_address;
use super::types::TrackedWallet;
use crate::constants::WALLETS_KEY;
use crate::errors::TrackerError;
use crate::logger::{self, LogTag};
use crate::storage::{load_json_or_default, save_json, KvStore};

pub struct WalletBook {
    store: Arc<dyn KvStore>,
    wallets: RwLock<Vec<TrackedWallet>>,
    count_tx: watch::Sender<usize>,
}

impl WalletBook {
    // =========================================================================
    // INITIALIZATION
    // =========================================================================

    /// Load the persisted wallet list (unreadable data yields an empty book)
    pub async fn load(store: Arc<dyn KvStore>) -> Result<Self, TrackerError> {
        let wallets: Vec<TrackedWallet> = load_json_or_default(store.as_ref(), WALLETS_KEY).await?;
        logger::debug(LogTag::Wallets, &format!("Loaded {} wallets", wallets.len()));

        let (count_tx, _) = watch::channel(wallets.len());
        Ok(Self {
            store,
            wallets: RwLock::new(wallets),
            count_tx,
        })
    }

    /// Receiver that observes the wallet count after every change
    pub fn watch_count(&self) -> watch::Receiver<usize> {
        self.count_tx.subscribe()
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub async fn list(&self) -> Vec<TrackedWallet> {
        self.wallets.read().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.wallets.read().await.len()
    }

    pub async fn get(&self, address: &str) -> Option<TrackedWallet> {
        self.wallets
            .read()
            .await
            .iter()
            .find(|w| w.address == address)
            .cloned()
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Track a new wallet; a blank label becomes `Wallet N`
    pub async fn add(&self, address: &str, label: Option<&str>) -> Result<TrackedWallet, TrackerError> {
        let address = address.trim();
        if !is_valid_solana_address(address) {
            return Err(TrackerError::InvalidAddress(address.to_string()));
        }

        let mut wallets = self.wallets.write().await;
        if wallets.iter().any(|w| w.address == address) {
            return Err(TrackerError::DuplicateWallet(address.to_string()));
        }

        let label = match label.map(str::trim) {
            Some(l) if !l.is_empty() => l.to_string(),
            _ => format!("Wallet {}", wallets.len() + 1),
        };
        let wallet = TrackedWallet::new(address, &label, now_ms());

        let mut next = wallets.clone();
        next.push(wallet.clone());
        self.commit(&mut wallets, next).await?;

        logger::info(
            LogTag::Wallets,
            &format!("Added wallet {} ({})", wallet.label, wallet.short_address()),
        );
        Ok(wallet)
    }

    pub async fn remove(&self, address: &str) -> Result<TrackedWallet, TrackerError> {
        let mut wallets = self.wallets.write().await;
        let Some(position) = wallets.iter().position(|w| w.address == address) else {
            return Err(TrackerError::WalletNotFound(address.to_string()));
        };

        let mut next = wallets.clone();
        let removed = next.remove(position);
        self.commit(&mut wallets, next).await?;

        logger::info(LogTag::Wallets, &format!("Removed wallet {}", removed.label));
        Ok(removed)
    }

    pub async fn update_label(&self, address: &str, label: &str) -> Result<(), TrackerError> {
        let mut wallets = self.wallets.write().await;
        let Some(position) = wallets.iter().position(|w| w.address == address) else {
            return Err(TrackerError::WalletNotFound(address.to_string()));
        };

        let mut next = wallets.clone();
        next[position].label = label.trim().to_string();
        self.commit(&mut wallets, next).await
    }

    // =========================================================================
    // IMPORT / EXPORT
    // =========================================================================

    pub async fn export_json(&self) -> Result<String, TrackerError> {
        let wallets = self.wallets.read().await;
        serde_json::to_string_pretty(&*wallets)
            .map_err(|e| TrackerError::Storage(e.into()))
    }

    /// Merge wallets from an exported JSON array; returns how many were added
    pub async fn import_json(&self, text: &str) -> Result<usize, TrackerError> {
        let mut wallets = self.wallets.write().await;
        let existing: HashSet<String> = wallets.iter().map(|w| w.address.clone()).collect();
        let added = parse_import(text, &existing, now_ms())?;
        let added_count = added.len();

        let mut next = wallets.clone();
        next.extend(added);
        self.commit(&mut wallets, next).await?;

        logger::info(LogTag::Wallets, &format!("Imported {} wallets", added_count));
        Ok(added_count)
    }

    /// Persist `next`, then make it current and broadcast the count
    async fn commit(
        &self,
        current: &mut Vec<TrackedWallet>,
        next: Vec<TrackedWallet>,
    ) -> Result<(), TrackerError> {
        save_json(self.store.as_ref(), WALLETS_KEY, &next).await?;
        *current = next;
        self.count_tx.send_replace(current.len());
        Ok(())
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
