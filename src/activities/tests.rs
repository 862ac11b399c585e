//! Ingestion scenarios against the scripted ledger and the memory store

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use super::*;
use crate::config::FetcherConfig;
use crate::constants::{ACTIVITIES_KEY, JUPITER_PERP_VAULT_AUTHORITY};
use crate::errors::{RpcError, TrackerError};
use crate::rpc::scripted::ScriptedLedger;
use crate::rpc::{ClientResolver, SignatureInfo};
use crate::storage::{load_json, MemoryStore};
use crate::transactions::fixtures::{plain_transfer, TxBuilder, USDC_MINT, WALLET_A, WALLET_B};
use crate::transactions::program_ids::JUPITER_V6_PROGRAM_ID;
use crate::transactions::{Activity, ActivityType, WalletFetcher};
use crate::wallets::TrackedWallet;

const ENDPOINT: &str = "https://rpc.test";

struct Harness {
    ledger: Arc<ScriptedLedger>,
    store: Arc<MemoryStore>,
    ingestor: ActivityIngestor,
}

fn harness_with(ledger: Arc<ScriptedLedger>, store: Arc<MemoryStore>, history: ActivityHistory) -> Harness {
    let resolver = Arc::new(ClientResolver::fixed(ledger.clone()));
    let ingestor = ActivityIngestor::new(
        store.clone(),
        resolver,
        WalletFetcher::new(FetcherConfig::default()),
        Arc::new(RwLock::new(history)),
    );
    Harness { ledger, store, ingestor }
}

fn harness() -> Harness {
    harness_with(
        Arc::new(ScriptedLedger::new(ENDPOINT)),
        Arc::new(MemoryStore::new()),
        ActivityHistory::new(500),
    )
}

fn wallet(address: &str, label: &str) -> TrackedWallet {
    TrackedWallet::new(address, label, 0)
}

/// Serve `sigs` for `address`, each backed by a plain transfer
fn script_transfers(ledger: &ScriptedLedger, address: &str, sigs: &[(&str, i64)]) {
    ledger.set_signatures(
        address,
        sigs.iter().map(|(s, t)| SignatureInfo::new(s, Some(*t))).collect(),
    );
    for (sig, _) in sigs {
        ledger.add_transaction(sig, plain_transfer(address));
    }
}

async fn persisted(store: &MemoryStore) -> Vec<Activity> {
    load_json(store, ACTIVITIES_KEY).await.unwrap().unwrap_or_default()
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_three_plain_transfers_from_empty_history() {
    let h = harness();
    script_transfers(&h.ledger, WALLET_A, &[("s3", 300), ("s2", 200), ("s1", 100)]);

    let report = h
        .ingestor
        .ingest_all(&[wallet(WALLET_A, "Whale")], ENDPOINT)
        .await
        .unwrap();

    assert_eq!(report.new_activities, 3);
    assert_eq!(report.history_len, 3);
    assert!(report.persisted);

    let stored = persisted(&h.store).await;
    assert_eq!(stored.len(), 3);
    assert!(stored.iter().all(|a| a.activity_type == ActivityType::Transfer));
    assert!(stored.iter().all(|a| !a.is_jupiter_perp));
}

#[tokio::test(start_paused = true)]
async fn test_perp_signal_marks_only_its_transaction() {
    let h = harness();
    h.ledger.set_signatures(
        WALLET_A,
        vec![
            SignatureInfo::new("perp", Some(300)),
            SignatureInfo::new("swap", Some(200)),
            SignatureInfo::new("plain", Some(100)),
        ],
    );
    h.ledger.add_transaction(
        "perp",
        TxBuilder::new()
            .account_keys(&[WALLET_A])
            .post_token(2, USDC_MINT, JUPITER_PERP_VAULT_AUTHORITY, 50.0, 6)
            .build(),
    );
    h.ledger.add_transaction(
        "swap",
        TxBuilder::new()
            .account_keys(&[WALLET_A])
            .instruction(JUPITER_V6_PROGRAM_ID)
            .build(),
    );
    h.ledger.add_transaction("plain", plain_transfer(WALLET_A));

    h.ingestor
        .ingest_all(&[wallet(WALLET_A, "Whale")], ENDPOINT)
        .await
        .unwrap();

    let history = h.ingestor.recent(10).await;
    let by_sig = |sig: &str| history.iter().find(|a| a.signature == sig).unwrap().clone();

    let perp = by_sig("perp");
    assert!(perp.is_jupiter_perp);
    assert_eq!(perp.activity_type, ActivityType::JupiterPerp);
    assert_eq!(by_sig("swap").activity_type, ActivityType::Swap);
    assert_eq!(by_sig("plain").activity_type, ActivityType::Transfer);
    assert!(!by_sig("swap").is_jupiter_perp);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limited_transaction_is_skipped_and_retried_next_cycle() {
    let h = harness();
    script_transfers(&h.ledger, WALLET_A, &[("s3", 300), ("s2", 200), ("s1", 100)]);
    h.ledger
        .fail_transaction_once("s2", RpcError::RateLimited("429 Too Many Requests".into()));
    let wallets = [wallet(WALLET_A, "Whale")];
    let started = Instant::now();

    let report = h.ingestor.ingest_all(&wallets, ENDPOINT).await.unwrap();
    assert_eq!(report.new_activities, 2);

    // 500ms pacing, 3s cooldown after the throttled fetch, then pacing again
    let calls = h.ledger.calls();
    let tx_times: Vec<Duration> = calls
        .iter()
        .filter(|c| c.method == "getTransaction")
        .map(|c| c.at - started)
        .collect();
    assert_eq!(
        tx_times,
        vec![
            Duration::from_millis(500),
            Duration::from_millis(1000),
            Duration::from_millis(4500),
        ]
    );

    {
        let state = h.ingestor.state();
        let state = state.read().await;
        assert!(state.is_known("s3"));
        assert!(!state.is_known("s2"));
        assert!(state.is_known("s1"));
    }

    let report = h.ingestor.ingest_all(&wallets, ENDPOINT).await.unwrap();
    assert_eq!(report.new_activities, 1);
    assert_eq!(report.history_len, 3);
    assert_eq!(h.ledger.transaction_calls().last().map(String::as_str), Some("s2"));
}

// =============================================================================
// PROPERTIES
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_reingest_is_idempotent_and_does_not_write() {
    let h = harness();
    script_transfers(&h.ledger, WALLET_A, &[("s2", 200), ("s1", 100)]);
    let wallets = [wallet(WALLET_A, "Whale")];

    h.ingestor.ingest_all(&wallets, ENDPOINT).await.unwrap();
    let writes = h.store.write_count();
    let fetched = h.ledger.transaction_calls().len();

    let report = h.ingestor.ingest_all(&wallets, ENDPOINT).await.unwrap();
    assert_eq!(report.new_activities, 0);
    assert!(!report.persisted);
    assert_eq!(h.store.write_count(), writes);
    assert_eq!(h.ledger.transaction_calls().len(), fetched);
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_cycles_persist_even_when_merge_adds_nothing() {
    let h = harness();
    script_transfers(&h.ledger, WALLET_A, &[("s1", 100)]);
    let wallets = [wallet(WALLET_A, "Whale")];

    // Both cycles snapshot an empty known set, so both fetch s1
    let (first, second) = tokio::join!(
        h.ingestor.ingest_all(&wallets, ENDPOINT),
        h.ingestor.ingest_all(&wallets, ENDPOINT)
    );
    let (first, second) = (first.unwrap(), second.unwrap());

    let mut added: Vec<usize> = vec![first.new_activities, second.new_activities];
    added.sort();
    assert_eq!(added, vec![0, 1]);
    assert!(first.persisted && second.persisted);
    assert_eq!(h.store.write_count(), 2);
    assert_eq!(h.ledger.transaction_calls().len(), 2);

    let stored = persisted(&h.store).await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, format!("s1-{}", WALLET_A));
}

#[tokio::test(start_paused = true)]
async fn test_report_names_only_the_merged_activities() {
    let h = harness();
    let wallets = [wallet(WALLET_A, "Whale")];
    script_transfers(&h.ledger, WALLET_A, &[("late", 900)]);
    h.ingestor.ingest_all(&wallets, ENDPOINT).await.unwrap();

    // An older transaction surfaces after a newer one is already in history
    script_transfers(&h.ledger, WALLET_A, &[("late", 900), ("early", 100)]);
    let report = h.ingestor.ingest_all(&wallets, ENDPOINT).await.unwrap();

    assert_eq!(report.new_ids, vec![format!("early-{}", WALLET_A)]);
    assert_eq!(report.new_activities, 1);
    assert_eq!(h.ingestor.recent(1).await[0].signature, "late");
}

#[tokio::test(start_paused = true)]
async fn test_shared_signature_yields_one_activity_per_wallet() {
    let h = harness();
    script_transfers(&h.ledger, WALLET_A, &[("shared", 100)]);
    h.ledger
        .set_signatures(WALLET_B, vec![SignatureInfo::new("shared", Some(100))]);

    h.ingestor
        .ingest_all(&[wallet(WALLET_A, "A"), wallet(WALLET_B, "B")], ENDPOINT)
        .await
        .unwrap();

    let history = h.ingestor.recent(10).await;
    assert_eq!(history.len(), 2);
    let mut ids: Vec<String> = history.iter().map(|a| a.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&format!("shared-{}", WALLET_A)));
    assert!(ids.contains(&format!("shared-{}", WALLET_B)));
}

#[tokio::test(start_paused = true)]
async fn test_history_is_capped_and_sorted() {
    let ledger = Arc::new(ScriptedLedger::new(ENDPOINT));
    let store = Arc::new(MemoryStore::new());
    let h = harness_with(ledger, store, ActivityHistory::new(4));
    let wallets = [wallet(WALLET_A, "Whale")];

    script_transfers(&h.ledger, WALLET_A, &[("s3", 30), ("s2", 20), ("s1", 10)]);
    h.ingestor.ingest_all(&wallets, ENDPOINT).await.unwrap();

    script_transfers(&h.ledger, WALLET_A, &[("s5", 50), ("s4", 40), ("s3", 30)]);
    let report = h.ingestor.ingest_all(&wallets, ENDPOINT).await.unwrap();
    assert_eq!(report.new_activities, 2);
    assert_eq!(report.history_len, 4);

    let stored = persisted(&h.store).await;
    let times: Vec<i64> = stored.iter().map(|a| a.timestamp).collect();
    assert_eq!(times, vec![50_000, 40_000, 30_000, 20_000]);
}

#[tokio::test(start_paused = true)]
async fn test_wallet_fetches_never_overlap() {
    let h = harness();
    script_transfers(&h.ledger, WALLET_A, &[("a2", 20), ("a1", 10)]);
    script_transfers(&h.ledger, WALLET_B, &[("b2", 25), ("b1", 15)]);

    h.ingestor
        .ingest_all(&[wallet(WALLET_A, "A"), wallet(WALLET_B, "B")], ENDPOINT)
        .await
        .unwrap();

    assert_eq!(h.ledger.max_in_flight(), 1);
    assert_eq!(h.ledger.transaction_calls().len(), 4);
}

// =============================================================================
// FAILURES
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_failed_wallet_does_not_stop_the_others() {
    let h = harness();
    script_transfers(&h.ledger, WALLET_B, &[("b1", 10)]);
    h.ledger.fail_signatures_once(
        WALLET_A,
        RpcError::Transport("connection refused".into()),
    );

    let report = h
        .ingestor
        .ingest_all(
            &[wallet(WALLET_A, "A"), wallet("garbage", "Bad"), wallet(WALLET_B, "B")],
            ENDPOINT,
        )
        .await
        .unwrap();

    assert_eq!(report.wallets_failed, 2);
    assert_eq!(report.wallets_processed, 1);
    assert_eq!(report.new_activities, 1);
}

#[tokio::test(start_paused = true)]
async fn test_unusable_endpoint_fails_the_cycle() {
    let store = Arc::new(MemoryStore::new());
    let ingestor = ActivityIngestor::new(
        store,
        Arc::new(ClientResolver::json_rpc(Duration::from_secs(5))),
        WalletFetcher::default(),
        Arc::new(RwLock::new(ActivityHistory::new(500))),
    );

    let result = ingestor
        .ingest_all(&[wallet(WALLET_A, "A")], "ftp://nowhere")
        .await;
    assert!(matches!(result, Err(TrackerError::Rpc(RpcError::InvalidEndpoint(_)))));
}

#[tokio::test(start_paused = true)]
async fn test_persistence_failure_keeps_memory_ahead() {
    let h = harness();
    script_transfers(&h.ledger, WALLET_A, &[("s1", 10)]);
    h.store.set_fail_writes(true);

    let result = h.ingestor.ingest_all(&[wallet(WALLET_A, "A")], ENDPOINT).await;
    assert!(matches!(result, Err(TrackerError::Storage(_))));

    assert_eq!(h.ingestor.recent(10).await.len(), 1);
    assert!(persisted(&h.store).await.is_empty());
}

// =============================================================================
// LIFECYCLE
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_restart_seeds_known_signatures_from_store() {
    let first = harness();
    script_transfers(&first.ledger, WALLET_A, &[("s2", 20), ("s1", 10)]);
    first
        .ingestor
        .ingest_all(&[wallet(WALLET_A, "A")], ENDPOINT)
        .await
        .unwrap();

    let history = load_history(first.store.as_ref(), 500).await.unwrap();
    assert!(history.is_known("s1") && history.is_known("s2"));

    let restarted = harness_with(first.ledger.clone(), first.store.clone(), history);
    let writes = restarted.store.write_count();
    let report = restarted
        .ingestor
        .ingest_all(&[wallet(WALLET_A, "A")], ENDPOINT)
        .await
        .unwrap();
    assert_eq!(report.new_activities, 0);
    assert_eq!(report.history_len, 2);
    assert_eq!(restarted.store.write_count(), writes);
}

#[tokio::test]
async fn test_unreadable_history_starts_empty() {
    let store = MemoryStore::new();
    crate::storage::KvStore::set(&store, ACTIVITIES_KEY, "{\"oops\"")
        .await
        .unwrap();
    let history = load_history(&store, 500).await.unwrap();
    assert!(history.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_clear_forgets_signatures() {
    let h = harness();
    script_transfers(&h.ledger, WALLET_A, &[("s1", 10)]);
    let wallets = [wallet(WALLET_A, "A")];
    h.ingestor.ingest_all(&wallets, ENDPOINT).await.unwrap();

    h.ingestor.clear_activities().await.unwrap();
    assert!(persisted(&h.store).await.is_empty());
    assert!(h.ingestor.recent(10).await.is_empty());

    let report = h.ingestor.ingest_all(&wallets, ENDPOINT).await.unwrap();
    assert_eq!(report.new_activities, 1);
}
