// Per-wallet activity fetching
//
// Pulls the newest signatures of one wallet, drops the ones already known,
// and fetches the rest one at a time with a fixed pause before each request.
// Transaction fetches for a wallet are strictly sequential: the public RPC
// endpoints this runs against throttle bursts, and the pacing below is the
// whole rate-limit contract.

use std::collections::HashSet;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::FetcherConfig;
use crate::errors::{RpcError, TrackerError};
use crate::logger::{self, LogTag};
use crate::rpc::types::{ParsedTransaction, SignatureInfo};
use crate::rpc::LedgerClient;
use crate::transactions::classify::classify;
use crate::transactions::transfers::extract_transfers;
use crate::transactions::types::Activity;
use crate::wallets::is_valid_solana_address;

// =============================================================================
// WALLET FETCHER
// =============================================================================

/// Fetches and classifies new activity for one wallet at a time
#[derive(Debug, Clone, Default)]
pub struct WalletFetcher {
    config: FetcherConfig,
}

impl WalletFetcher {
    pub fn new(config: FetcherConfig) -> Self {
        Self { config }
    }

    /// New activities for `wallet_address`, most recent first
    ///
    /// Signatures in `known_signatures` are skipped. Individual transaction
    /// failures are logged and skipped; only an invalid address or a failed
    /// signature listing fail the wallet.
    pub async fn fetch(
        &self,
        client: &dyn LedgerClient,
        wallet_address: &str,
        wallet_label: &str,
        known_signatures: &HashSet<String>,
    ) -> Result<Vec<Activity>, TrackerError> {
        if !is_valid_solana_address(wallet_address) {
            return Err(TrackerError::InvalidAddress(wallet_address.to_string()));
        }

        let signatures = self.list_signatures_with_retry(client, wallet_address).await?;
        let total = signatures.len();

        let new_signatures: Vec<SignatureInfo> = signatures
            .into_iter()
            .filter(|info| !known_signatures.contains(&info.signature))
            .collect();

        if new_signatures.is_empty() {
            logger::debug(
                LogTag::Fetcher,
                &format!("{}: {} signatures, none new", wallet_label, total),
            );
            return Ok(Vec::new());
        }

        logger::debug(
            LogTag::Fetcher,
            &format!(
                "{}: {} new of {} signatures",
                wallet_label,
                new_signatures.len(),
                total
            ),
        );

        let mut activities = Vec::with_capacity(new_signatures.len());

        // One at a time, never concurrently
        for info in &new_signatures {
            sleep(Duration::from_millis(self.config.transaction_delay_ms)).await;

            match client.get_parsed_transaction(&info.signature).await {
                Ok(Some(tx)) => {
                    activities.push(build_activity(info, &tx, wallet_address, wallet_label));
                }
                Ok(None) => {
                    logger::debug(
                        LogTag::Fetcher,
                        &format!("Transaction {} not available yet", info.signature),
                    );
                }
                Err(e) if e.is_rate_limit() => {
                    logger::warning(
                        LogTag::Fetcher,
                        &format!(
                            "Rate limited fetching {}, cooling down {}ms and skipping",
                            info.signature, self.config.transaction_rate_limit_cooldown_ms
                        ),
                    );
                    sleep(Duration::from_millis(
                        self.config.transaction_rate_limit_cooldown_ms,
                    ))
                    .await;
                }
                Err(e) => {
                    logger::error(
                        LogTag::Fetcher,
                        &format!("Error fetching tx {}: {}", info.signature, e),
                    );
                }
            }
        }

        Ok(activities)
    }

    /// List signatures, retrying once after a cooldown when rate limited
    async fn list_signatures_with_retry(
        &self,
        client: &dyn LedgerClient,
        wallet_address: &str,
    ) -> Result<Vec<SignatureInfo>, RpcError> {
        let limit = self.config.signature_limit;

        match client.list_recent_signatures(wallet_address, limit).await {
            Ok(signatures) => Ok(signatures),
            Err(e) if e.is_rate_limit() => {
                logger::warning(
                    LogTag::Fetcher,
                    &format!(
                        "Rate limited listing signatures, waiting {}ms before retry",
                        self.config.signatures_rate_limit_cooldown_ms
                    ),
                );
                sleep(Duration::from_millis(
                    self.config.signatures_rate_limit_cooldown_ms,
                ))
                .await;
                client.list_recent_signatures(wallet_address, limit).await
            }
            Err(e) => Err(e),
        }
    }
}

/// Assemble the activity record for one fetched transaction
pub fn build_activity(
    info: &SignatureInfo,
    tx: &ParsedTransaction,
    wallet_address: &str,
    wallet_label: &str,
) -> Activity {
    let classification = classify(tx);
    let transfers = extract_transfers(tx, wallet_address);
    let block_time = info.block_time.or(tx.block_time).unwrap_or(0);
    let meta = tx.meta.as_ref();

    Activity {
        id: Activity::make_id(&info.signature, wallet_address),
        signature: info.signature.clone(),
        wallet_address: wallet_address.to_string(),
        wallet_label: wallet_label.to_string(),
        timestamp: block_time * 1000,
        activity_type: classification.activity_type,
        transfers,
        is_jupiter_perp: classification.is_jupiter_perp,
        fee: meta.map(|m| m.fee).unwrap_or(0) as f64 / crate::constants::LAMPORTS_PER_SOL as f64,
        success: meta.map(|m| m.err.is_none()).unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::JUPITER_PERP_VAULT_AUTHORITY;
    use crate::rpc::scripted::ScriptedLedger;
    use crate::transactions::fixtures::{plain_transfer, TxBuilder, USDC_MINT, WALLET_A};
    use crate::transactions::types::ActivityType;
    use tokio::time::Instant;

    const ENDPOINT: &str = "https://rpc.test";

    fn ledger_with(sigs: &[(&str, i64)]) -> ScriptedLedger {
        let ledger = ScriptedLedger::new(ENDPOINT);
        ledger.set_signatures(
            WALLET_A,
            sigs.iter().map(|(s, t)| SignatureInfo::new(s, Some(*t))).collect(),
        );
        for (sig, _) in sigs {
            ledger.add_transaction(sig, plain_transfer(WALLET_A));
        }
        ledger
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetches_in_signature_order_with_pacing() {
        let ledger = ledger_with(&[("s3", 300), ("s2", 200), ("s1", 100)]);
        let fetcher = WalletFetcher::default();
        let started = Instant::now();

        let activities = fetcher
            .fetch(&ledger, WALLET_A, "Whale", &HashSet::new())
            .await
            .unwrap();

        let sigs: Vec<&str> = activities.iter().map(|a| a.signature.as_str()).collect();
        assert_eq!(sigs, vec!["s3", "s2", "s1"]);
        assert_eq!(activities[0].timestamp, 300_000);
        assert_eq!(activities[0].id, format!("s3-{}", WALLET_A));
        assert_eq!(activities[0].wallet_label, "Whale");
        assert!(activities.iter().all(|a| a.activity_type == ActivityType::Transfer));

        // 500ms before each of the three fetches, never overlapping
        let calls = ledger.calls();
        let tx_calls: Vec<_> = calls.iter().filter(|c| c.method == "getTransaction").collect();
        assert_eq!(tx_calls.len(), 3);
        assert_eq!(tx_calls[0].at - started, Duration::from_millis(500));
        assert_eq!(tx_calls[1].at - tx_calls[0].at, Duration::from_millis(500));
        assert_eq!(tx_calls[2].at - tx_calls[1].at, Duration::from_millis(500));
        assert_eq!(ledger.max_in_flight(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_requests_only_five_signatures() {
        let sigs: Vec<(String, i64)> = (0..8).map(|i| (format!("sig{}", i), 1000 - i)).collect();
        let refs: Vec<(&str, i64)> = sigs.iter().map(|(s, t)| (s.as_str(), *t)).collect();
        let ledger = ledger_with(&refs);

        let activities = WalletFetcher::default()
            .fetch(&ledger, WALLET_A, "Whale", &HashSet::new())
            .await
            .unwrap();
        assert_eq!(activities.len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_known_signatures_are_not_fetched() {
        let ledger = ledger_with(&[("s3", 300), ("s2", 200), ("s1", 100)]);
        let known: HashSet<String> = ["s3".to_string(), "s1".to_string()].into_iter().collect();

        let activities = WalletFetcher::default()
            .fetch(&ledger, WALLET_A, "Whale", &known)
            .await
            .unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(ledger.transaction_calls(), vec!["s2".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_known_returns_empty_without_fetching() {
        let ledger = ledger_with(&[("s1", 100)]);
        let known: HashSet<String> = ["s1".to_string()].into_iter().collect();

        let activities = WalletFetcher::default()
            .fetch(&ledger, WALLET_A, "Whale", &known)
            .await
            .unwrap();
        assert!(activities.is_empty());
        assert!(ledger.transaction_calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_signature_rate_limit_waits_and_retries_once() {
        let ledger = ledger_with(&[("s1", 100)]);
        ledger.fail_signatures_once(WALLET_A, RpcError::RateLimited("429".into()));
        let started = Instant::now();

        let activities = WalletFetcher::default()
            .fetch(&ledger, WALLET_A, "Whale", &HashSet::new())
            .await
            .unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(ledger.signature_calls(), 2);

        let calls = ledger.calls();
        assert_eq!(calls[1].at - started, Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_signature_rate_limit_fails_wallet() {
        let ledger = ledger_with(&[("s1", 100)]);
        ledger.fail_signatures_once(WALLET_A, RpcError::RateLimited("429".into()));
        ledger.fail_signatures_once(WALLET_A, RpcError::RateLimited("429".into()));

        let result = WalletFetcher::default()
            .fetch(&ledger, WALLET_A, "Whale", &HashSet::new())
            .await;
        assert!(matches!(result, Err(TrackerError::Rpc(_))));
        assert_eq!(ledger.signature_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_signature_error_is_not_retried() {
        let ledger = ledger_with(&[("s1", 100)]);
        ledger.fail_signatures_once(
            WALLET_A,
            RpcError::Rpc { code: -32602, message: "Invalid param".into() },
        );

        let result = WalletFetcher::default()
            .fetch(&ledger, WALLET_A, "Whale", &HashSet::new())
            .await;
        assert!(result.is_err());
        assert_eq!(ledger.signature_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transaction_errors_and_nulls_are_skipped() {
        let ledger = ledger_with(&[("s3", 300), ("s2", 200)]);
        ledger.set_signatures(
            WALLET_A,
            vec![
                SignatureInfo::new("s3", Some(300)),
                SignatureInfo::new("missing", Some(250)),
                SignatureInfo::new("s2", Some(200)),
            ],
        );
        ledger.fail_transaction_once("s3", RpcError::Transport("connection reset".into()));

        let activities = WalletFetcher::default()
            .fetch(&ledger, WALLET_A, "Whale", &HashSet::new())
            .await
            .unwrap();
        let sigs: Vec<&str> = activities.iter().map(|a| a.signature.as_str()).collect();
        assert_eq!(sigs, vec!["s2"]);
        assert_eq!(ledger.transaction_calls().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_address_fails_before_any_call() {
        let ledger = ScriptedLedger::new(ENDPOINT);
        let result = WalletFetcher::default()
            .fetch(&ledger, "not-a-wallet", "Bad", &HashSet::new())
            .await;
        assert!(matches!(result, Err(TrackerError::InvalidAddress(_))));
        assert!(ledger.calls().is_empty());
    }

    #[test]
    fn test_build_activity_fields() {
        let tx = TxBuilder::new()
            .block_time(1_650_000_000)
            .account_keys(&[WALLET_A])
            .post_token(1, USDC_MINT, JUPITER_PERP_VAULT_AUTHORITY, 10.0, 6)
            .native_balances(&[1_000_000_000], &[999_990_000])
            .fee(10_000)
            .failed()
            .build();

        let info = SignatureInfo::new("perp", None);
        let activity = build_activity(&info, &tx, WALLET_A, "Whale");
        assert_eq!(activity.activity_type, ActivityType::JupiterPerp);
        assert!(activity.is_jupiter_perp);
        assert!(!activity.success);
        assert!((activity.fee - 0.00001).abs() < 1e-15);
        // signature listing had no block time, transaction did
        assert_eq!(activity.timestamp, 1_650_000_000_000);
        assert!(activity.transfers.is_empty());
    }

    #[test]
    fn test_unknown_block_time_gives_zero_timestamp() {
        let tx = TxBuilder::new().build();
        let activity = build_activity(&SignatureInfo::new("s", None), &tx, WALLET_A, "W");
        assert_eq!(activity.timestamp, 0);
        assert!(activity.success);
    }
}
