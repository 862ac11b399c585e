/// Configuration schemas - all config structures defined once with defaults
///
/// Each struct is defined using the config_struct! macro which provides:
/// - Single-source definition (no repetition)
/// - Embedded defaults
/// - Serde support
use crate::config_struct;

// ============================================================================
// RPC CONFIGURATION
// ============================================================================

config_struct! {
    /// Solana JSON-RPC endpoint configuration
    pub struct RpcConfig {
        /// Endpoint used when settings carry none
        default_endpoint: String = "https://rpc.ankr.com/solana".to_string(),
        /// Endpoints offered as alternatives to the operator
        backup_endpoints: Vec<String> = vec![
            "https://rpc.ankr.com/solana".to_string(),
            "https://api.mainnet-beta.solana.com".to_string(),
        ],
        /// HTTP request timeout
        request_timeout_secs: u64 = 30,
    }
}

// ============================================================================
// POLLING CONFIGURATION
// ============================================================================

config_struct! {
    /// Poll scheduler bounds
    pub struct PollingConfig {
        default_interval_secs: u64 = 60,
        min_interval_secs: u64 = 10,
        max_interval_secs: u64 = 300,
    }
}

impl PollingConfig {
    /// Bounds must form a non-empty range
    pub fn validate(&self) -> Result<(), String> {
        if self.min_interval_secs > self.max_interval_secs {
            return Err(format!(
                "polling.min_interval_secs ({}) exceeds polling.max_interval_secs ({})",
                self.min_interval_secs, self.max_interval_secs
            ));
        }
        Ok(())
    }
}

// ============================================================================
// FETCHER CONFIGURATION
// ============================================================================

config_struct! {
    /// Per-wallet fetch pacing and history bounds
    pub struct FetcherConfig {
        /// Signatures requested per wallet per cycle
        signature_limit: usize = 5,
        /// Activities shown by default in listings
        display_fetch_limit: usize = 20,
        /// Pause before every transaction fetch
        transaction_delay_ms: u64 = 500,
        /// Cooldown before the single signature-list retry
        signatures_rate_limit_cooldown_ms: u64 = 5000,
        /// Cooldown after a rate-limited transaction fetch (the transaction is skipped)
        transaction_rate_limit_cooldown_ms: u64 = 3000,
        /// Maximum activities kept in history
        history_cap: usize = 500,
    }
}

// ============================================================================
// STORAGE CONFIGURATION
// ============================================================================

config_struct! {
    /// Key-value store backend
    pub struct StorageConfig {
        /// "json" or "sqlite"
        backend: String = "json".to_string(),
    }
}

// ============================================================================
// POSITIONS CONFIGURATION
// ============================================================================

config_struct! {
    /// Perpetuals positions API
    pub struct PositionsConfig {
        api_base_url: String = "https://perps-api.jup.ag".to_string(),
        /// Pause between wallets when fetching all positions
        request_delay_ms: u64 = 200,
        /// Only positions in this market are kept
        market_symbol: String = "SOL".to_string(),
    }
}

// ============================================================================
// LOGGING CONFIGURATION
// ============================================================================

config_struct! {
    pub struct LoggingConfig {
        console: bool = true,
        file_enabled: bool = true,
    }
}

// ============================================================================
// ROOT CONFIGURATION
// ============================================================================

config_struct! {
    /// Main configuration structure
    pub struct Config {
        rpc: RpcConfig = RpcConfig::default(),
        polling: PollingConfig = PollingConfig::default(),
        fetcher: FetcherConfig = FetcherConfig::default(),
        storage: StorageConfig = StorageConfig::default(),
        positions: PositionsConfig = PositionsConfig::default(),
        logging: LoggingConfig = LoggingConfig::default(),
    }
}
