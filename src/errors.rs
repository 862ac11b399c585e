/// Error taxonomy for the tracker
///
/// Transport-level failures (`RpcError`) and persistence failures
/// (`StorageError`) are kept separate; `TrackerError` is what the public
/// operations return.
use thiserror::Error;

// =============================================================================
// RPC ERRORS
// =============================================================================

#[derive(Error, Debug, Clone)]
pub enum RpcError {
    #[error("Rate limited: {0}")] RateLimited(String),

    #[error("Transport error: {0}")] Transport(String),

    #[error("RPC error {code}: {message}")] Rpc {
        code: i64,
        message: String,
    },

    #[error("Invalid response: {0}")] InvalidResponse(String),

    #[error("Invalid endpoint: {0}")] InvalidEndpoint(String),
}

impl RpcError {
    /// True for upstream throttling (HTTP 429, JSON-RPC 429/-32429, "too many requests")
    pub fn is_rate_limit(&self) -> bool {
        match self {
            RpcError::RateLimited(_) => true,
            RpcError::Rpc { code, message } => {
                *code == 429 || *code == -32429 || is_rate_limit_message(message)
            }
            RpcError::Transport(message) => is_rate_limit_message(message),
            _ => false,
        }
    }
}

/// Check if an error message describes a rate limit
pub fn is_rate_limit_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("429") || lower.contains("too many requests") || lower.contains("rate limit")
}

impl From<reqwest::Error> for RpcError {
    fn from(err: reqwest::Error) -> Self {
        if err.status() == Some(reqwest::StatusCode::TOO_MANY_REQUESTS) {
            RpcError::RateLimited(err.to_string())
        } else {
            RpcError::Transport(err.to_string())
        }
    }
}

// =============================================================================
// STORAGE ERRORS
// =============================================================================

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")] Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")] Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")] Database(#[from] rusqlite::Error),
}

// =============================================================================
// TRACKER ERRORS
// =============================================================================

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Configuration error: {0}")] Config(String),

    #[error("Storage error: {0}")] Storage(#[from] StorageError),

    #[error("RPC error: {0}")] Rpc(#[from] RpcError),

    #[error("Invalid Solana address: {0}")] InvalidAddress(String),

    #[error("Wallet already tracked: {0}")] DuplicateWallet(String),

    #[error("Wallet not found: {0}")] WalletNotFound(String),

    #[error("Positions error: {0}")] Positions(String),

    #[error("{0}")] ImportFormat(String),
}
