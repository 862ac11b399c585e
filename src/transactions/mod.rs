/// Wallet activity: fetching, classification and transfer extraction
///
/// - `fetcher`: per-wallet signature listing and paced transaction fetches
/// - `classify`: Jupiter perps detection and activity type
/// - `transfers`: token and native SOL transfers from balance deltas
/// - `types`: the persisted `Activity` record
pub mod classify;
pub mod fetcher;
pub mod program_ids;
pub mod transfers;
pub mod types;

#[cfg(test)]
pub mod fixtures;

pub use classify::{classify, Classification};
pub use fetcher::{build_activity, WalletFetcher};
pub use transfers::extract_transfers;
pub use types::{Activity, ActivityType, TokenTransfer, TransferDirection};
