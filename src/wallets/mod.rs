//! Tracked wallet management
//!
//! Keeps the user-curated list of wallet addresses to monitor, persisted as a
//! JSON array under the `wallets` key.
//!
//! ## Features
//! - Address validation (base58, 32-byte public key)
//! - Duplicate rejection and default labels
//! - Label editing and removal
//! - JSON import/export
//! - Wallet count broadcast for the poll scheduler
//!
//! ## Usage
//! ```rust,ignore
//! let book = WalletBook::load(store).await?;
//! book.add("7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU", Some("Whale")).await?;
//! let count_rx = book.watch_count();
//! ```

mod import;
mod manager;
mod types;

pub use import::{parse_import, IMPORT_DEFAULT_LABEL};
pub use manager::WalletBook;
pub use types::TrackedWallet;
pub(crate) use types::short_address;

use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

/// True when `address` decodes to a 32-byte Solana public key
pub fn is_valid_solana_address(address: &str) -> bool {
    Pubkey::from_str(address).is_ok()
}
