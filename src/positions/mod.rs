/// Perpetuals positions of tracked wallets
///
/// - `api`: Jupiter perps API client and response normalization
/// - `stats`: exposure totals and the cross-wallet position list
/// - `types`: normalized position records
pub mod api;
pub mod stats;
pub mod types;

pub use api::{fetch_all_positions, parse_positions_response, PositionSource, PositionsClient};
pub use stats::{aggregate, all_positions_sorted, LabeledPosition, PositionStats, TokenExposure};
pub use types::{PerpPosition, PositionSide, WalletPositions};
