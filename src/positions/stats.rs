use serde::Serialize;
use std::collections::BTreeMap;

use super::api::canonical_symbol;
use super::types::{PerpPosition, PositionSide, WalletPositions};
use crate::wallets::TrackedWallet;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TokenExposure {
    pub long: f64,
    pub short: f64,
    pub pnl: f64,
}

/// Totals across every fetched wallet
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PositionStats {
    pub total_positions: usize,
    pub long_count: usize,
    pub short_count: usize,
    pub total_long_size: f64,
    pub total_short_size: f64,
    pub total_long_pnl: f64,
    pub total_short_pnl: f64,
    pub total_collateral: f64,
    pub by_token: BTreeMap<String, TokenExposure>,
}

impl PositionStats {
    pub fn total_size(&self) -> f64 {
        self.total_long_size + self.total_short_size
    }

    pub fn total_pnl(&self) -> f64 {
        self.total_long_pnl + self.total_short_pnl
    }

    /// Long share of total size in percent; 50 when there is no exposure
    pub fn long_ratio(&self) -> f64 {
        let total = self.total_size();
        if total > 0.0 {
            self.total_long_size / total * 100.0
        } else {
            50.0
        }
    }

    /// PnL as a percentage of collateral
    pub fn pnl_on_collateral(&self) -> f64 {
        if self.total_collateral > 0.0 {
            self.total_pnl() / self.total_collateral * 100.0
        } else {
            0.0
        }
    }
}

pub fn aggregate(wallets: &[WalletPositions]) -> PositionStats {
    let mut stats = PositionStats::default();

    for position in wallets.iter().flat_map(|w| w.positions.iter()) {
        stats.total_positions += 1;
        stats.total_collateral += position.collateral_usd;

        let exposure = stats
            .by_token
            .entry(canonical_symbol(&position.token).to_string())
            .or_default();

        match position.side {
            PositionSide::Long => {
                stats.long_count += 1;
                stats.total_long_size += position.size_usd;
                stats.total_long_pnl += position.pnl_usd;
                exposure.long += position.size_usd;
            }
            PositionSide::Short => {
                stats.short_count += 1;
                stats.total_short_size += position.size_usd;
                stats.total_short_pnl += position.pnl_usd;
                exposure.short += position.size_usd;
            }
        }
        exposure.pnl += position.pnl_usd;
    }

    stats
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabeledPosition {
    pub wallet_label: String,
    #[serde(flatten)]
    pub position: PerpPosition,
}

/// Every position with its wallet label, largest absolute size first
pub fn all_positions_sorted(
    fetched: &[WalletPositions],
    wallets: &[TrackedWallet],
) -> Vec<LabeledPosition> {
    let mut all: Vec<LabeledPosition> = Vec::new();

    for entry in fetched {
        let label = wallets
            .iter()
            .find(|w| w.address == entry.wallet_address)
            .map(|w| w.label.as_str())
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| crate::wallets::short_address(&entry.wallet_address))
            .to_string();

        all.extend(entry.positions.iter().map(|p| LabeledPosition {
            wallet_label: label.clone(),
            position: p.clone(),
        }));
    }

    all.sort_by(|a, b| b.position.size_usd.abs().total_cmp(&a.position.size_usd.abs()));
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(token: &str, side: PositionSide, size: f64, pnl: f64, collateral: f64) -> PerpPosition {
        PerpPosition {
            token: token.to_string(),
            side,
            size_usd: size,
            pnl_usd: pnl,
            collateral_usd: collateral,
            ..PerpPosition::default()
        }
    }

    fn fetched(address: &str, positions: Vec<PerpPosition>) -> WalletPositions {
        WalletPositions {
            wallet_address: address.to_string(),
            positions,
            last_fetched: 0,
            error: None,
        }
    }

    #[test]
    fn test_aggregate_totals() {
        let data = vec![
            fetched("a", vec![
                position("SOL", PositionSide::Long, 1000.0, 50.0, 100.0),
                position("wSOL", PositionSide::Short, 400.0, -20.0, 40.0),
            ]),
            fetched("b", vec![position("SOL", PositionSide::Short, 600.0, 10.0, 60.0)]),
        ];

        let stats = aggregate(&data);
        assert_eq!(stats.total_positions, 3);
        assert_eq!(stats.long_count, 1);
        assert_eq!(stats.short_count, 2);
        assert_eq!(stats.total_long_size, 1000.0);
        assert_eq!(stats.total_short_size, 1000.0);
        assert_eq!(stats.total_pnl(), 40.0);
        assert_eq!(stats.total_collateral, 200.0);
        assert_eq!(stats.long_ratio(), 50.0);
        assert!((stats.pnl_on_collateral() - 20.0).abs() < 1e-9);

        let sol = &stats.by_token["SOL"];
        assert_eq!(sol.long, 1000.0);
        assert_eq!(sol.short, 1000.0);
        assert_eq!(sol.pnl, 40.0);
        assert_eq!(stats.by_token.len(), 1);
    }

    #[test]
    fn test_empty_aggregate() {
        let stats = aggregate(&[]);
        assert_eq!(stats.total_positions, 0);
        assert_eq!(stats.long_ratio(), 50.0);
        assert_eq!(stats.pnl_on_collateral(), 0.0);
    }

    #[test]
    fn test_sorted_by_absolute_size_with_labels() {
        let tracked = vec![TrackedWallet::new("7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU", "Whale", 0)];
        let data = vec![
            fetched("7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU", vec![
                position("SOL", PositionSide::Long, 100.0, 0.0, 0.0),
            ]),
            fetched("9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM", vec![
                position("SOL", PositionSide::Short, -500.0, 0.0, 0.0),
                position("SOL", PositionSide::Long, 300.0, 0.0, 0.0),
            ]),
        ];

        let sorted = all_positions_sorted(&data, &tracked);
        let sizes: Vec<f64> = sorted.iter().map(|p| p.position.size_usd).collect();
        assert_eq!(sizes, vec![-500.0, 300.0, 100.0]);
        assert_eq!(sorted[0].wallet_label, "9WzDXwBb");
        assert_eq!(sorted[2].wallet_label, "Whale");
    }
}
