/// Global constants used across CopyTrader
///
/// System-wide values that are not configurable.

// ============================================================================
// SOLANA BLOCKCHAIN CONSTANTS
// ============================================================================

/// SOL token mint address (wrapped SOL), used as the mint of native transfers
pub const SOL_MINT: &str = "So11111111111111111111111111111111111111112";

/// Number of decimal places for SOL
pub const SOL_DECIMALS: u8 = 9;

pub const SOL_SYMBOL: &str = "SOL";

/// Lamports per SOL (10^9)
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Jupiter perpetuals vault authority, the fingerprint of perps activity
pub const JUPITER_PERP_VAULT_AUTHORITY: &str = "AVzP2GeRmqGphJsMxWoqjpUifPpCret7LqWhD8NWQK49";

/// Balance changes at or below this magnitude are ignored
pub const TRANSFER_EPSILON: f64 = 0.000001;

// ============================================================================
// KNOWN TOKENS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownToken {
    pub mint: &'static str,
    pub symbol: &'static str,
    pub decimals: u8,
    pub name: &'static str,
}

/// Display metadata for common mints
pub const KNOWN_TOKENS: &[KnownToken] = &[
    KnownToken { mint: SOL_MINT, symbol: "SOL", decimals: 9, name: "Solana" },
    // Stablecoins
    KnownToken { mint: "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v", symbol: "USDC", decimals: 6, name: "USD Coin" },
    KnownToken { mint: "Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB", symbol: "USDT", decimals: 6, name: "Tether USD" },
    KnownToken { mint: "USDSwr9ApdHk5bvJKMjzff41FfuX8bSxdKcR81vTwcA", symbol: "USDS", decimals: 6, name: "USDS" },
    // Liquid staking tokens
    KnownToken { mint: "mSoLzYCxHdYgdzU16g5QSh3i5K3z3KZK7ytfqcJm7So", symbol: "mSOL", decimals: 9, name: "Marinade SOL" },
    KnownToken { mint: "J1toso1uCk3RLmjorhTtrVwY9HJ7X8V9yYac6Y7kGCPn", symbol: "jitoSOL", decimals: 9, name: "Jito SOL" },
    KnownToken { mint: "bSo13r4TkiE4KumL71LsHTPpL2euBYLFx6h9HP3piy1", symbol: "bSOL", decimals: 9, name: "BlazeStake SOL" },
    // Major tokens
    KnownToken { mint: "JUPyiwrYJFskUPiHa7hkeR8VUtAeFoSYbKedZNsDvCN", symbol: "JUP", decimals: 6, name: "Jupiter" },
    KnownToken { mint: "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263", symbol: "BONK", decimals: 5, name: "Bonk" },
    KnownToken { mint: "EKpQGSJtjMFqKZ9KQanSqYXRcF8fBopzLHYxdM65zcjm", symbol: "WIF", decimals: 6, name: "dogwifhat" },
    KnownToken { mint: "HZ1JovNiVvGrGNiiYvEozEVgZ58xaU3RKwX8eACQBCt3", symbol: "PYTH", decimals: 6, name: "Pyth Network" },
    KnownToken { mint: "rndrizKT3MK1iimdxRdWabcF7Zg7AR5T4nud4EkHBof", symbol: "RENDER", decimals: 8, name: "Render" },
    KnownToken { mint: "7vfCXTUXx5WJV5JADk17DUJ4ksgau7utNKj4b963voxs", symbol: "WETH", decimals: 8, name: "Wrapped ETH" },
    KnownToken { mint: "3NZ9JMVBmGAqocybic2c7LQCJScmgsAZ6vQqTDzcqmJh", symbol: "WBTC", decimals: 8, name: "Wrapped BTC" },
    KnownToken { mint: "hntyVP6YFm1Hg25TN9WGLqM12b8TQmcknKrdu1oxWux", symbol: "HNT", decimals: 8, name: "Helium" },
    KnownToken { mint: "SHDWyBxihqiCj6YekG2GUr7wqKLeLAMK1gHZck9pL6y", symbol: "SHDW", decimals: 9, name: "Shadow Token" },
    KnownToken { mint: "RAYdGMVVLRxLnPpX7n4Rf85Xa3tWg5L5EB9Bp3RD7HB", symbol: "RAY", decimals: 6, name: "Raydium" },
    KnownToken { mint: "orcaEKTdK7LKz57vaAYr9QeNsVEPfiu6QeMU1kektZE", symbol: "ORCA", decimals: 6, name: "Orca" },
    // Jupiter perps LP
    KnownToken { mint: "27G8MtK7VtTcCHkpASjSDdkWWYfoqT6ggEuKidVJidD4", symbol: "JLP", decimals: 6, name: "Jupiter LP" },
];

/// Look up display metadata for a mint
pub fn known_token(mint: &str) -> Option<&'static KnownToken> {
    KNOWN_TOKENS.iter().find(|t| t.mint == mint)
}

/// Symbol for a mint, if it is one of the known tokens
pub fn known_symbol(mint: &str) -> Option<&'static str> {
    known_token(mint).map(|t| t.symbol)
}

// ============================================================================
// PERSISTENCE KEYS
// ============================================================================

pub const WALLETS_KEY: &str = "wallets";
pub const SETTINGS_KEY: &str = "settings";
pub const ACTIVITIES_KEY: &str = "activities";
