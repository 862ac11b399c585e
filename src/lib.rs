/// copytrader: Solana wallet activity tracker
///
/// Polls a curated set of wallets for new transactions, classifies them
/// (transfers, swaps, Jupiter perpetuals activity), extracts balance-delta
/// transfers and keeps a bounded, persisted activity history. Open perps
/// positions of the same wallets can be fetched and summarized.
pub mod activities;
pub mod arguments;
pub mod config;
pub mod constants;
pub mod errors;
pub mod logger;
pub mod paths;
pub mod poller;
pub mod positions;
pub mod rpc;
pub mod settings;
pub mod storage;
pub mod tracker;
pub mod transactions;
pub mod wallets;
