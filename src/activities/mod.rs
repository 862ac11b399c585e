/// Activity history and the ingestion cycle
///
/// - `history`: bounded, time-ordered history plus the known-signatures set
/// - `ingest`: runs the per-wallet fetcher for every wallet, merges and persists
pub mod history;
pub mod ingest;

#[cfg(test)]
mod tests;

pub use history::ActivityHistory;
pub use ingest::{load_history, ActivityIngestor, IngestReport};
