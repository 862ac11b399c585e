//! Centralized path resolution for CopyTrader
//!
//! All file and directory paths are resolved through this module so the
//! binary, the stores and the logger agree on where things live.
//!
//! ## Path Strategy
//!
//! The base directory follows platform standards unless overridden with
//! `--data-dir`:
//! - **macOS**: `~/Library/Application Support/CopyTrader/`
//! - **Windows**: `%LOCALAPPDATA%\CopyTrader\`
//! - **Linux**: `$XDG_DATA_HOME/CopyTrader/` (fallback `~/.local/share/CopyTrader/`)
//!
//! ## Directory Structure
//!
//! ```text
//! ~/CopyTrader/
//! ├── data/
//! │ ├── config.toml
//! │ ├── store.json (json backend)
//! │ └── store.db   (sqlite backend)
//! └── logs/
//!   └── copytrader_*.log
//! ```

use once_cell::sync::{Lazy, OnceCell};
use std::path::PathBuf;

// =============================================================================
// BASE DIRECTORY RESOLUTION
// =============================================================================

/// Explicit base directory set from `--data-dir`
static BASE_OVERRIDE: OnceCell<PathBuf> = OnceCell::new();

/// Lazy-initialized platform base directory
static PLATFORM_BASE: Lazy<PathBuf> = Lazy::new(resolve_base_directory);

fn resolve_base_directory() -> PathBuf {
  const APP_DIR: &str = "CopyTrader";

  if let Some(dir) = dirs::data_local_dir() {
    return dir.join(APP_DIR);
  }

  if let Some(dir) = dirs::data_dir() {
    return dir.join(APP_DIR);
  }

  if let Some(home) = dirs::home_dir() {
    return home.join(APP_DIR);
  }

  PathBuf::from(APP_DIR)
}

/// Override the base directory. Must be called before any path is used.
pub fn set_base_directory(dir: PathBuf) -> Result<(), String> {
  BASE_OVERRIDE
    .set(dir)
    .map_err(|_| "Base directory already set".to_string())
}

// =============================================================================
// PRIMARY DIRECTORY ACCESSORS
// =============================================================================

/// Returns the base directory for all CopyTrader data
pub fn get_base_directory() -> PathBuf {
  BASE_OVERRIDE
    .get()
    .cloned()
    .unwrap_or_else(|| PLATFORM_BASE.clone())
}

/// Returns the data directory path (config and stores)
pub fn get_data_directory() -> PathBuf {
  get_base_directory().join("data")
}

/// Returns the logs directory path
pub fn get_logs_directory() -> PathBuf {
  get_base_directory().join("logs")
}

// =============================================================================
// FILE PATHS
// =============================================================================

/// Returns the main configuration file path
pub fn get_config_path() -> PathBuf {
  get_data_directory().join("config.toml")
}

/// Returns the JSON key-value store path
pub fn get_json_store_path() -> PathBuf {
  get_data_directory().join("store.json")
}

/// Returns the SQLite key-value store path
pub fn get_sqlite_store_path() -> PathBuf {
  get_data_directory().join("store.db")
}

// =============================================================================
// DIRECTORY CREATION
// =============================================================================

/// Ensures the base, data and logs directories exist
pub fn ensure_all_directories() -> Result<(), String> {
  let dirs_to_create = vec![
    ("base", get_base_directory()),
    ("data", get_data_directory()),
    ("logs", get_logs_directory()),
  ];

  for (name, dir) in dirs_to_create {
    if !dir.exists() {
      std::fs::create_dir_all(&dir).map_err(|e| {
        format!(
          "Failed to create {} directory at {}: {}",
          name,
          dir.display(),
          e
        )
      })?;
    }
  }

  Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
