//! Structured logging system for CopyTrader
//!
//! This module provides a small, ergonomic logging API with:
//! - Standard log levels (Error/Warning/Info/Debug/Verbose)
//! - Per-module debug control via --debug-<module> flags
//! - Dual output: colored console + daily log file
//!
//! ## Usage
//!
//! ```rust,ignore
//! use copytrader::logger::{self, LogTag};
//!
//! logger::error(LogTag::Rpc, "Connection failed");
//! logger::warning(LogTag::Fetcher, "Rate limited, cooling down");
//! logger::info(LogTag::Ingest, "3 new activities");
//! logger::debug(LogTag::Classifier, "Signal matched: token balance owner"); // Only if --debug-classifier
//! logger::verbose(LogTag::Rpc, "Raw response: ..."); // Only if --verbose
//! ```
//!
//! ## Initialization
//!
//! Call once at startup (in main.rs):
//! ```rust,ignore
//! logger::init(&logger_args, Some(paths::get_logs_directory()));
//! ```
//!
//! Logging before `init` is allowed; it uses the default configuration
//! (Info level, console only).

mod config;
mod core;
mod file;
mod format;
mod levels;
mod tags;

pub use config::{get_logger_config, set_logger_config, LoggerConfig};
pub use levels::LogLevel;
pub use tags::LogTag;

use std::path::PathBuf;

/// Initialize the logger system
///
/// Scans the given arguments for `--debug-<module>`, `--debug-all`,
/// `--verbose` and `--quiet` flags and, when `log_dir` is set, opens the
/// daily log file inside it.
pub fn init(args: &[String], log_dir: Option<PathBuf>) {
    config::init_from_args(args);

    if let Some(dir) = log_dir {
        file::init_file_logging(dir);
    }
}

/// Log at ERROR level (always shown, critical issues)
pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

/// Log at WARNING level (important issues)
///
/// Warnings are shown by default (unless --quiet is used).
pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

/// Log at INFO level (standard operations)
pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Log at DEBUG level (detailed diagnostics)
///
/// Debug logs are ONLY shown when the --debug-<module> flag for the tag
/// (or --debug-all) is provided.
///
/// # Example
/// ```rust,ignore
/// // Only shown with --debug-fetcher
/// logger::debug(LogTag::Fetcher, "Skipping 4 known signatures");
/// ```
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Log at VERBOSE level (very detailed tracing)
///
/// Verbose logs are ONLY shown when --verbose flag is provided.
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}

/// Force flush all pending log writes
///
/// Call this during shutdown to ensure all logs are written to disk.
pub fn flush() {
    file::flush_file_logging();
}
