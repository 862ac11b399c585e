/// Logger configuration derived from command-line flags
///
/// The configuration is process-wide and can be replaced at runtime
/// (tests use `set_logger_config` to force quiet output).
use super::levels::LogLevel;
use super::tags::LogTag;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Minimum level shown (Error..Verbose)
    pub min_level: LogLevel,
    /// Tags with --debug-<tag> enabled
    pub debug_tags: HashSet<String>,
    /// Tags with --verbose-<tag> enabled
    pub verbose_tags: HashSet<String>,
    /// Print to the console
    pub console: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            verbose_tags: HashSet::new(),
            console: true,
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

pub fn get_logger_config() -> LoggerConfig {
    LOGGER_CONFIG.read().clone()
}

pub fn set_logger_config(config: LoggerConfig) {
    *LOGGER_CONFIG.write() = config;
}

/// Build the logger configuration from raw process arguments
pub fn init_from_args(args: &[String]) {
    set_logger_config(parse_args(args));
}

pub(super) fn parse_args(args: &[String]) -> LoggerConfig {
    let mut config = LoggerConfig::default();

    for arg in args {
        if arg == "--verbose" {
            config.min_level = LogLevel::Verbose;
        } else if arg == "--quiet" {
            config.min_level = LogLevel::Warning;
        } else if arg == "--debug-all" {
            for tag in LogTag::all() {
                config.debug_tags.insert(tag.to_debug_key());
            }
            if config.min_level < LogLevel::Debug {
                config.min_level = LogLevel::Debug;
            }
        } else if let Some(key) = arg.strip_prefix("--debug-") {
            config.debug_tags.insert(key.to_lowercase());
            if config.min_level < LogLevel::Debug {
                config.min_level = LogLevel::Debug;
            }
        } else if let Some(key) = arg.strip_prefix("--verbose-") {
            config.verbose_tags.insert(key.to_lowercase());
        } else if let Some(level) = arg.strip_prefix("--log-level=") {
            if let Some(level) = LogLevel::parse(level) {
                config.min_level = level;
            }
        }
    }

    config
}
