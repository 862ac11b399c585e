/// Level and tag filtering in front of the output sinks
use super::config::{get_logger_config, LoggerConfig};
use super::levels::LogLevel;
use super::tags::LogTag;

/// Whether `config` lets a `level` message for `tag` through
///
/// - errors always pass
/// - verbose needs `--verbose` or `--verbose-<tag>`
/// - debug needs `--debug-<tag>` (or `--debug-all`)
/// - everything else is compared against the minimum level
pub(super) fn passes(config: &LoggerConfig, tag: &LogTag, level: LogLevel) -> bool {
    let key = tag.to_debug_key();
    match level {
        LogLevel::Error => true,
        LogLevel::Verbose => {
            config.min_level == LogLevel::Verbose || config.verbose_tags.contains(&key)
        }
        LogLevel::Debug => level <= config.min_level && config.debug_tags.contains(&key),
        _ => level <= config.min_level,
    }
}

pub fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    if passes(&get_logger_config(), &tag, level) {
        super::format::format_and_log(tag, level, message);
    }
}
