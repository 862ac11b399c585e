use super::schemas::Config;
/// Configuration utilities - loading, saving, and access helpers
///
/// The global configuration lives in a `OnceCell<RwLock<Config>>`. Reads
/// before `load_config` see defaults.
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::path::Path;

/// Global configuration instance
pub static CONFIG: OnceCell<RwLock<Config>> = OnceCell::new();

fn config_cell() -> &'static RwLock<Config> {
    CONFIG.get_or_init(|| RwLock::new(Config::default()))
}

/// Load configuration from the default path (`<data dir>/config.toml`)
///
/// A missing file yields the default configuration.
pub fn load_config() -> Result<(), String> {
    load_config_from_path(&crate::paths::get_config_path())
}

/// Load configuration from a specific file path and install it globally
pub fn load_config_from_path(path: &Path) -> Result<(), String> {
    let config = read_config_file(path)?;
    *config_cell().write() = config;
    Ok(())
}

/// Parse a config file without touching the global instance
pub fn read_config_file(path: &Path) -> Result<Config, String> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

    let config = toml::from_str::<Config>(&contents)
        .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;
    config
        .polling
        .validate()
        .map_err(|e| format!("Invalid config file '{}': {}", path.display(), e))?;
    Ok(config)
}

/// Execute a function with read access to the configuration
///
/// # Example
/// ```ignore
/// let cap = with_config(|cfg| cfg.fetcher.history_cap);
/// ```
pub fn with_config<F, R>(f: F) -> R
where
    F: FnOnce(&Config) -> R,
{
    let config = config_cell().read();
    f(&config)
}

/// Get a clone of the entire configuration
///
/// Useful when values are needed across await points.
pub fn get_config_clone() -> Config {
    with_config(|cfg| cfg.clone())
}

/// Save the current configuration to disk
pub fn save_config(path: Option<&Path>) -> Result<(), String> {
    let default_path = crate::paths::get_config_path();
    let path = path.unwrap_or(&default_path);

    let config_str = with_config(|cfg| {
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))
    })?;

    std::fs::write(path, config_str)
        .map_err(|e| format!("Failed to write config file '{}': {}", path.display(), e))?;

    Ok(())
}
