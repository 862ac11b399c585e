/// Configuration system
///
/// - `macros`: the `config_struct!` macro
/// - `schemas`: every configuration section with its defaults
/// - `utils`: global instance, load/save and access helpers
pub mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::*;
pub use utils::{
    get_config_clone, load_config, load_config_from_path, read_config_file, save_config,
    with_config, CONFIG,
};
