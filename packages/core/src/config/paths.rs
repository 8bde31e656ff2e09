//! Config file location
//!
//! The config lives at a fixed per-user path unless overridden.

use directories::BaseDirs;
use std::path::PathBuf;

/// File name of the config document inside the home directory
pub const CONFIG_FILE_NAME: &str = ".nstreamconfig";

/// Environment variable overriding the config path
pub const CONFIG_PATH_ENV: &str = "NSAI_CONFIG";

/// Get the default config path (`$HOME/.nstreamconfig`)
///
/// Returns None if the home directory cannot be determined.
pub fn get_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CONFIG_FILE_NAME))
}

/// Resolve the config path
///
/// Resolution order:
/// 1. Explicit path (from `--config`)
/// 2. `NSAI_CONFIG` environment variable
/// 3. `$HOME/.nstreamconfig`
pub fn resolve_config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit
        .or_else(|| {
            std::env::var_os(CONFIG_PATH_ENV)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
        })
        .or_else(get_config_path)
}
