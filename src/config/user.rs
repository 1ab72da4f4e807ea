//! User configuration loading for toppingmaker.
//!
//! User config location: $XDG_CONFIG_HOME/toppingmaker/toppingmaker.toml
//! Fallback: the platform config directory (`dirs::config_dir`).

use super::{ToppingConfig, load_config};
use crate::error::ToppingResult;
use std::path::PathBuf;

/// Returns the path to the user configuration file.
///
/// The path is determined by:
/// 1. If $XDG_CONFIG_HOME is set: $XDG_CONFIG_HOME/toppingmaker/toppingmaker.toml
/// 2. Otherwise: <platform config dir>/toppingmaker/toppingmaker.toml
///
/// Returns None if no config directory can be determined.
pub fn user_config_path() -> Option<PathBuf> {
    let base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg_config) if !xdg_config.is_empty() => PathBuf::from(xdg_config),
        _ => dirs::config_dir()?,
    };
    Some(base.join("toppingmaker").join("toppingmaker.toml"))
}

/// Load the user configuration if one exists.
pub fn load_user_config() -> ToppingResult<Option<ToppingConfig>> {
    match user_config_path() {
        Some(path) if path.is_file() => {
            log::debug!(
                target: "toppingmaker::config",
                "Loading user config from {}",
                path.display()
            );
            load_config(&path).map(Some)
        }
        _ => Ok(None),
    }
}
