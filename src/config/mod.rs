pub mod defaults;
pub mod settings;
pub mod user;

pub use settings::{ExportConfig, ResolverKind, SettingEntry, TargetConfig, ToppingConfig};
pub use user::{load_user_config, user_config_path};

use crate::error::{ToppingError, ToppingResult};
use std::path::Path;

/// Read a TOML configuration file.
pub fn load_config(path: &Path) -> ToppingResult<ToppingConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ToppingError::io(path, e))?;
    toml::from_str(&content)
        .map_err(|e| ToppingError::config(format!("{}: {}", path.display(), e)))
}

/// Merge two configurations, preferring values from `primary` over `fallback`
pub fn merge_config(
    fallback: Option<ToppingConfig>,
    primary: Option<ToppingConfig>,
) -> Option<ToppingConfig> {
    match (fallback, primary) {
        (None, None) => None,
        (Some(config), None) => Some(config),
        (None, Some(config)) => Some(config),
        (Some(fallback), Some(primary)) => Some(ToppingConfig {
            target: merge_target(fallback.target, primary.target),
            export: merge_export(fallback.export, primary.export),
        }),
    }
}

fn merge_target(fallback: TargetConfig, primary: TargetConfig) -> TargetConfig {
    TargetConfig {
        identifier: primary.identifier.or(fallback.identifier),
        main_dir: primary.main_dir.or(fallback.main_dir),
        sub_dir: primary.sub_dir.or(fallback.sub_dir),
        path_resolver: primary.path_resolver.or(fallback.path_resolver),
        version: primary.version.or(fallback.version),
    }
}

fn merge_export(mut fallback: ExportConfig, primary: ExportConfig) -> ExportConfig {
    // Entries are applied in order, so appending lets primary override fallback
    fallback.style.extend(primary.style);
    fallback.definition.extend(primary.definition);
    fallback.source.extend(primary.source);
    if !primary.map_themes.is_empty() {
        fallback.map_themes = primary.map_themes;
    }
    fallback
}
