//! Default configuration values for toppingmaker.
//!
//! Used by `config init` to generate a configuration template.

use super::settings::{ExportConfig, ResolverKind, SettingEntry, TargetConfig, ToppingConfig};
use std::path::PathBuf;

/// Returns the template configuration written by `config init`.
pub fn default_config() -> ToppingConfig {
    ToppingConfig {
        target: TargetConfig {
            identifier: Some("project".to_string()),
            main_dir: Some(PathBuf::from(".")),
            sub_dir: Some("projects/project".to_string()),
            path_resolver: Some(ResolverKind::Default),
            version: None,
        },
        export: ExportConfig {
            map_themes: Vec::new(),
            style: vec![SettingEntry {
                name: "Layer Name".to_string(),
                variant: None,
                export: true,
                categories: Some(vec!["all".to_string()]),
            }],
            definition: Vec::new(),
            source: Vec::new(),
        },
    }
}

/// The template configuration as TOML text.
pub fn default_config_toml() -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(&default_config())
}
