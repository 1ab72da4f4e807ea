use crate::error::{ToppingError, ToppingResult};
use crate::settings::{ExportSettings, SettingLookup, StyleCategories, ToppingType};
use crate::target::{Target, VersionedPathResolver};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_export() -> bool {
    true
}

/// Which path policy a configured target uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverKind {
    #[default]
    Default,
    Versioned,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TargetConfig {
    pub identifier: Option<String>,
    pub main_dir: Option<PathBuf>,
    pub sub_dir: Option<String>,
    pub path_resolver: Option<ResolverKind>,
    /// Fixed version stamp for the versioned resolver; today's date otherwise.
    pub version: Option<String>,
}

/// One name-keyed export entry.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SettingEntry {
    pub name: String,
    pub variant: Option<String>,
    #[serde(default = "default_export")]
    pub export: bool,
    pub categories: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportConfig {
    pub map_themes: Vec<String>,
    pub style: Vec<SettingEntry>,
    pub definition: Vec<SettingEntry>,
    pub source: Vec<SettingEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ToppingConfig {
    pub target: TargetConfig,
    pub export: ExportConfig,
}

impl TargetConfig {
    /// Build a [`Target`]; `identifier` and `main_dir` are required.
    pub fn build_target(&self) -> ToppingResult<Target> {
        let identifier = self
            .identifier
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ToppingError::config("target identifier is not set"))?;
        let main_dir = self
            .main_dir
            .as_ref()
            .ok_or_else(|| ToppingError::config("target main_dir is not set"))?;
        let target = Target::new(identifier, main_dir, self.sub_dir.as_deref().unwrap_or(""));

        Ok(match self.path_resolver.unwrap_or_default() {
            ResolverKind::Default => target,
            ResolverKind::Versioned => target.with_path_resolver(match &self.version {
                Some(version) => VersionedPathResolver::with_version(version),
                None => VersionedPathResolver::new(),
            }),
        })
    }
}

impl ExportConfig {
    /// Translate the configured entries into name-keyed [`ExportSettings`].
    ///
    /// Entries are applied in file order, so a later entry for the same
    /// name and variant overrides an earlier one.
    pub fn to_export_settings(&self) -> ToppingResult<ExportSettings> {
        let mut settings = ExportSettings::new();
        let tables = [
            (ToppingType::Style, &self.style),
            (ToppingType::Definition, &self.definition),
            (ToppingType::Source, &self.source),
        ];
        for (kind, entries) in tables {
            for entry in entries {
                let categories = entry
                    .categories
                    .as_ref()
                    .map(StyleCategories::from_names)
                    .transpose()?;
                let mut lookup = SettingLookup::name(&entry.name);
                if let Some(variant) = entry.variant.as_deref() {
                    lookup = lookup.with_variant(variant);
                }
                if !settings.set_setting_values(kind, lookup, entry.export, categories) {
                    return Err(ToppingError::config(format!(
                        "{:?} export entry without a layer name",
                        kind
                    )));
                }
            }
        }
        settings.map_themes = self.map_themes.clone();
        Ok(settings)
    }
}
