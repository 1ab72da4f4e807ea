//! Export settings: which assets to export for which layer tree node.
//!
//! Each [`ToppingType`] has its own table. Entries are keyed either by node
//! identity or by layer name, optionally qualified by a style variant:
//!
//! - `Node(id)` / `NodeVariant(id, variant)` need the host project to exist,
//!   but can tell apart layers sharing a name.
//! - `Name(name)` / `NameVariant(name, variant)` can be authored ahead of time,
//!   e.g. in a configuration file for headless runs.
//!
//! Lookups try the node key first and fall back to the name key.

pub mod categories;

pub use categories::StyleCategories;

use crate::host::NodeId;
use std::collections::HashMap;

/// Asset kinds that carry per-node export settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToppingType {
    Style,
    Definition,
    Source,
}

/// Key of one entry in a settings table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Node(NodeId),
    NodeVariant(NodeId, String),
    Name(String),
    NameVariant(String, String),
}

/// Export decision for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportSetting {
    pub export: bool,
    /// Style facets to include; only meaningful for [`ToppingType::Style`].
    pub categories: Option<StyleCategories>,
}

/// What a settings call is about: a node, a name, or both, plus a style variant.
///
/// Empty names and variants count as absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingLookup<'a> {
    pub node: Option<NodeId>,
    pub name: Option<&'a str>,
    pub variant: Option<&'a str>,
}

impl<'a> SettingLookup<'a> {
    pub fn node(node: NodeId) -> Self {
        Self {
            node: Some(node),
            ..Self::default()
        }
    }

    pub fn name(name: &'a str) -> Self {
        Self {
            name: Some(name),
            ..Self::default()
        }
    }

    /// Lookup carrying both identity and name, as used during generation.
    pub fn node_and_name(node: NodeId, name: &'a str) -> Self {
        Self {
            node: Some(node),
            name: Some(name),
            variant: None,
        }
    }

    pub fn with_variant(mut self, variant: &'a str) -> Self {
        self.variant = Some(variant);
        self
    }

    fn variant(&self) -> Option<&'a str> {
        self.variant.filter(|v| !v.is_empty())
    }

    fn node_key(&self) -> Option<SettingKey> {
        let node = self.node?;
        Some(match self.variant() {
            Some(variant) => SettingKey::NodeVariant(node, variant.to_string()),
            None => SettingKey::Node(node),
        })
    }

    fn name_key(&self) -> Option<SettingKey> {
        let name = self.name.filter(|n| !n.is_empty())?;
        Some(match self.variant() {
            Some(variant) => SettingKey::NameVariant(name.to_string(), variant.to_string()),
            None => SettingKey::Name(name.to_string()),
        })
    }

    /// Keys to try, most specific first.
    fn candidates(&self) -> impl Iterator<Item = SettingKey> {
        [self.node_key(), self.name_key()].into_iter().flatten()
    }
}

/// Requested export settings for style, definition and source assets,
/// plus the ordered list of map themes to export.
#[derive(Debug, Clone, Default)]
pub struct ExportSettings {
    style_settings: HashMap<SettingKey, ExportSetting>,
    definition_settings: HashMap<SettingKey, ExportSetting>,
    source_settings: HashMap<SettingKey, ExportSetting>,
    /// Names of the map themes to export, in document order.
    pub map_themes: Vec<String>,
}

impl ExportSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `export` (and `categories`, when given) under the lookup's key.
    ///
    /// The key is the node key when a node is given, the name key otherwise.
    /// Returns `false` and changes nothing when neither is given.
    pub fn set_setting_values(
        &mut self,
        kind: ToppingType,
        lookup: SettingLookup<'_>,
        export: bool,
        categories: Option<StyleCategories>,
    ) -> bool {
        let Some(key) = lookup.candidates().next() else {
            log::debug!(
                target: "toppingmaker::settings",
                "Ignoring {:?} setting without node or name",
                kind
            );
            return false;
        };
        let setting = self.table_mut(kind).entry(key).or_default();
        setting.export = export;
        if categories.is_some() {
            setting.categories = categories;
        }
        true
    }

    /// The setting stored under the node key, else under the name key,
    /// else a default (not exported) setting.
    pub fn get_setting(&self, kind: ToppingType, lookup: SettingLookup<'_>) -> ExportSetting {
        let table = self.table(kind);
        lookup
            .candidates()
            .find_map(|key| table.get(&key).copied())
            .unwrap_or_default()
    }

    /// All entries stored for `kind`.
    pub fn entries(&self, kind: ToppingType) -> &HashMap<SettingKey, ExportSetting> {
        self.table(kind)
    }

    fn table(&self, kind: ToppingType) -> &HashMap<SettingKey, ExportSetting> {
        match kind {
            ToppingType::Style => &self.style_settings,
            ToppingType::Definition => &self.definition_settings,
            ToppingType::Source => &self.source_settings,
        }
    }

    fn table_mut(&mut self, kind: ToppingType) -> &mut HashMap<SettingKey, ExportSetting> {
        match kind {
            ToppingType::Style => &mut self.style_settings,
            ToppingType::Definition => &mut self.definition_settings,
            ToppingType::Source => &mut self.source_settings,
        }
    }
}
