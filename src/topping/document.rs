//! Serialized shape of the topping document.

use crate::host::MapThemeRecord;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A mapping that keeps insertion order, including single-key node mappings.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Ordered<V>(pub Vec<(String, V)>);

impl<V> Ordered<V> {
    pub fn single(key: impl Into<String>, value: V) -> Self {
        Self(vec![(key.into(), value)])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append `value`, or replace the value of an existing `key` in place.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((key, value)),
        }
    }
}

impl<V> Default for Ordered<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<V: Serialize> Serialize for Ordered<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct ToppingDocument {
    pub layertree: Vec<Ordered<NodeDocument>>,
    #[serde(skip_serializing_if = "Ordered::is_empty")]
    pub mapthemes: Ordered<ThemeDocument>,
}

#[derive(Debug, Default, serde::Serialize)]
pub(crate) struct NodeDocument {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub group: bool,
    pub checked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expanded: Option<bool>,
    #[serde(rename = "child-nodes", skip_serializing_if = "Option::is_none")]
    pub child_nodes: Option<Vec<Ordered<NodeDocument>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<AssetBlock>,
    #[serde(skip_serializing_if = "Ordered::is_empty")]
    pub styles: Ordered<AssetBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<AssetBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<AssetBlock>,
}

/// Reference to one exported asset.
#[derive(Debug, serde::Serialize)]
pub(crate) struct AssetBlock {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<&'static str>>,
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct ThemeDocument {
    pub layers: Ordered<ThemeLayerDocument>,
    #[serde(rename = "expanded-groups")]
    pub expanded_groups: Vec<String>,
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct ThemeLayerDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    pub visible: bool,
    #[serde(rename = "using-current-style")]
    pub using_current_style: bool,
}

impl From<&MapThemeRecord> for ThemeDocument {
    fn from(record: &MapThemeRecord) -> Self {
        // Layers are keyed by name; a later record for the same name wins.
        let mut layers = Ordered::default();
        for layer in &record.layer_records {
            layers.insert(
                layer.layer.clone(),
                ThemeLayerDocument {
                    style: layer.style.clone(),
                    visible: layer.visible,
                    using_current_style: layer.using_current_style,
                },
            );
        }
        Self {
            layers,
            expanded_groups: record.expanded_groups.clone(),
        }
    }
}
