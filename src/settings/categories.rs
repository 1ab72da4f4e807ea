//! Style categories selectable for style exports.

use crate::error::{ToppingError, ToppingResult};

bitflags::bitflags! {
    /// Facets of a layer style that a style export should include.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StyleCategories: u32 {
        const LAYER_CONFIGURATION = 1 << 0;
        const SYMBOLOGY = 1 << 1;
        const SYMBOLOGY_3D = 1 << 2;
        const LABELING = 1 << 3;
        const FIELDS = 1 << 4;
        const FORMS = 1 << 5;
        const ACTIONS = 1 << 6;
        const MAP_TIPS = 1 << 7;
        const DIAGRAMS = 1 << 8;
        const ATTRIBUTE_TABLE = 1 << 9;
        const RENDERING = 1 << 10;
        const CUSTOM_PROPERTIES = 1 << 11;
        const GEOMETRY_OPTIONS = 1 << 12;
        const RELATIONS = 1 << 13;
        const TEMPORAL = 1 << 14;
        const LEGEND = 1 << 15;
        const ELEVATION = 1 << 16;
        const NOTES = 1 << 17;
    }
}

const ALL_NAME: &str = "all";

/// Configuration/document names, in flag order.
const NAMES: &[(&str, StyleCategories)] = &[
    ("layer-configuration", StyleCategories::LAYER_CONFIGURATION),
    ("symbology", StyleCategories::SYMBOLOGY),
    ("symbology-3d", StyleCategories::SYMBOLOGY_3D),
    ("labeling", StyleCategories::LABELING),
    ("fields", StyleCategories::FIELDS),
    ("forms", StyleCategories::FORMS),
    ("actions", StyleCategories::ACTIONS),
    ("map-tips", StyleCategories::MAP_TIPS),
    ("diagrams", StyleCategories::DIAGRAMS),
    ("attribute-table", StyleCategories::ATTRIBUTE_TABLE),
    ("rendering", StyleCategories::RENDERING),
    ("custom-properties", StyleCategories::CUSTOM_PROPERTIES),
    ("geometry-options", StyleCategories::GEOMETRY_OPTIONS),
    ("relations", StyleCategories::RELATIONS),
    ("temporal", StyleCategories::TEMPORAL),
    ("legend", StyleCategories::LEGEND),
    ("elevation", StyleCategories::ELEVATION),
    ("notes", StyleCategories::NOTES),
];

impl StyleCategories {
    /// Look up a single category by name (case-insensitive, `all` included).
    pub fn parse_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        if name == ALL_NAME {
            return Some(Self::all());
        }
        NAMES
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, flag)| *flag)
    }

    /// Combine a list of category names into one set.
    pub fn from_names<I, S>(names: I) -> ToppingResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().try_fold(Self::empty(), |acc, name| {
            let name = name.as_ref();
            Self::parse_name(name)
                .map(|flag| acc | flag)
                .ok_or_else(|| ToppingError::config(format!("unknown style category '{}'", name)))
        })
    }

    /// Names of the contained categories; a full set collapses to `["all"]`.
    pub fn names(self) -> Vec<&'static str> {
        if self == Self::all() {
            return vec![ALL_NAME];
        }
        NAMES
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect()
    }
}
