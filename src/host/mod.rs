//! Seam between the topping core and the host GIS application.
//!
//! The host's live layer tree, its layers and its map themes are only ever
//! seen through the traits in this module. Parsing reads them once; nothing
//! downstream of [`crate::topping::LayerTree::parse`] touches host objects.

pub mod memory;

use crate::error::ToppingResult;
use crate::settings::StyleCategories;
use crate::target::AssetCategory;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Identity of a single node in the host layer tree.
///
/// The same underlying layer placed at two positions yields two nodes with
/// two distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

/// What a host node is, extracted in one call.
pub enum HostNodeKind<'a> {
    Group {
        expanded: bool,
        children: Vec<&'a dyn HostNode>,
    },
    Layer(&'a dyn HostLayer),
}

/// A node of the host layer tree (group or layer reference).
pub trait HostNode {
    fn id(&self) -> NodeId;
    fn name(&self) -> &str;
    /// Visibility checkbox state.
    fn checked(&self) -> bool;
    fn kind(&self) -> HostNodeKind<'_>;
}

/// The map layer a layer node points at.
pub trait HostLayer {
    /// Stable identifier of the layer inside the host project.
    fn layer_id(&self) -> &str;
    /// Named style variants, not including the default style.
    fn style_variants(&self) -> Vec<String>;
}

/// A loaded host project.
pub trait HostProject {
    /// Top-level nodes of the layer tree, in display order.
    fn layer_tree_root(&self) -> Vec<&dyn HostNode>;
    /// All map themes of the project, in the host's order.
    fn map_themes(&self) -> Vec<MapThemeRecord>;
}

/// Per-layer entry of a map theme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapThemeLayerRecord {
    /// Layer name as shown in the tree.
    pub layer: String,
    pub style: Option<String>,
    pub visible: bool,
    pub using_current_style: bool,
}

/// A named map theme captured from the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapThemeRecord {
    pub name: String,
    pub layer_records: Vec<MapThemeLayerRecord>,
    pub expanded_groups: Vec<String>,
}

/// Everything an [`AssetWriter`] needs to know to produce one asset file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetRequest<'a> {
    pub category: AssetCategory,
    pub layer_id: &'a str,
    pub layer_name: &'a str,
    /// Style variant, `None` for the default style and for non-style assets.
    pub style: Option<&'a str>,
    pub categories: Option<StyleCategories>,
}

/// Produces the bytes of style, definition and source assets.
///
/// Generation decides whether, where and under which id an asset is written;
/// the writer decides what goes into the file.
pub trait AssetWriter {
    fn write_asset(&mut self, request: &AssetRequest<'_>, path: &Path) -> ToppingResult<()>;
}
