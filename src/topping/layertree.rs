//! Parsed, host-independent mirror of the host layer tree.

use crate::host::{HostNode, HostNodeKind, NodeId};
use crate::settings::{ExportSetting, ExportSettings, SettingLookup, ToppingType};

/// Ordered top-level items of a parsed layer tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerTree {
    pub items: Vec<LayerTreeItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerTreeItem {
    Group(GroupItem),
    Layer(LayerItem),
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupItem {
    pub name: String,
    pub checked: bool,
    pub expanded: bool,
    pub items: Vec<LayerTreeItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerItem {
    pub name: String,
    pub checked: bool,
    /// Identity of the host node this item was parsed from; used for
    /// settings lookups only, never written to the document.
    pub node_id: NodeId,
    pub layer_id: String,
    pub style_variants: Vec<String>,
    /// Export decisions resolved at parse time, if settings were given then.
    pub directives: Option<ExportDirectives>,
}

/// Resolved export decisions of one layer item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportDirectives {
    pub style: ExportSetting,
    /// Per style variant, in the layer's variant order.
    pub style_variants: Vec<(String, ExportSetting)>,
    pub definition: ExportSetting,
    pub source: ExportSetting,
}

impl ExportDirectives {
    /// Resolve every category (and every style variant) for one tree position.
    pub fn resolve(
        settings: &ExportSettings,
        node_id: NodeId,
        name: &str,
        style_variants: &[String],
    ) -> Self {
        let lookup = SettingLookup::node_and_name(node_id, name);
        Self {
            style: settings.get_setting(ToppingType::Style, lookup),
            style_variants: style_variants
                .iter()
                .map(|variant| {
                    let setting =
                        settings.get_setting(ToppingType::Style, lookup.with_variant(variant));
                    (variant.clone(), setting)
                })
                .collect(),
            definition: settings.get_setting(ToppingType::Definition, lookup),
            source: settings.get_setting(ToppingType::Source, lookup),
        }
    }
}

impl LayerTreeItem {
    pub fn name(&self) -> &str {
        match self {
            Self::Group(group) => &group.name,
            Self::Layer(layer) => &layer.name,
        }
    }

    pub fn checked(&self) -> bool {
        match self {
            Self::Group(group) => group.checked,
            Self::Layer(layer) => layer.checked,
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }

    /// Children of a group; empty for layers.
    pub fn items(&self) -> &[LayerTreeItem] {
        match self {
            Self::Group(group) => &group.items,
            Self::Layer(_) => &[],
        }
    }
}

impl LayerTree {
    /// Walk the host tree depth-first, keeping sibling order.
    ///
    /// With `settings`, each layer item also gets its [`ExportDirectives`].
    pub fn parse(roots: &[&dyn HostNode], settings: Option<&ExportSettings>) -> Self {
        Self {
            items: roots
                .iter()
                .map(|node| parse_node(*node, settings))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn group_count(&self) -> usize {
        count(&self.items, LayerTreeItem::is_group)
    }

    pub fn layer_count(&self) -> usize {
        count(&self.items, |item| !item.is_group())
    }

    /// Nesting depth; a flat list of layers has depth 1, an empty tree 0.
    pub fn depth(&self) -> usize {
        fn depth_of(items: &[LayerTreeItem]) -> usize {
            items
                .iter()
                .map(|item| 1 + depth_of(item.items()))
                .max()
                .unwrap_or(0)
        }
        depth_of(&self.items)
    }

    /// Find the first item named `name`, depth-first.
    pub fn find(&self, name: &str) -> Option<&LayerTreeItem> {
        fn find_in<'a>(items: &'a [LayerTreeItem], name: &str) -> Option<&'a LayerTreeItem> {
            items.iter().find_map(|item| {
                if item.name() == name {
                    Some(item)
                } else {
                    find_in(item.items(), name)
                }
            })
        }
        find_in(&self.items, name)
    }
}

fn count(items: &[LayerTreeItem], predicate: fn(&LayerTreeItem) -> bool) -> usize {
    items
        .iter()
        .map(|item| usize::from(predicate(item)) + count(item.items(), predicate))
        .sum()
}

fn parse_node(node: &dyn HostNode, settings: Option<&ExportSettings>) -> LayerTreeItem {
    match node.kind() {
        HostNodeKind::Group { expanded, children } => LayerTreeItem::Group(GroupItem {
            name: node.name().to_string(),
            checked: node.checked(),
            expanded,
            items: children
                .into_iter()
                .map(|child| parse_node(child, settings))
                .collect(),
        }),
        HostNodeKind::Layer(layer) => {
            let style_variants = layer.style_variants();
            let directives = settings.map(|settings| {
                ExportDirectives::resolve(settings, node.id(), node.name(), &style_variants)
            });
            LayerTreeItem::Layer(LayerItem {
                name: node.name().to_string(),
                checked: node.checked(),
                node_id: node.id(),
                layer_id: layer.layer_id().to_string(),
                style_variants,
                directives,
            })
        }
    }
}
