//! In-memory host project.
//!
//! Stands in for a live host application: the CLI loads one from a YAML
//! project description and the test suite builds them node by node.
//!
//! ```yaml
//! layers:
//!   - id: l1
//!     name: Layer One
//!     provider: memory
//!     uri: "point?crs=epsg:4326"
//!     styles: [french 1, robot 1]
//! tree:
//!   - group: Big Group
//!     children:
//!       - layer: l1
//!         checked: false
//! themes:
//!   - name: Robot Theme
//!     layers:
//!       - { layer: l1, style: robot 1, visible: false }
//!     expanded_groups: [Big Group]
//! ```

use super::{
    AssetRequest, AssetWriter, HostLayer, HostNode, HostNodeKind, HostProject,
    MapThemeLayerRecord, MapThemeRecord, NodeId,
};
use crate::error::{ToppingError, ToppingResult};
use crate::target::AssetCategory;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A map layer held by a [`MemoryProject`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryLayer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub uri: String,
    /// Named style variants besides the default style.
    #[serde(default)]
    pub styles: Vec<String>,
}

impl MemoryLayer {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            provider: String::new(),
            uri: String::new(),
            styles: Vec::new(),
        }
    }

    pub fn with_source(mut self, provider: impl Into<String>, uri: impl Into<String>) -> Self {
        self.provider = provider.into();
        self.uri = uri.into();
        self
    }

    pub fn with_styles<I, S>(mut self, styles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.styles = styles.into_iter().map(Into::into).collect();
        self
    }
}

impl HostLayer for MemoryLayer {
    fn layer_id(&self) -> &str {
        &self.id
    }

    fn style_variants(&self) -> Vec<String> {
        self.styles.clone()
    }
}

#[derive(Debug, Clone)]
enum NodeBody {
    Group {
        expanded: bool,
        children: Vec<MemoryNode>,
    },
    Layer(MemoryLayer),
}

/// A node of a [`MemoryProject`] layer tree.
#[derive(Debug, Clone)]
pub struct MemoryNode {
    id: NodeId,
    name: String,
    checked: bool,
    body: NodeBody,
}

impl HostNode for MemoryNode {
    fn id(&self) -> NodeId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn checked(&self) -> bool {
        self.checked
    }

    fn kind(&self) -> HostNodeKind<'_> {
        match &self.body {
            NodeBody::Group { expanded, children } => HostNodeKind::Group {
                expanded: *expanded,
                children: children.iter().map(|c| c as &dyn HostNode).collect(),
            },
            NodeBody::Layer(layer) => HostNodeKind::Layer(layer),
        }
    }
}

/// A host project living entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryProject {
    layers: Vec<MemoryLayer>,
    root: Vec<MemoryNode>,
    themes: Vec<MapThemeRecord>,
    next_id: u64,
}

impl MemoryProject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a layer so that tree nodes can reference it.
    pub fn add_layer(&mut self, layer: MemoryLayer) -> ToppingResult<()> {
        if self.layer(&layer.id).is_some() {
            return Err(ToppingError::config(format!(
                "layer id '{}' is already registered",
                layer.id
            )));
        }
        self.layers.push(layer);
        Ok(())
    }

    pub fn layer(&self, layer_id: &str) -> Option<&MemoryLayer> {
        self.layers.iter().find(|layer| layer.id == layer_id)
    }

    /// Append a group below `parent`, or at the top level when `parent` is `None`.
    pub fn add_group(&mut self, parent: Option<NodeId>, name: &str) -> ToppingResult<NodeId> {
        let node = MemoryNode {
            id: self.next_node_id(),
            name: name.to_string(),
            checked: true,
            body: NodeBody::Group {
                expanded: true,
                children: Vec::new(),
            },
        };
        self.attach(parent, node)
    }

    /// Append a node referencing the registered layer `layer_id`.
    ///
    /// A layer may be placed any number of times; each placement gets its own node.
    pub fn add_layer_node(&mut self, parent: Option<NodeId>, layer_id: &str) -> ToppingResult<NodeId> {
        let layer = self
            .layer(layer_id)
            .cloned()
            .ok_or_else(|| ToppingError::config(format!("unknown layer id '{}'", layer_id)))?;
        let node = MemoryNode {
            id: self.next_node_id(),
            name: layer.name.clone(),
            checked: true,
            body: NodeBody::Layer(layer),
        };
        self.attach(parent, node)
    }

    pub fn set_checked(&mut self, node: NodeId, checked: bool) -> ToppingResult<()> {
        let node = self.node_mut(node)?;
        node.checked = checked;
        Ok(())
    }

    pub fn set_expanded(&mut self, node: NodeId, expanded: bool) -> ToppingResult<()> {
        match &mut self.node_mut(node)?.body {
            NodeBody::Group { expanded: flag, .. } => {
                *flag = expanded;
                Ok(())
            }
            NodeBody::Layer(_) => Err(ToppingError::config(format!(
                "node {} is a layer and cannot be expanded",
                node.get()
            ))),
        }
    }

    /// Insert a map theme, replacing any theme of the same name.
    pub fn insert_map_theme(&mut self, theme: MapThemeRecord) {
        match self.themes.iter_mut().find(|t| t.name == theme.name) {
            Some(existing) => *existing = theme,
            None => self.themes.push(theme),
        }
    }

    /// Ids of every layer node named `name`, in depth-first order.
    pub fn find_layer_nodes(&self, name: &str) -> Vec<NodeId> {
        fn collect(nodes: &[MemoryNode], name: &str, found: &mut Vec<NodeId>) {
            for node in nodes {
                match &node.body {
                    NodeBody::Group { children, .. } => collect(children, name, found),
                    NodeBody::Layer(_) if node.name == name => found.push(node.id),
                    NodeBody::Layer(_) => {}
                }
            }
        }

        let mut found = Vec::new();
        collect(&self.root, name, &mut found);
        found
    }

    /// Build a project from a YAML project description.
    pub fn from_yaml(content: &str) -> ToppingResult<Self> {
        let description: ProjectDescription = serde_yaml::from_str(content)?;
        let mut project = Self::new();
        for layer in description.layers {
            project.add_layer(layer)?;
        }
        for node in &description.tree {
            project.add_description(None, node)?;
        }
        for theme in description.themes {
            let layer_records = theme
                .layers
                .into_iter()
                .map(|record| {
                    let layer = project.layer(&record.layer).ok_or_else(|| {
                        ToppingError::config(format!(
                            "map theme '{}' references unknown layer id '{}'",
                            theme.name, record.layer
                        ))
                    })?;
                    Ok(MapThemeLayerRecord {
                        layer: layer.name.clone(),
                        style: record.style,
                        visible: record.visible,
                        using_current_style: record.using_current_style,
                    })
                })
                .collect::<ToppingResult<Vec<_>>>()?;
            project.insert_map_theme(MapThemeRecord {
                name: theme.name,
                layer_records,
                expanded_groups: theme.expanded_groups,
            });
        }
        Ok(project)
    }

    /// Load a YAML project description from disk.
    pub fn load(path: &Path) -> ToppingResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ToppingError::io(path, e))?;
        Self::from_yaml(&content)
    }

    fn add_description(&mut self, parent: Option<NodeId>, node: &NodeDescription) -> ToppingResult<()> {
        match node {
            NodeDescription::Group {
                group,
                checked,
                expanded,
                children,
            } => {
                let id = self.add_group(parent, group)?;
                self.set_checked(id, *checked)?;
                self.set_expanded(id, *expanded)?;
                for child in children {
                    self.add_description(Some(id), child)?;
                }
            }
            NodeDescription::Layer { layer, checked } => {
                let id = self.add_layer_node(parent, layer)?;
                self.set_checked(id, *checked)?;
            }
        }
        Ok(())
    }

    fn next_node_id(&mut self) -> NodeId {
        self.next_id += 1;
        NodeId::new(self.next_id)
    }

    fn attach(&mut self, parent: Option<NodeId>, node: MemoryNode) -> ToppingResult<NodeId> {
        let id = node.id;
        match parent {
            None => self.root.push(node),
            Some(parent) => match &mut self.node_mut(parent)?.body {
                NodeBody::Group { children, .. } => children.push(node),
                NodeBody::Layer(_) => {
                    return Err(ToppingError::config(format!(
                        "node {} is a layer and cannot hold children",
                        parent.get()
                    )));
                }
            },
        }
        Ok(id)
    }

    fn node_mut(&mut self, id: NodeId) -> ToppingResult<&mut MemoryNode> {
        fn find(nodes: &mut [MemoryNode], id: NodeId) -> Option<&mut MemoryNode> {
            for node in nodes {
                if node.id == id {
                    return Some(node);
                }
                if let NodeBody::Group { children, .. } = &mut node.body
                    && let Some(found) = find(children, id)
                {
                    return Some(found);
                }
            }
            None
        }

        find(&mut self.root, id)
            .ok_or_else(|| ToppingError::config(format!("unknown node {}", id.get())))
    }
}

impl HostProject for MemoryProject {
    fn layer_tree_root(&self) -> Vec<&dyn HostNode> {
        self.root.iter().map(|n| n as &dyn HostNode).collect()
    }

    fn map_themes(&self) -> Vec<MapThemeRecord> {
        self.themes.clone()
    }
}

/// Content of the descriptor files a [`MemoryProject`] writes for its assets.
#[derive(Serialize)]
struct AssetDescriptor<'a> {
    kind: AssetCategory,
    layer: &'a str,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    provider: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    uri: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    style: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    categories: Option<Vec<&'static str>>,
}

impl AssetWriter for MemoryProject {
    fn write_asset(&mut self, request: &AssetRequest<'_>, path: &Path) -> ToppingResult<()> {
        let layer = self.layer(request.layer_id).ok_or_else(|| {
            ToppingError::export(format!("unknown layer id '{}'", request.layer_id))
        })?;
        let carries_source = matches!(
            request.category,
            AssetCategory::Definition | AssetCategory::Source
        );
        let descriptor = AssetDescriptor {
            kind: request.category,
            layer: &layer.id,
            name: request.layer_name,
            provider: carries_source.then_some(layer.provider.as_str()),
            uri: carries_source.then_some(layer.uri.as_str()),
            style: request.style,
            categories: request.categories.map(|c| c.names()),
        };
        let content = serde_yaml::to_string(&descriptor)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ToppingError::io(parent, e))?;
        }
        fs::write(path, content).map_err(|e| ToppingError::io(path, e))
    }
}

fn enabled() -> bool {
    true
}

#[derive(Deserialize)]
struct ProjectDescription {
    #[serde(default)]
    layers: Vec<MemoryLayer>,
    #[serde(default)]
    tree: Vec<NodeDescription>,
    #[serde(default)]
    themes: Vec<ThemeDescription>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NodeDescription {
    Group {
        group: String,
        #[serde(default = "enabled")]
        checked: bool,
        #[serde(default = "enabled")]
        expanded: bool,
        #[serde(default)]
        children: Vec<NodeDescription>,
    },
    Layer {
        layer: String,
        #[serde(default = "enabled")]
        checked: bool,
    },
}

#[derive(Deserialize)]
struct ThemeDescription {
    name: String,
    #[serde(default)]
    layers: Vec<ThemeLayerDescription>,
    #[serde(default)]
    expanded_groups: Vec<String>,
}

#[derive(Deserialize)]
struct ThemeLayerDescription {
    layer: String,
    style: Option<String>,
    #[serde(default = "enabled")]
    visible: bool,
    #[serde(default = "enabled")]
    using_current_style: bool,
}
