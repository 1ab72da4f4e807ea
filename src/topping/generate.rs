//! Turns a parsed [`LayerTree`] into the topping document and its assets.

use super::document::{AssetBlock, NodeDocument, Ordered, ThemeDocument, ToppingDocument};
use super::layertree::{ExportDirectives, LayerItem, LayerTree, LayerTreeItem};
use crate::error::{ToppingError, ToppingResult};
use crate::host::{AssetRequest, AssetWriter, MapThemeRecord};
use crate::settings::{ExportSetting, ExportSettings};
use crate::target::{AssetCategory, Target};
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::sync::LazyLock;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\W_]+").expect("valid regex for slug pattern"));

/// File-name friendly form of `text`: lower case, word runs joined by `_`.
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let slug = NON_WORD.replace_all(&lower, "_");
    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        "unnamed".to_string()
    } else {
        slug.to_string()
    }
}

pub(super) struct Generator<'a> {
    target: &'a mut Target,
    settings: Option<&'a ExportSettings>,
    writer: &'a mut dyn AssetWriter,
    /// File stem to the layer id that claimed it.
    stem_owners: HashMap<String, String>,
}

impl<'a> Generator<'a> {
    pub fn new(
        target: &'a mut Target,
        settings: Option<&'a ExportSettings>,
        writer: &'a mut dyn AssetWriter,
    ) -> Self {
        Self {
            target,
            settings,
            writer,
            stem_owners: HashMap::new(),
        }
    }

    /// Emit every asset, then write and register the document itself.
    ///
    /// Returns the document path relative to the target's `main_dir`.
    pub fn run(
        mut self,
        layertree: &LayerTree,
        themes: &[MapThemeRecord],
        theme_selection: &[String],
    ) -> ToppingResult<String> {
        let layertree = layertree
            .items
            .iter()
            .map(|item| self.item(item))
            .collect::<ToppingResult<Vec<_>>>()?;
        let document = ToppingDocument {
            layertree,
            mapthemes: select_themes(themes, theme_selection),
        };
        let content = serde_yaml::to_string(&document)?;

        let file_name = format!(
            "{}.{}",
            slugify(&self.target.identifier),
            AssetCategory::Topping.extension()
        );
        let path = self.target.resolve_path(&file_name, AssetCategory::Topping)?;
        let absolute = self.target.main_dir.join(&path);
        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent).map_err(|e| ToppingError::io(parent, e))?;
        }
        fs::write(&absolute, content).map_err(|e| ToppingError::io(&absolute, e))?;
        log::info!(
            target: "toppingmaker::generate",
            "Wrote topping {} ({} registered files)",
            absolute.display(),
            self.target.toppingfileinfo_list.len()
        );
        Ok(path)
    }

    fn item(&mut self, item: &LayerTreeItem) -> ToppingResult<Ordered<NodeDocument>> {
        let node = match item {
            LayerTreeItem::Group(group) => NodeDocument {
                group: true,
                checked: group.checked,
                expanded: Some(group.expanded),
                child_nodes: Some(
                    group
                        .items
                        .iter()
                        .map(|child| self.item(child))
                        .collect::<ToppingResult<Vec<_>>>()?,
                ),
                ..NodeDocument::default()
            },
            LayerTreeItem::Layer(layer) => self.layer(layer)?,
        };
        Ok(Ordered::single(item.name(), node))
    }

    fn layer(&mut self, layer: &LayerItem) -> ToppingResult<NodeDocument> {
        let directives = match self.settings {
            Some(settings) => ExportDirectives::resolve(
                settings,
                layer.node_id,
                &layer.name,
                &layer.style_variants,
            ),
            None => layer.directives.clone().unwrap_or_default(),
        };
        let base = claim(
            &mut self.stem_owners,
            slugify(&format!("{}_{}", self.target.identifier, layer.name)),
            &layer.layer_id,
        );
        // Variant slugs are claimed up front so every placement of the layer
        // maps a variant to the same file, whatever it exports.
        let mut variant_owners = HashMap::new();
        let variant_stems: HashMap<&str, String> = layer
            .style_variants
            .iter()
            .map(|variant| {
                let stem = claim(&mut variant_owners, slugify(variant), variant);
                (variant.as_str(), stem)
            })
            .collect();

        let mut node = NodeDocument {
            checked: layer.checked,
            ..NodeDocument::default()
        };
        node.style = self.export(layer, AssetCategory::Style, &base, None, directives.style)?;
        for (variant, setting) in &directives.style_variants {
            let variant_stem = variant_stems
                .get(variant.as_str())
                .cloned()
                .unwrap_or_else(|| slugify(variant));
            let variant_base = format!("{}.{}", base, variant_stem);
            if let Some(block) = self.export(
                layer,
                AssetCategory::Style,
                &variant_base,
                Some(variant.as_str()),
                *setting,
            )? {
                node.styles.insert(variant.clone(), block);
            }
        }
        node.definition =
            self.export(layer, AssetCategory::Definition, &base, None, directives.definition)?;
        node.source = self.export(layer, AssetCategory::Source, &base, None, directives.source)?;
        Ok(node)
    }

    fn export(
        &mut self,
        layer: &LayerItem,
        category: AssetCategory,
        base: &str,
        style: Option<&str>,
        setting: ExportSetting,
    ) -> ToppingResult<Option<AssetBlock>> {
        if !setting.export {
            return Ok(None);
        }
        let categories = match category {
            AssetCategory::Style => setting.categories,
            _ => None,
        };
        let file_name = format!("{}.{}", base, category.extension());
        let path = self.target.resolve_path(&file_name, category)?;
        let request = AssetRequest {
            category,
            layer_id: &layer.layer_id,
            layer_name: &layer.name,
            style,
            categories,
        };
        self.writer
            .write_asset(&request, &self.target.main_dir.join(&path))?;

        Ok(Some(AssetBlock {
            path,
            categories: categories.map(|c| c.names()),
        }))
    }
}

/// `slug` when free or already held by `owner`, else the first free
/// `slug-2`, `slug-3`, ... Slugs never contain `-`, so suffixed stems
/// cannot collide with plain ones.
fn claim(owners: &mut HashMap<String, String>, slug: String, owner: &str) -> String {
    let mut candidate = slug.clone();
    let mut counter = 1;
    loop {
        match owners.get(&candidate) {
            Some(existing) if existing == owner => return candidate,
            Some(_) => {
                counter += 1;
                candidate = format!("{}-{}", slug, counter);
            }
            None => {
                owners.insert(candidate.clone(), owner.to_string());
                return candidate;
            }
        }
    }
}

fn select_themes(themes: &[MapThemeRecord], selection: &[String]) -> Ordered<ThemeDocument> {
    let mut selected = Ordered::default();
    for name in selection {
        match themes.iter().find(|theme| &theme.name == name) {
            Some(theme) => selected.insert(name.clone(), ThemeDocument::from(theme)),
            None => log::warn!(
                target: "toppingmaker::generate",
                "Map theme '{}' is not part of the project, skipping",
                name
            ),
        }
    }
    selected
}
