//! Project topping: parse a host project, generate the topping from it.
//!
//! ```text
//! host project --parse_project--> ProjectTopping --generate_files--> document + assets
//! ```
//!
//! The parsed [`LayerTree`] holds no host references, so generation can run
//! long after the host objects are gone, as long as the export settings were
//! keyed within the same session.

mod document;
mod generate;
pub mod layertree;

pub use generate::slugify;
pub use layertree::{ExportDirectives, GroupItem, LayerItem, LayerTree, LayerTreeItem};

use crate::error::ToppingResult;
use crate::host::{AssetWriter, HostProject, MapThemeRecord};
use crate::settings::ExportSettings;
use crate::target::Target;
use generate::Generator;

/// Parsed layer tree and map themes of one project.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectTopping {
    pub layertree: LayerTree,
    /// Every map theme of the project, in host order.
    pub map_themes: Vec<MapThemeRecord>,
    /// Themes to export, taken from the settings given at parse time.
    pub theme_selection: Vec<String>,
}

impl ProjectTopping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the layer tree and the map themes of `project`.
    ///
    /// When `settings` are given, their export decisions and theme list are
    /// stored with the parsed tree and used by [`Self::generate_files`]
    /// whenever it is called without settings.
    pub fn parse_project<P>(project: &P, settings: Option<&ExportSettings>) -> Self
    where
        P: HostProject + ?Sized,
    {
        let layertree = LayerTree::parse(&project.layer_tree_root(), settings);
        log::debug!(
            target: "toppingmaker::parse",
            "Parsed {} groups and {} layers",
            layertree.group_count(),
            layertree.layer_count()
        );
        Self {
            layertree,
            map_themes: project.map_themes(),
            theme_selection: settings
                .map(|settings| settings.map_themes.clone())
                .unwrap_or_default(),
        }
    }

    /// Write every requested asset and the topping document into `target`.
    ///
    /// `settings` take precedence over the decisions stored at parse time.
    /// Returns the document path relative to `target.main_dir`. On error the
    /// target's registry is left partially filled and should be discarded.
    pub fn generate_files(
        &self,
        target: &mut Target,
        settings: Option<&ExportSettings>,
        writer: &mut dyn AssetWriter,
    ) -> ToppingResult<String> {
        let theme_selection = settings
            .map(|settings| settings.map_themes.as_slice())
            .unwrap_or(self.theme_selection.as_slice());
        Generator::new(target, settings, writer).run(
            &self.layertree,
            &self.map_themes,
            theme_selection,
        )
    }
}
