pub mod config;
pub mod error;
pub mod host;
pub mod settings;
pub mod target;
pub mod topping;

pub use error::{ToppingError, ToppingResult};
pub use host::{AssetRequest, AssetWriter, HostLayer, HostNode, HostProject, MapThemeRecord, NodeId};
pub use settings::{ExportSetting, ExportSettings, SettingLookup, StyleCategories, ToppingType};
pub use target::{AssetCategory, PathResolver, Target, ToppingFileInfo, VersionedPathResolver};
pub use topping::{LayerTree, LayerTreeItem, ProjectTopping};
