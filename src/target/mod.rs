//! Target: where a topping is written and which files it consists of.
//!
//! A [`Target`] owns the root directory, the project subdirectory below it
//! and the registry ([`Target::toppingfileinfo_list`]) of every file
//! generation asked for. All registered paths are relative to `main_dir`.

pub mod resolver;

pub use resolver::VersionedPathResolver;

use crate::error::{ToppingError, ToppingResult};
use path_clean::PathClean;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Width of the numeric suffix [`Target::unique_id`] walks.
const ID_SUFFIX_WIDTH: usize = 3;

/// Kind of file a topping consists of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetCategory {
    #[serde(rename = "layerstyle")]
    Style,
    #[serde(rename = "layerdefinition")]
    Definition,
    #[serde(rename = "layersource")]
    Source,
    #[serde(rename = "projecttopping")]
    Topping,
}

impl AssetCategory {
    /// Conventional subdirectory below the target's `sub_dir`.
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Style => "layerstyle",
            Self::Definition => "layerdefinition",
            Self::Source => "layersource",
            Self::Topping => "projecttopping",
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Style => "qml",
            Self::Definition => "qlr",
            Self::Source | Self::Topping => "yaml",
        }
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// One registered topping file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToppingFileInfo {
    /// Path relative to the target's `main_dir`.
    pub path: String,
    #[serde(rename = "type")]
    pub category: AssetCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Decides the path under which a file is referenced in the topping.
///
/// Called once per file occurrence with the target, the file name and its
/// category. Implementations MUST append exactly one [`ToppingFileInfo`] to
/// `target.toppingfileinfo_list` and return the path stored in it.
pub trait PathResolver {
    fn resolve(
        &self,
        target: &mut Target,
        name: &str,
        category: AssetCategory,
    ) -> ToppingResult<String>;
}

impl<F> PathResolver for F
where
    F: Fn(&mut Target, &str, AssetCategory) -> ToppingResult<String>,
{
    fn resolve(
        &self,
        target: &mut Target,
        name: &str,
        category: AssetCategory,
    ) -> ToppingResult<String> {
        self(target, name, category)
    }
}

/// Default policy: `sub_dir/<category dir>/<name>`, no id, no version.
pub fn default_path_resolver(
    target: &mut Target,
    name: &str,
    category: AssetCategory,
) -> ToppingResult<String> {
    let (_, relative) = target.filedir_path(category.dir_name())?;
    let path = path_string(&relative.join(name));
    target.toppingfileinfo_list.push(ToppingFileInfo {
        path: path.clone(),
        category,
        id: None,
        version: None,
    });
    Ok(path)
}

/// Deployment context generation writes into.
pub struct Target {
    /// Logical name of the target, e.g. a repository slug.
    pub identifier: String,
    pub main_dir: PathBuf,
    /// Project directory relative to `main_dir`.
    pub sub_dir: PathBuf,
    pub toppingfileinfo_list: Vec<ToppingFileInfo>,
    path_resolver: Option<Arc<dyn PathResolver + Send + Sync>>,
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("identifier", &self.identifier)
            .field("main_dir", &self.main_dir)
            .field("sub_dir", &self.sub_dir)
            .field("toppingfileinfo_list", &self.toppingfileinfo_list)
            .field("custom_path_resolver", &self.path_resolver.is_some())
            .finish()
    }
}

impl Target {
    pub fn new(
        identifier: impl Into<String>,
        main_dir: impl Into<PathBuf>,
        sub_dir: impl AsRef<Path>,
    ) -> Self {
        let sub_dir = sub_dir.as_ref().clean();
        Self {
            identifier: identifier.into(),
            main_dir: main_dir.into(),
            sub_dir: if sub_dir == Path::new(".") {
                PathBuf::new()
            } else {
                sub_dir
            },
            toppingfileinfo_list: Vec::new(),
            path_resolver: None,
        }
    }

    /// Replace the default path policy with `resolver`.
    pub fn with_path_resolver<R>(mut self, resolver: R) -> Self
    where
        R: PathResolver + Send + Sync + 'static,
    {
        self.path_resolver = Some(Arc::new(resolver));
        self
    }

    pub fn has_custom_path_resolver(&self) -> bool {
        self.path_resolver.is_some()
    }

    /// Absolute and `main_dir`-relative path of the `dirname` subdirectory,
    /// creating it (and its parents) when missing.
    pub fn filedir_path(&self, dirname: &str) -> ToppingResult<(PathBuf, PathBuf)> {
        let relative = self.sub_dir.join(dirname);
        let absolute = self.main_dir.join(&relative);
        fs::create_dir_all(&absolute).map_err(|e| ToppingError::io(&absolute, e))?;
        Ok((absolute, relative))
    }

    /// Register `name` of `category` and return the path to reference it by.
    pub fn resolve_path(&mut self, name: &str, category: AssetCategory) -> ToppingResult<String> {
        let registered = self.toppingfileinfo_list.len();
        let path = match self.path_resolver.clone() {
            Some(resolver) => resolver.resolve(self, name, category)?,
            None => default_path_resolver(self, name, category)?,
        };
        if self.toppingfileinfo_list.len() == registered {
            log::warn!(
                target: "toppingmaker::target",
                "Path resolver registered nothing for {} '{}'",
                category,
                name
            );
        }
        log::debug!(
            target: "toppingmaker::target",
            "Registered {} '{}' as {}",
            category,
            name,
            path
        );
        Ok(path)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.toppingfileinfo_list
            .iter()
            .any(|info| info.id.as_deref() == Some(id))
    }

    /// `proposed`, or the first free id reached by incrementing its
    /// trailing three-digit suffix.
    ///
    /// Ids without a numeric suffix get `_001` appended on first collision.
    pub fn unique_id(&self, proposed: &str) -> String {
        let mut id = proposed.to_string();
        while self.contains_id(&id) {
            id = bump_suffix(&id);
        }
        id
    }

    /// Registered entries of one category, in registration order.
    pub fn files_of(&self, category: AssetCategory) -> impl Iterator<Item = &ToppingFileInfo> {
        self.toppingfileinfo_list
            .iter()
            .filter(move |info| info.category == category)
    }

    /// The registry as pretty-printed JSON.
    pub fn registry_json(&self) -> ToppingResult<String> {
        Ok(serde_json::to_string_pretty(&self.toppingfileinfo_list)?)
    }
}

fn bump_suffix(id: &str) -> String {
    let split = id.len().saturating_sub(ID_SUFFIX_WIDTH);
    let suffix = id
        .get(split..)
        .filter(|s| s.len() == ID_SUFFIX_WIDTH && s.bytes().all(|b| b.is_ascii_digit()));
    match suffix.and_then(|s| s.parse::<u32>().ok()) {
        Some(counter) => format!(
            "{}{:0width$}",
            &id[..split],
            counter + 1,
            width = ID_SUFFIX_WIDTH
        ),
        None => format!("{}_{:0width$}", id, 1, width = ID_SUFFIX_WIDTH),
    }
}

pub(crate) fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
