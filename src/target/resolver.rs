//! Path resolver that stamps every registered file with an id and a version.

use super::{AssetCategory, PathResolver, Target, ToppingFileInfo, path_string};
use crate::error::ToppingResult;

/// Registers files as `{category}_{name}_001` ids (made unique within the
/// target) with a version stamp, keeping the default directory layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedPathResolver {
    version: String,
}

impl VersionedPathResolver {
    /// Resolver stamping files with today's date (`YYYY-MM-DD`).
    pub fn new() -> Self {
        Self::with_version(chrono::Local::now().format("%Y-%m-%d").to_string())
    }

    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl Default for VersionedPathResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PathResolver for VersionedPathResolver {
    fn resolve(
        &self,
        target: &mut Target,
        name: &str,
        category: AssetCategory,
    ) -> ToppingResult<String> {
        let (_, relative) = target.filedir_path(category.dir_name())?;
        let id = target.unique_id(&format!("{}_{}_001", category, name));
        let path = path_string(&relative.join(name));
        target.toppingfileinfo_list.push(ToppingFileInfo {
            path: path.clone(),
            category,
            id: Some(id),
            version: Some(self.version.clone()),
        });
        Ok(path)
    }
}
