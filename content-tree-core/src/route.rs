//! Routes: hierarchical identifiers for items and files, relative to a
//! repository root.
//!
//! A route is the ordered list of path segments between the repository root
//! and the thing it identifies. No case folding or separator translation
//! happens here; segments are taken from the host path as they are.

use std::fmt;
use std::path::{Component, Path};

use crate::error::{IndexError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Route {
    segments: Vec<String>,
}

impl Route {
    /// Route of the item whose source file is `file_path`: the file's parent
    /// directory, relative to `repository_root`.
    pub fn from_item_path(repository_root: &Path, file_path: &Path) -> Result<Self> {
        let directory = file_path.parent().unwrap_or(file_path);
        Self::from_relative(repository_root, directory)
    }

    /// Route of the item living in `directory`.
    pub fn from_item_directory(repository_root: &Path, directory: &Path) -> Result<Self> {
        Self::from_relative(repository_root, directory)
    }

    /// Route of a file attached to an item. Keeps the file name as the last
    /// segment so every file is individually addressable.
    pub fn from_file_path(repository_root: &Path, file_path: &Path) -> Result<Self> {
        Self::from_relative(repository_root, file_path)
    }

    /// Route for a slash separated request path such as `/docs/intro`.
    pub fn from_request(request: &str) -> Self {
        let segments = request
            .split('/')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_owned)
            .collect();
        Self { segments }
    }

    fn from_relative(repository_root: &Path, path: &Path) -> Result<Self> {
        let relative = path
            .strip_prefix(repository_root)
            .map_err(|_| IndexError::OutsideRoot {
                path: path.to_path_buf(),
                root: repository_root.to_path_buf(),
            })?;

        let segments = relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// True iff `self` is a proper extension of `other`.
    pub fn is_child_of(&self, other: &Route) -> bool {
        self.segments.len() > other.segments.len()
            && self.segments.starts_with(&other.segments)
    }

    pub fn parent(&self) -> Option<Route> {
        if self.is_root() {
            return None;
        }
        let mut segments = self.segments.clone();
        segments.pop();
        Some(Route { segments })
    }

    /// Machine-facing value, e.g. `docs/intro`. The root is the empty string.
    pub fn value(&self) -> String {
        self.segments.join("/")
    }

    /// Human-facing value, e.g. `/docs/intro`.
    pub fn pretty_value(&self) -> String {
        format!("/{}", self.value())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value())
    }
}
