//! Lazy sources of item and file content.
//!
//! Items and files never hold their bytes; they hold a [`ContentProvider`]
//! which is asked for the data when a consumer needs it.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::error::{IndexError, Result};
use crate::route::Route;

/// Yields the byte content of an item or file on demand.
///
/// `data` never changes the route. Only file-backed providers can fail.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Route of the item or file this content belongs to.
    fn route(&self) -> &Route;

    /// Reads the content.
    async fn data(&self) -> Result<Vec<u8>>;
}

/// Content backed by a file on disk, re-read on every call.
#[derive(Debug, Clone)]
pub struct FileContentProvider {
    path: PathBuf,
    route: Route,
}

impl FileContentProvider {
    pub fn new(path: impl Into<PathBuf>, route: Route) -> Self {
        Self {
            path: path.into(),
            route,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ContentProvider for FileContentProvider {
    fn route(&self) -> &Route {
        &self.route
    }

    async fn data(&self) -> Result<Vec<u8>> {
        tokio::fs::read(&self.path).await.map_err(|source| {
            tracing::error!(error = ?source, path = %self.path.display(), "Failed to read content file");
            IndexError::Io {
                path: self.path.clone(),
                source,
            }
        })
    }
}

/// Precomputed in-memory content, used for synthesized placeholder pages.
#[derive(Debug, Clone)]
pub struct TextContentProvider {
    content: String,
    route: Route,
}

impl TextContentProvider {
    pub fn new(content: impl Into<String>, route: Route) -> Self {
        Self {
            content: content.into(),
            route,
        }
    }

    /// Placeholder page for a directory without a document: a single heading
    /// carrying the directory name.
    pub fn placeholder(directory: &Path, route: Route) -> Self {
        let title = directory
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(format!("# {title}"), route)
    }

    pub fn text(&self) -> &str {
        &self.content
    }
}

#[async_trait]
impl ContentProvider for TextContentProvider {
    fn route(&self) -> &Route {
        &self.route
    }

    async fn data(&self) -> Result<Vec<u8>> {
        Ok(self.content.clone().into_bytes())
    }
}
