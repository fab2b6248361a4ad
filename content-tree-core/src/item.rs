use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::content::ContentProvider;
use crate::files::File;
use crate::route::Route;

/// How an item's content was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Backed by a document file found directly in the directory.
    Document,
    /// No document anywhere in the subtree; placeholder content.
    Virtual,
    /// No document directly inside, but one somewhere below; placeholder
    /// content and every file of the directory attached.
    Collection,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ItemKind::Document => "document",
            ItemKind::Virtual => "virtual",
            ItemKind::Collection => "collection",
        };
        f.pad(name)
    }
}

/// One published catalog entry, corresponding to one directory.
#[derive(Clone)]
pub struct Item {
    route: Route,
    kind: ItemKind,
    directory: PathBuf,
    content: Arc<dyn ContentProvider>,
    files: Vec<File>,
}

impl Item {
    pub fn new(
        route: Route,
        kind: ItemKind,
        directory: PathBuf,
        content: Arc<dyn ContentProvider>,
        files: Vec<File>,
    ) -> Self {
        Self {
            route,
            kind,
            directory,
            content,
            files,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn content_provider(&self) -> Arc<dyn ContentProvider> {
        Arc::clone(&self.content)
    }

    pub fn files(&self) -> &[File] {
        &self.files
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("route", &self.route)
            .field("kind", &self.kind)
            .field("directory", &self.directory)
            .field("files", &self.files)
            .finish()
    }
}
