//! Directory classification: decides whether a directory becomes a
//! document, virtual or collection item, and builds that item.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::config::IndexerRules;
use crate::content::{FileContentProvider, TextContentProvider};
use crate::error::Result;
use crate::files::{get_files, is_directory_entry, read_dir_sorted};
use crate::item::{Item, ItemKind};
use crate::route::Route;

/// Outcome of classifying one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The directory holds this document file (first by name if several).
    Document(PathBuf),
    Virtual,
    Collection,
}

impl Classification {
    pub fn kind(&self) -> ItemKind {
        match self {
            Classification::Document(_) => ItemKind::Document,
            Classification::Virtual => ItemKind::Virtual,
            Classification::Collection => ItemKind::Collection,
        }
    }
}

/// Classifies directories of one repository.
///
/// The "document somewhere below" lookahead is memoised per directory, so a
/// classifier should live for exactly one walk over an unchanging tree.
pub struct Classifier<'a> {
    repository_root: &'a Path,
    rules: &'a IndexerRules,
    lookahead: HashMap<PathBuf, bool>,
}

impl<'a> Classifier<'a> {
    pub fn new(repository_root: &'a Path, rules: &'a IndexerRules) -> Self {
        Self {
            repository_root,
            rules,
            lookahead: HashMap::new(),
        }
    }

    pub fn repository_root(&self) -> &Path {
        self.repository_root
    }

    /// First document file directly inside `directory`, by name.
    pub fn find_document(&self, directory: &Path) -> Option<PathBuf> {
        read_dir_sorted(directory)
            .into_iter()
            .map(|entry| entry.path())
            .find(|path| self.rules.is_document_name(path) && path.is_file())
    }

    /// Whether `directory` or any non-reserved directory below it holds a
    /// document. Reserved directories contribute nothing.
    pub fn contains_document(&mut self, directory: &Path) -> bool {
        if let Some(&found) = self.lookahead.get(directory) {
            return found;
        }

        let mut found = false;
        let mut children = Vec::new();
        for entry in read_dir_sorted(directory) {
            let path = entry.path();
            if is_directory_entry(&entry) {
                if !self.rules.is_reserved(&path) {
                    children.push(path);
                }
            } else if self.rules.is_document_name(&path) && path.is_file() {
                found = true;
                break;
            }
        }
        if !found {
            found = children.iter().any(|child| self.contains_document(child));
        }

        self.lookahead.insert(directory.to_path_buf(), found);
        found
    }

    pub fn classify(&mut self, directory: &Path) -> Classification {
        if let Some(document) = self.find_document(directory) {
            return Classification::Document(document);
        }
        if self.contains_document(directory) {
            Classification::Collection
        } else {
            Classification::Virtual
        }
    }

    /// Classifies `directory` and constructs the matching item.
    pub fn build_item(&mut self, directory: &Path) -> Result<Item> {
        let classification = self.classify(directory);
        debug!(
            directory = %directory.display(),
            kind = %classification.kind(),
            "Classified directory"
        );

        let root = self.repository_root;
        let conventional_files = directory.join(self.rules.files_directory());

        match classification {
            Classification::Document(document) => {
                let route = Route::from_item_path(root, &document)?;
                let content = FileContentProvider::new(document, route.clone());
                let files = get_files(root, directory, &conventional_files, self.rules);
                Ok(Item::new(
                    route,
                    ItemKind::Document,
                    directory.to_path_buf(),
                    Arc::new(content),
                    files,
                ))
            }
            Classification::Virtual => {
                let route = Route::from_item_directory(root, directory)?;
                let content = TextContentProvider::placeholder(directory, route.clone());
                let files = get_files(root, directory, &conventional_files, self.rules);
                Ok(Item::new(
                    route,
                    ItemKind::Virtual,
                    directory.to_path_buf(),
                    Arc::new(content),
                    files,
                ))
            }
            Classification::Collection => {
                let route = Route::from_item_directory(root, directory)?;
                let content = TextContentProvider::placeholder(directory, route.clone());
                // Grouping nodes take every file of the directory, not only
                // the conventional subfolder.
                let files = get_files(root, directory, directory, self.rules);
                Ok(Item::new(
                    route,
                    ItemKind::Collection,
                    directory.to_path_buf(),
                    Arc::new(content),
                    files,
                ))
            }
        }
    }
}
