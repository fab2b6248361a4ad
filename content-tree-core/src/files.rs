//! Discovery of the secondary files attached to an item.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::IndexerRules;
use crate::content::{ContentProvider, FileContentProvider};
use crate::route::Route;

/// A non-document resource attached to an item, such as an image or an
/// attachment.
#[derive(Clone)]
pub struct File {
    route: Route,
    path: PathBuf,
    content: Arc<dyn ContentProvider>,
}

impl File {
    pub fn new(route: Route, path: PathBuf, content: Arc<dyn ContentProvider>) -> Self {
        Self {
            route,
            path,
            content,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content_provider(&self) -> Arc<dyn ContentProvider> {
        Arc::clone(&self.content)
    }
}

impl std::fmt::Debug for File {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("File")
            .field("route", &self.route)
            .field("path", &self.path)
            .finish()
    }
}

/// Lists the entries of `directory` sorted by name.
///
/// Enumeration failures are permissive: they are logged and yield an empty
/// listing so one unreadable directory cannot stop a walk.
pub(crate) fn read_dir_sorted(directory: &Path) -> Vec<fs::DirEntry> {
    let reader = match fs::read_dir(directory) {
        Ok(reader) => reader,
        Err(e) => {
            warn!(error = ?e, path = %directory.display(), "Failed to list directory, treating as empty");
            return Vec::new();
        }
    };

    let mut entries: Vec<fs::DirEntry> = reader
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = ?e, path = %directory.display(), "Skipping unreadable directory entry");
                None
            }
        })
        .collect();
    entries.sort_by_key(|entry| entry.file_name());
    entries
}

/// True for real directories. Symlinked directories are not followed.
pub(crate) fn is_directory_entry(entry: &fs::DirEntry) -> bool {
    entry.file_type().map(|t| t.is_dir()).unwrap_or(false)
}

/// Collects every regular file below `files_directory`, skipping reserved
/// subdirectories, in traversal order.
///
/// A missing or unreadable `files_directory` yields no files. A file whose
/// route cannot be built is skipped; it never fails the owning item.
pub fn get_files(
    repository_root: &Path,
    item_directory: &Path,
    files_directory: &Path,
    rules: &IndexerRules,
) -> Vec<File> {
    let mut files = Vec::new();
    if !files_directory.is_dir() {
        debug!(
            item = %item_directory.display(),
            files_directory = %files_directory.display(),
            "No files directory for item"
        );
        return files;
    }

    collect_files(repository_root, files_directory, rules, &mut files);
    debug!(
        item = %item_directory.display(),
        count = files.len(),
        "Discovered item files"
    );
    files
}

fn collect_files(
    repository_root: &Path,
    directory: &Path,
    rules: &IndexerRules,
    results: &mut Vec<File>,
) {
    for entry in read_dir_sorted(directory) {
        let path = entry.path();
        if is_directory_entry(&entry) {
            if rules.is_reserved(&path) {
                debug!(path = %path.display(), "Skipping reserved directory");
                continue;
            }
            collect_files(repository_root, &path, rules, results);
        } else if path.is_file() {
            match Route::from_file_path(repository_root, &path) {
                Ok(route) => {
                    let content = FileContentProvider::new(path.clone(), route.clone());
                    results.push(File::new(route, path, Arc::new(content)));
                }
                Err(e) => {
                    warn!(error = %e, path = %path.display(), "Skipping file outside repository");
                }
            }
        }
    }
}
