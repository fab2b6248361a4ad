//! The repository: a content tree on disk and the walk that indexes it.
//!
//! # Walk
//! [`Repository::items`] starts a background producer that visits every
//! non-reserved directory depth-first, parents before children and siblings
//! in name order, and publishes exactly one event per directory:
//!
//!   1. a node whose path vanished yields `PathNotFound` and is not descended;
//!   2. a reserved node yields `ReservedPath` (only reachable as the walk
//!      target, reserved children are skipped silently);
//!   3. otherwise the directory is classified and its item (or the item's
//!      construction error) is published, then each child is walked in turn.
//!
//! Failures stay local to their node. The stream closes after the last
//! directory has been visited.

use std::fs;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sha2::{Digest, Sha256};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::classify::Classifier;
use crate::config::IndexerRules;
use crate::error::{IndexError, Result};
use crate::event::{EventSink, ItemStream, RepositoryEvent};
use crate::files::{is_directory_entry, read_dir_sorted};

#[derive(Debug, Clone)]
pub struct Repository {
    id: String,
    directory: PathBuf,
    rules: Arc<IndexerRules>,
}

impl Repository {
    /// Opens the content tree at `path`.
    ///
    /// A file path is replaced by its parent directory. The path must exist
    /// and its base name must not be one of the reserved names. A hidden
    /// root is accepted even with `skip_hidden`; that rule only applies to
    /// directories below the root.
    pub fn new(path: impl AsRef<Path>, rules: IndexerRules) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IndexError::PathNotFound(path.to_path_buf()));
        }

        let canonical = fs::canonicalize(path).map_err(|source| IndexError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let directory = if canonical.is_dir() {
            canonical
        } else {
            canonical
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| IndexError::PathNotFound(path.to_path_buf()))?
        };

        if rules.is_reserved_name(&directory) {
            return Err(IndexError::ReservedPath(directory));
        }

        let name = directory
            .file_name()
            .map(|name| name.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let id = repository_hash(&name);

        info!(
            repository = %directory.display(),
            id = %id,
            "Opened repository"
        );

        Ok(Self {
            id,
            directory,
            rules: Arc::new(rules),
        })
    }

    /// Stable identifier derived from the lowercased root directory name.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn path(&self) -> &Path {
        &self.directory
    }

    pub fn rules(&self) -> &IndexerRules {
        &self.rules
    }

    /// Streams every item of the repository.
    ///
    /// The walk runs on the blocking pool of the current tokio runtime. Called
    /// outside a runtime, the stream yields a single `NoRuntime` error.
    pub fn items(&self) -> ItemStream {
        self.items_with_cancellation(CancellationToken::new())
    }

    /// Like [`Repository::items`], stopping early once `cancel` fires.
    pub fn items_with_cancellation(&self, cancel: CancellationToken) -> ItemStream {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                error!(error = %e, "Cannot index repository outside a tokio runtime");
                return ItemStream::failed(IndexError::NoRuntime);
            }
        };
        let (mut sink, stream) = ItemStream::channel(cancel.child_token(), handle);
        let repository = self.clone();

        tokio::task::spawn_blocking(move || {
            info!(repository = %repository.directory.display(), "Indexing repository");
            let root = repository.directory.clone();
            let mut classifier = Classifier::new(&repository.directory, &repository.rules);
            let outcome = walk_node(&root, &mut classifier, &repository.rules, &mut sink);
            match outcome {
                ControlFlow::Continue(()) if !sink.is_cancelled() => {
                    info!(repository = %repository.directory.display(), "Indexing complete")
                }
                _ => info!(repository = %repository.directory.display(), "Indexing stopped early"),
            }
            // Dropping the sink closes the stream.
        });

        stream
    }

    /// Hook for live change notification. Always an empty, closed stream.
    pub fn changed(&self) -> ItemStream {
        ItemStream::closed()
    }

    /// Walks the whole tree synchronously into `sink`.
    pub fn walk<S: EventSink>(&self, sink: &mut S) {
        self.walk_from(&self.directory, sink);
    }

    /// Walks the subtree at `path`, which should lie inside the repository.
    pub fn walk_from<S: EventSink>(&self, path: &Path, sink: &mut S) {
        let mut classifier = Classifier::new(&self.directory, &self.rules);
        let _ = walk_node(path, &mut classifier, &self.rules, sink);
    }
}

fn repository_hash(name: &str) -> String {
    format!("{:x}", Sha256::digest(name.as_bytes()))
}

fn walk_node<S: EventSink>(
    path: &Path,
    classifier: &mut Classifier<'_>,
    rules: &IndexerRules,
    sink: &mut S,
) -> ControlFlow<()> {
    if !path.exists() {
        warn!(path = %path.display(), "Path vanished before it could be indexed");
        return sink.publish(RepositoryEvent::from_error(IndexError::PathNotFound(
            path.to_path_buf(),
        )));
    }

    let reserved = if path == classifier.repository_root() {
        rules.is_reserved_name(path)
    } else {
        rules.is_reserved(path)
    };
    if reserved {
        return sink.publish(RepositoryEvent::from_error(IndexError::ReservedPath(
            path.to_path_buf(),
        )));
    }

    let directory = if path.is_dir() {
        path
    } else {
        path.parent().unwrap_or(path)
    };

    let event = RepositoryEvent::from(classifier.build_item(directory));
    if let Some(error) = event.error() {
        warn!(error = %error, directory = %directory.display(), "Failed to build item");
    }
    sink.publish(event)?;

    for child in child_directories(directory, rules) {
        walk_node(&child, classifier, rules, sink)?;
    }
    ControlFlow::Continue(())
}

/// Non-reserved child directories of `directory`, by name.
fn child_directories(directory: &Path, rules: &IndexerRules) -> Vec<PathBuf> {
    read_dir_sorted(directory)
        .into_iter()
        .filter(is_directory_entry)
        .map(|entry| entry.path())
        .filter(|path| {
            let reserved = rules.is_reserved(path);
            if reserved {
                debug!(path = %path.display(), "Skipping reserved directory");
            }
            !reserved
        })
        .collect()
}
