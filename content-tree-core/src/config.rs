use std::collections::HashSet;
use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;

pub const DEFAULT_FILES_DIRECTORY: &str = "files";

pub const DEFAULT_DOCUMENT_PATTERN: &str =
    r"(?i)\.(md|markdown|mdown|mkdn|mkd|mdwn|mdtxt|mdtext)$";

/// Static indexer settings, as they appear in a configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexerConfig {
    /// Name of the conventional subfolder holding an item's attachments.
    pub files_directory: String,
    /// Directory names excluded from classification, recursion and file
    /// discovery. Compared case-insensitively.
    pub reserved_directories: Vec<String>,
    /// Treat every dot-directory as reserved.
    pub skip_hidden: bool,
    /// Regex matched against a file name to recognise a document.
    pub document_pattern: String,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            files_directory: DEFAULT_FILES_DIRECTORY.to_string(),
            reserved_directories: vec![
                DEFAULT_FILES_DIRECTORY.to_string(),
                "theme".to_string(),
                "build".to_string(),
                ".content-tree".to_string(),
            ],
            skip_hidden: true,
            document_pattern: DEFAULT_DOCUMENT_PATTERN.to_string(),
        }
    }
}

impl IndexerConfig {
    pub fn trace_loaded(&self) {
        info!(
            files_directory = %self.files_directory,
            reserved_count = self.reserved_directories.len(),
            skip_hidden = self.skip_hidden,
            "Loaded IndexerConfig"
        );
        debug!(?self, "IndexerConfig loaded (full debug)");
    }

    /// Compiles the configuration into the rules the walker consults.
    pub fn compile(&self) -> Result<IndexerRules> {
        let document_pattern = Regex::new(&self.document_pattern)?;

        let mut reserved: HashSet<String> = self
            .reserved_directories
            .iter()
            .map(|name| name.to_lowercase())
            .collect();
        // The files convention directory can never become an item.
        reserved.insert(self.files_directory.to_lowercase());

        Ok(IndexerRules {
            files_directory: self.files_directory.clone(),
            reserved,
            skip_hidden: self.skip_hidden,
            document_pattern,
        })
    }
}

/// Compiled form of [`IndexerConfig`], injected into the classifier and the
/// tree walker.
#[derive(Debug, Clone)]
pub struct IndexerRules {
    files_directory: String,
    reserved: HashSet<String>,
    skip_hidden: bool,
    document_pattern: Regex,
}

impl Default for IndexerRules {
    fn default() -> Self {
        IndexerConfig::default()
            .compile()
            .expect("default document pattern is a valid regex")
    }
}

impl IndexerRules {
    pub fn files_directory(&self) -> &str {
        &self.files_directory
    }

    /// Whether the base name of `directory` is reserved. With `skip_hidden`
    /// every dot-prefixed name counts as reserved too.
    pub fn is_reserved(&self, directory: &Path) -> bool {
        let Some(name) = directory.file_name() else {
            return false;
        };
        let name = name.to_string_lossy().to_lowercase();
        if self.skip_hidden && name.starts_with('.') {
            return true;
        }
        self.reserved.contains(&name)
    }

    /// Whether the base name of `directory` is one of the reserved names,
    /// ignoring `skip_hidden`. Used for the repository root, which may be
    /// hidden itself.
    pub fn is_reserved_name(&self, directory: &Path) -> bool {
        directory
            .file_name()
            .map(|name| self.reserved.contains(&name.to_string_lossy().to_lowercase()))
            .unwrap_or(false)
    }

    /// Whether `path` names a document file. Only the name is inspected.
    pub fn is_document_name(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| self.document_pattern.is_match(&name.to_string_lossy()))
            .unwrap_or(false)
    }
}
