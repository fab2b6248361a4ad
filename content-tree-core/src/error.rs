use std::path::PathBuf;

/// Failures surfaced by the indexer.
///
/// Every variant is local to the node that produced it; a walk never aborts
/// because of one of these. Directory enumeration failures are not
/// represented here: they degrade to an empty listing.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("The path {0:?} does not exist.")]
    PathNotFound(PathBuf),

    #[error("The path {0:?} is using a reserved name.")]
    ReservedPath(PathBuf),

    #[error("The path {path:?} is not inside the repository root {root:?}.")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("Cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No tokio runtime is available to run the walk.")]
    NoRuntime,

    #[error("Invalid document pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, IndexError>;
