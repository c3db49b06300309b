use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to load one of the content documents.
///
/// An unknown language or lesson id is not an error; lookups fall back to an
/// empty sequence instead.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("entry '{key}' in {} is not a list", path.display())]
    NotAList { path: PathBuf, key: String },
}

impl ContentError {
    /// File the error originated from
    pub fn path(&self) -> &Path {
        match self {
            ContentError::Read { path, .. }
            | ContentError::Parse { path, .. }
            | ContentError::NotAList { path, .. } => path,
        }
    }
}
