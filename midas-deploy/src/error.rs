//! Error types for midas-deploy.

use std::path::PathBuf;

use thiserror::Error;

use midas_core::ErrorKind;

use crate::store::StoreError;

/// All errors that can arise while publishing a build directory.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Directory traversal failed; the walk ended here.
    #[error("walking {}: {source}", .root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A walked path could not be made relative to the public root.
    #[error("{} is not inside {}", .path.display(), .root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },

    /// Opening or inspecting a local artifact failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The object store rejected an upload. Remaining uploads were skipped.
    #[error("upload of {key} to bucket {bucket} failed: {source}")]
    Upload {
        bucket: String,
        key: String,
        #[source]
        source: StoreError,
    },
}

impl DeployError {
    /// Coarse classification for callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeployError::Walk { source, .. }
                if source
                    .io_error()
                    .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound) =>
            {
                ErrorKind::NotFound
            }
            DeployError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                ErrorKind::NotFound
            }
            _ => ErrorKind::Internal,
        }
    }
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DeployError {
    DeployError::Io {
        path: path.into(),
        source,
    }
}
