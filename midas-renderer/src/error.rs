//! Error types for midas-renderer.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from archetype rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Tera template engine error (parse or render).
    #[error("template error in {template}: {source}")]
    Tera {
        template: String,
        #[source]
        source: tera::Error,
    },

    /// JSON serialization error (building tera context).
    #[error("context serialization error: {0}")]
    Serialization(#[from] tera::Error),

    /// Filesystem error while reading an archetype.
    #[error("archetype io error at {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
}

impl RenderError {
    /// True when the archetype file vanished between resolution and rendering.
    pub fn is_not_found(&self) -> bool {
        matches!(self, RenderError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
