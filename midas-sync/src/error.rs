//! Error types for midas-sync.

use std::path::{Path, PathBuf};

use thiserror::Error;

use midas_core::{ConfigError, EntryId, ErrorKind, RegistryError};
use midas_renderer::RenderError;

/// All errors that can arise from entry synchronization and site builds.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Configuration problem (unknown model, ...).
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// The model resolved but its archetype file is missing.
    #[error("archetype for model {model} does not exist at {path}")]
    MissingArchetype { model: String, path: PathBuf },

    /// The site names a registry backend absent from the constructor table.
    #[error("requested registry type {kind} does not exist")]
    UnknownRegistry { kind: String },

    /// The title slugifies to nothing usable as a filename.
    #[error("title {title:?} does not produce a usable file name")]
    InvalidTitle { title: String },

    /// Update/remove for an entry the registry does not know.
    #[error("entry {entry_id} is not registered")]
    NotRegistered {
        entry_id: EntryId,
        #[source]
        source: RegistryError,
    },

    /// Create for an entry id the registry already maps.
    #[error("entry {entry_id} is already registered at {}", .path.display())]
    AlreadyRegistered { entry_id: EntryId, path: PathBuf },

    /// The target output file is already taken.
    #[error("output file {} already exists", .path.display())]
    Conflict { path: PathBuf },

    /// An error from the rendering engine.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// Registry storage could not be read, or could not be created.
    #[error("registry storage unavailable: {0}")]
    Storage(#[source] RegistryError),

    /// A registry mutation or flush failed. `written` is the file that was
    /// already rendered when the registry step failed, if any.
    #[error("registry error for {entry_id}: {source}")]
    Registry {
        entry_id: EntryId,
        written: Option<PathBuf>,
        #[source]
        source: RegistryError,
    },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The site generator could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The site generator exited unsuccessfully; `output` is verbatim.
    #[error("{program} build errored: {status}\ncommand output: {output}")]
    Build {
        program: String,
        status: std::process::ExitStatus,
        output: String,
    },
}

impl SyncError {
    /// Coarse classification for callers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::Config(_)
            | SyncError::MissingArchetype { .. }
            | SyncError::UnknownRegistry { .. }
            | SyncError::InvalidTitle { .. } => ErrorKind::Config,
            SyncError::NotRegistered { .. } => ErrorKind::NotFound,
            SyncError::Conflict { .. } | SyncError::AlreadyRegistered { .. } => ErrorKind::Conflict,
            SyncError::Render(e) if e.is_not_found() => ErrorKind::NotFound,
            SyncError::Storage(source) | SyncError::Registry { source, .. } => source.kind(),
            _ => ErrorKind::Internal,
        }
    }

    /// Output file left on disk by an operation whose registry step failed.
    pub fn written_path(&self) -> Option<&Path> {
        match self {
            SyncError::Registry { written, .. } => written.as_deref(),
            _ => None,
        }
    }
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
