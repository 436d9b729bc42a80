//! Error types for midas-core.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification shared by every midas error type.
///
/// Callers (the CLI, a webhook layer) decide on exit codes and HTTP statuses
/// from this rather than matching individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad configuration or payload: unknown model, missing archetype,
    /// unknown registry backend, invalid title.
    Config,
    /// Something expected to exist does not (registry entry, file).
    NotFound,
    /// Output filename already taken.
    Conflict,
    /// Render, filesystem, registry, upload or build failure.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Config => write!(f, "config"),
            ErrorKind::NotFound => write!(f, "not found"),
            ErrorKind::Conflict => write!(f, "conflict"),
            ErrorKind::Internal => write!(f, "internal"),
        }
    }
}

/// Errors raised while loading or querying site and deployment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure reading a config file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file did not exist.
    #[error("config not found at {path}")]
    NotFound { path: PathBuf },

    /// YAML/JSON parse error; includes file path and line context from serde_yaml.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The model is neither a collection type nor a single type.
    #[error("model {model} is not defined in collection or single types")]
    UnknownModel { model: String },

    /// A required setting is empty.
    #[error("missing required setting `{field}`")]
    MissingField { field: &'static str },
}

/// Errors raised while validating an incoming content payload.
#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("payload metadata is missing `{field}`")]
    MissingMetadata { field: &'static str },

    #[error("payload entry is missing `{field}`")]
    MissingField { field: &'static str },

    #[error("payload field `{field}` must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },

    /// The payload document itself is not valid JSON of the expected shape.
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// All errors that can arise from entry registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Underlying I/O failure, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML serialization error (flush path).
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML parse error on open; includes file path and line context.
    #[error("failed to parse registry at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `open_storage` found nothing to open.
    #[error("registry storage not found at {location}")]
    StorageNotFound { location: String },

    /// The registry was used before `open_storage` or `create_storage`.
    #[error("registry storage is not open")]
    NotOpen,

    #[error("registry entry {entry_id} not found")]
    EntryNotFound { entry_id: String },

    #[error("registry entry {entry_id} already exists")]
    EntryExists { entry_id: String },
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RegistryError::EntryNotFound { .. } | RegistryError::StorageNotFound { .. } => {
                ErrorKind::NotFound
            }
            RegistryError::EntryExists { .. } => ErrorKind::Conflict,
            _ => ErrorKind::Internal,
        }
    }
}

pub(crate) fn registry_io(path: impl Into<PathBuf>, source: std::io::Error) -> RegistryError {
    RegistryError::Io {
        path: path.into(),
        source,
    }
}
