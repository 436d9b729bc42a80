//! Content-model resolution: model name → archetype and output directory.

use std::fmt;
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::types::{ModelName, SiteConfig};

/// Which group of the site config a model was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Collection,
    Single,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::Collection => write!(f, "collection"),
            ModelKind::Single => write!(f, "single"),
        }
    }
}

/// A model with its paths resolved against the site root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModel {
    pub name: ModelName,
    pub kind: ModelKind,
    pub archetype_path: PathBuf,
    pub output_dir: PathBuf,
}

impl ResolvedModel {
    pub fn is_single(&self) -> bool {
        self.kind == ModelKind::Single
    }
}

impl SiteConfig {
    /// Look `model` up in collection types first, then single types.
    ///
    /// Returns [`ConfigError::UnknownModel`] when neither group defines it.
    pub fn resolve_model(&self, model: &ModelName) -> Result<ResolvedModel, ConfigError> {
        let (found, kind) = if let Some(m) = self.collection_types.get(&model.0) {
            (m, ModelKind::Collection)
        } else if let Some(m) = self.single_types.get(&model.0) {
            (m, ModelKind::Single)
        } else {
            return Err(ConfigError::UnknownModel {
                model: model.0.clone(),
            });
        };

        Ok(ResolvedModel {
            name: model.clone(),
            kind,
            archetype_path: self.resolve_path(&found.archetype_path),
            output_dir: self.resolve_path(&found.output_dir),
        })
    }
}
