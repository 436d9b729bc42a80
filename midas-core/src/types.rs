//! Domain types for midas: site layout, content models, entry identity and
//! deployment settings.
//!
//! All path fields use `PathBuf`; relative paths are resolved against the
//! site root by [`SiteConfig::resolve_path`].
//! Config structs deserialize from camelCase keys (YAML or JSON).

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed content-model name (e.g. `post`, `homepage`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelName(pub String);

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ModelName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ModelName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Registry key for one content entry: `"<model>-<id>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub String);

impl EntryId {
    /// Build the id for entry `id` of `model`. Stable for the same inputs.
    pub fn new(model: &ModelName, id: i64) -> Self {
        Self(format!("{}-{}", model.0, id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Site configuration
// ---------------------------------------------------------------------------

/// Archetype and output directory for one content model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Template rendered for each entry. Relative to the site root unless absolute.
    pub archetype_path: PathBuf,
    /// Directory the rendered entry files land in. Relative to the site root unless absolute.
    pub output_dir: PathBuf,
}

/// Where the static-site generator writes its build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OutputSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<PathBuf>,
}

/// Selects and locates the entry registry backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrySettings {
    /// Key into the registry constructor table (`yaml`, `memory`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Backend-specific location; the YAML backend defaults to
    /// `<root>/.midas/registry.yaml`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<PathBuf>,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            kind: "yaml".to_string(),
            location: None,
        }
    }
}

/// The external static-site generator command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorSettings {
    pub program: String,
    /// Passed when a build must bypass the generator's cache.
    pub ignore_cache_flag: String,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            program: "hugo".to_string(),
            ignore_cache_flag: "--ignoreCache".to_string(),
        }
    }
}

/// Root of a site configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    /// Site root on disk.
    pub root_dir: PathBuf,
    #[serde(default)]
    pub output_settings: OutputSettings,
    #[serde(default)]
    pub collection_types: BTreeMap<String, Model>,
    #[serde(default)]
    pub single_types: BTreeMap<String, Model>,
    #[serde(default)]
    pub registry: RegistrySettings,
    #[serde(default)]
    pub generator: GeneratorSettings,
}

impl SiteConfig {
    /// A site rooted at `root_dir` with no models and the default YAML registry.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            output_settings: OutputSettings::default(),
            collection_types: BTreeMap::new(),
            single_types: BTreeMap::new(),
            registry: RegistrySettings::default(),
            generator: GeneratorSettings::default(),
        }
    }

    /// `path` if absolute, otherwise `root_dir/path`. Pure, no I/O.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root_dir.join(path)
        }
    }

    /// Build output directory: `outputSettings.build` resolved against the
    /// root, or `<root>/public` when unset.
    pub fn public_dir(&self) -> PathBuf {
        match self.output_settings.build.as_deref() {
            Some(build) if !build.as_os_str().is_empty() => self.resolve_path(build),
            _ => self.root_dir.join("public"),
        }
    }
}

// ---------------------------------------------------------------------------
// Deployment
// ---------------------------------------------------------------------------

/// Object-storage target for a deployment. Credentials are a static key pair.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSettings {
    pub bucket_name: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_prefix: Option<String>,
}

impl DeploymentSettings {
    /// Key prefix, with an empty string treated as no prefix.
    pub fn prefix(&self) -> Option<&str> {
        self.s3_prefix.as_deref().filter(|p| !p.is_empty())
    }
}

// Keep the secret out of logs.
impl fmt::Debug for DeploymentSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeploymentSettings")
            .field("bucket_name", &self.bucket_name)
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("s3_prefix", &self.s3_prefix)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
