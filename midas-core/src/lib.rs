//! midas core library: domain types, payload validation, model resolution,
//! the entry registry contract and its backends, errors.
//!
//! - [`types`]: newtypes and config structs
//! - [`config`]: load site / deployment settings from disk
//! - [`model`]: model name → archetype + output directory
//! - [`payload`]: typed CMS payload
//! - [`slug`]: title → filename stem
//! - [`registry`]: [`EntryRegistry`] and the `yaml` / `memory` backends
//! - [`error`]: [`ConfigError`], [`PayloadError`], [`RegistryError`], [`ErrorKind`]

pub mod config;
pub mod error;
pub mod model;
pub mod payload;
pub mod registry;
pub mod slug;
pub mod types;

pub use error::{ConfigError, ErrorKind, PayloadError, RegistryError};
pub use model::{ModelKind, ResolvedModel};
pub use payload::Payload;
pub use registry::{builtin_constructors, EntryRegistry, RegistryConstructor, RegistryConstructors};
pub use slug::slugify;
pub use types::{
    DeploymentSettings, EntryId, GeneratorSettings, Model, ModelName, OutputSettings,
    RegistrySettings, SiteConfig,
};
