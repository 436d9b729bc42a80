//! Loading site and deployment configuration from disk.
//!
//! Files are YAML; JSON documents parse too since JSON is a YAML subset.
//! A relative `rootDir` is resolved against the directory holding the config
//! file, so a config checked into the site repository stays portable.

use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::ConfigError;
use crate::types::{DeploymentSettings, SiteConfig};

fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a [`SiteConfig`] from `path`.
pub fn load_site_at(path: &Path) -> Result<SiteConfig, ConfigError> {
    let mut site: SiteConfig = load_document(path)?;
    if site.root_dir.is_relative() {
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        site.root_dir = base.join(&site.root_dir);
    }
    Ok(site)
}

/// Load [`DeploymentSettings`] from `path`, rejecting empty bucket or region.
pub fn load_deployment_at(path: &Path) -> Result<DeploymentSettings, ConfigError> {
    let settings: DeploymentSettings = load_document(path)?;
    if settings.bucket_name.trim().is_empty() {
        return Err(ConfigError::MissingField {
            field: "bucketName",
        });
    }
    if settings.region.trim().is_empty() {
        return Err(ConfigError::MissingField { field: "region" });
    }
    Ok(settings)
}
