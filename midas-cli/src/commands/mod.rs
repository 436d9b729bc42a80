pub mod build;
pub mod deploy;
pub mod entry;

use std::path::Path;

use anyhow::{Context, Result};
use midas_core::{config, SiteConfig};

/// Load the site configuration named by `--site`.
pub fn load_site(path: &Path) -> Result<SiteConfig> {
    config::load_site_at(path)
        .with_context(|| format!("failed to load site config {}", path.display()))
}
