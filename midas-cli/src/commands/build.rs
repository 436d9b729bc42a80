//! `midas build`: run the site generator in the site root.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use midas_core::SiteConfig;
use midas_sync::build;

use super::load_site;

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Bypass the generator's cache.
    #[arg(long)]
    pub no_cache: bool,
}

impl BuildArgs {
    pub fn run(self, site_path: &Path) -> Result<()> {
        let site = load_site(site_path)?;
        run_build(&site, !self.no_cache)
    }
}

/// Build `site`, reporting where the output landed.
pub fn run_build(site: &SiteConfig, use_cache: bool) -> Result<()> {
    build::build_site(site, use_cache)
        .with_context(|| format!("site build failed in {}", site.root_dir.display()))?;
    println!(
        "{} Built site into {}",
        "✓".green().bold(),
        site.public_dir().display()
    );
    Ok(())
}
