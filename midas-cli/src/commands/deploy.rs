//! `midas deploy`: upload the public directory to the configured bucket.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use midas_core::config;
use midas_deploy::Deployment;

use super::{build::run_build, load_site};

#[derive(Args, Debug)]
pub struct DeployArgs {
    /// Deployment settings file (bucket, region, credentials, prefix).
    #[arg(long, value_name = "FILE")]
    pub settings: PathBuf,

    /// Build the site before uploading.
    #[arg(long)]
    pub build: bool,

    /// With `--build`, bypass the generator's cache.
    #[arg(long, requires = "build")]
    pub no_cache: bool,
}

impl DeployArgs {
    pub fn run(self, site_path: &Path) -> Result<()> {
        let site = load_site(site_path)?;
        let settings = config::load_deployment_at(&self.settings).with_context(|| {
            format!("failed to load deployment settings {}", self.settings.display())
        })?;
        tracing::debug!(settings = ?settings, "loaded deployment settings");

        if self.build {
            run_build(&site, !self.no_cache)?;
        }

        let bucket = settings.bucket_name.clone();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("failed to start async runtime")?;
        let summary = runtime
            .block_on(async { Deployment::with_s3(&site, settings).deploy().await })
            .with_context(|| format!("deployment to {bucket} failed"))?;

        println!(
            "{} Deployed {} objects ({} bytes) to {bucket}",
            "✓".green().bold(),
            summary.uploaded.len(),
            summary.bytes
        );
        Ok(())
    }
}
