//! # midas-deploy
//!
//! Publishes a built site's public directory to object storage.
//!
//! [`Deployment::deploy`] walks the directory with an [`ArtifactWalker`],
//! derives each object's key and content type, and streams files to an
//! [`ObjectStore`] one at a time. [`S3Store`] is the production store.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use midas_core::{config, SiteConfig};
//! use midas_deploy::Deployment;
//!
//! async fn publish(site: &SiteConfig) -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = config::load_deployment_at(Path::new("deploy.yaml"))?;
//!     let summary = Deployment::with_s3(site, settings).deploy().await?;
//!     println!("{} objects, {} bytes", summary.uploaded.len(), summary.bytes);
//!     Ok(())
//! }
//! ```

pub mod content_type;
pub mod error;
pub mod key;
pub mod pipeline;
pub mod store;
pub mod walker;

pub use content_type::{content_type_for, DEFAULT_CONTENT_TYPE};
pub use error::DeployError;
pub use key::object_key;
pub use pipeline::{DeploySummary, Deployment};
pub use store::{ObjectStore, ObjectUpload, S3Store, StoreError};
pub use walker::ArtifactWalker;
