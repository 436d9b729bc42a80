//! Publish a built site: walk the public directory and upload every file.

use std::path::{Path, PathBuf};

use midas_core::{DeploymentSettings, SiteConfig};

use crate::content_type::content_type_for;
use crate::error::{io_err, DeployError};
use crate::key::object_key;
use crate::store::{ObjectStore, ObjectUpload, S3Store};
use crate::walker::ArtifactWalker;

/// What a finished deployment uploaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploySummary {
    /// Object keys, in upload order.
    pub uploaded: Vec<String>,
    /// Total bytes sent.
    pub bytes: u64,
}

impl DeploySummary {
    fn record(&mut self, key: String, len: u64) {
        self.uploaded.push(key);
        self.bytes += len;
    }
}

/// A deployment of one site's public directory to one bucket.
pub struct Deployment<S> {
    root: PathBuf,
    settings: DeploymentSettings,
    store: S,
}

impl Deployment<S3Store> {
    /// Deployment backed by an S3 client built from `settings`.
    pub fn with_s3(site: &SiteConfig, settings: DeploymentSettings) -> Self {
        let store = S3Store::new(&settings);
        Self::new(site, settings, store)
    }
}

impl<S: ObjectStore> Deployment<S> {
    pub fn new(site: &SiteConfig, settings: DeploymentSettings, store: S) -> Self {
        Self {
            root: site.public_dir(),
            settings,
            store,
        }
    }

    /// Directory whose contents are published.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Upload every regular file under the public root, one at a time.
    ///
    /// The first failure aborts the run; objects uploaded before it stay.
    pub async fn deploy(&self) -> Result<DeploySummary, DeployError> {
        let bucket = &self.settings.bucket_name;
        tracing::info!(
            root = %self.root.display(),
            bucket = %bucket,
            prefix = self.settings.prefix().unwrap_or(""),
            "deploying site"
        );

        let mut walker = ArtifactWalker::spawn(self.root.clone());
        let mut summary = DeploySummary::default();

        while let Some(next) = walker.next().await {
            let path = next?;
            let relative = path
                .strip_prefix(&self.root)
                .map_err(|_| DeployError::OutsideRoot {
                    path: path.clone(),
                    root: self.root.clone(),
                })?;
            let key = object_key(self.settings.prefix(), relative);
            let content_type = content_type_for(&path);

            let body = tokio::fs::File::open(&path)
                .await
                .map_err(|e| io_err(&path, e))?;
            let len = body.metadata().await.map_err(|e| io_err(&path, e))?.len();

            tracing::debug!(key = %key, content_type, bytes = len, "uploading");
            self.store
                .put_object(ObjectUpload {
                    bucket: bucket.clone(),
                    key: key.clone(),
                    content_type,
                    body,
                    len,
                })
                .await
                .map_err(|source| {
                    tracing::error!(key = %key, error = %source, "upload failed");
                    DeployError::Upload {
                        bucket: bucket.clone(),
                        key: key.clone(),
                        source,
                    }
                })?;

            summary.record(key, len);
        }

        tracing::info!(
            bucket = %bucket,
            objects = summary.uploaded.len(),
            bytes = summary.bytes,
            "deployment finished"
        );
        Ok(summary)
    }
}
