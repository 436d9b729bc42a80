//! Object-storage seam and its S3 implementation.

use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

#[cfg(test)]
use mockall::automock;

use midas_core::DeploymentSettings;

/// Error returned by an [`ObjectStore`] implementation.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// One object to publish. The body is streamed from the open file.
#[derive(Debug)]
pub struct ObjectUpload {
    pub bucket: String,
    pub key: String,
    pub content_type: &'static str,
    pub body: tokio::fs::File,
    /// Size of `body` in bytes.
    pub len: u64,
}

/// Somewhere rendered artifacts can be put.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `upload.body` under `upload.key`, replacing any existing object.
    async fn put_object(&self, upload: ObjectUpload) -> Result<(), StoreError>;
}

/// Amazon S3 (or compatible) client built from a static key pair.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Client for `settings.region` using `access_key`/`secret_key` only;
    /// no environment or profile credentials are consulted.
    pub fn new(settings: &DeploymentSettings) -> Self {
        let credentials = Credentials::new(
            settings.access_key.clone(),
            settings.secret_key.clone(),
            None,
            None,
            "midas",
        );
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .credentials_provider(credentials)
            .build();
        Self {
            client: Client::from_conf(config),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_object(&self, upload: ObjectUpload) -> Result<(), StoreError> {
        let body = ByteStream::read_from()
            .file(upload.body)
            .build()
            .await?;
        self.client
            .put_object()
            .bucket(upload.bucket)
            .key(upload.key)
            .content_type(upload.content_type)
            .content_length(i64::try_from(upload.len)?)
            .body(body)
            .send()
            .await
            .map_err(|e| StoreError::from(DisplayErrorContext(e).to_string()))?;
        Ok(())
    }
}
