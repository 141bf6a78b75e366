//! Durable artifact storage for rendered export files.

use std::time::Duration;

use async_trait::async_trait;
use core_config::storage::StorageConfig;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path as ObjectPath;
use object_store::signer::Signer;
use object_store::{Attribute, Attributes, ObjectStore, PutOptions, PutPayload};

use crate::error::{ExportError, ExportResult};

/// How long a download link stays valid
pub const SIGNED_URL_TTL: Duration = Duration::from_secs(300);

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Store `bytes` under `key`, overwriting any previous object
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> ExportResult<()>;

    /// Pre-signed GET URL for `key`
    async fn signed_url(&self, key: &str, expires_in: Duration) -> ExportResult<String>;
}

/// S3-compatible store (AWS S3, Cloudflare R2, MinIO) via `object_store`
pub struct S3ArtifactStore {
    store: AmazonS3,
}

impl S3ArtifactStore {
    pub fn new(config: &StorageConfig) -> ExportResult<Self> {
        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(&config.bucket)
            .with_region(&config.region)
            .with_access_key_id(&config.access_key_id)
            .with_secret_access_key(&config.secret_access_key);

        if let Some(endpoint) = &config.endpoint {
            builder = builder.with_endpoint(endpoint);
        }

        Ok(Self {
            store: builder.build().map_err(ExportError::from)?,
        })
    }
}

#[async_trait]
impl ArtifactStore for S3ArtifactStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> ExportResult<()> {
        let attributes = Attributes::from_iter([(
            Attribute::ContentType,
            content_type.to_string(),
        )]);

        self.store
            .put_opts(
                &ObjectPath::from(key),
                PutPayload::from(bytes),
                PutOptions::from(attributes),
            )
            .await?;

        tracing::info!(%key, "Stored export artifact");
        Ok(())
    }

    async fn signed_url(&self, key: &str, expires_in: Duration) -> ExportResult<String> {
        let url = self
            .store
            .signed_url(Method::GET, &ObjectPath::from(key), expires_in)
            .await?;

        Ok(url.to_string())
    }
}
