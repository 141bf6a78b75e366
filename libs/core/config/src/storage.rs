use crate::{env_or_default, env_required, ConfigError, FromEnv};

/// S3-compatible object storage configuration for export artifacts.
///
/// Works against any S3-compatible endpoint (AWS S3, Cloudflare R2, MinIO).
/// R2 requires the custom `STORAGE_ENDPOINT` plus a placeholder region.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    /// Bucket holding generated export files
    pub bucket: String,
    /// Custom endpoint URL (empty = provider default)
    pub endpoint: Option<String>,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl FromEnv for StorageConfig {
    /// Environment variables:
    /// - `STORAGE_BUCKET` (required)
    /// - `STORAGE_ACCESS_KEY_ID` (required)
    /// - `STORAGE_SECRET_ACCESS_KEY` (required)
    /// - `STORAGE_ENDPOINT` (optional, e.g. `https://<account>.r2.cloudflarestorage.com`)
    /// - `STORAGE_REGION` (optional, default: `auto`)
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bucket: env_required("STORAGE_BUCKET")?,
            endpoint: std::env::var("STORAGE_ENDPOINT").ok(),
            region: env_or_default("STORAGE_REGION", "auto"),
            access_key_id: env_required("STORAGE_ACCESS_KEY_ID")?,
            secret_access_key: env_required("STORAGE_SECRET_ACCESS_KEY")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_from_env() {
        temp_env::with_vars(
            [
                ("STORAGE_BUCKET", Some("billing-exports")),
                ("STORAGE_ACCESS_KEY_ID", Some("key")),
                ("STORAGE_SECRET_ACCESS_KEY", Some("secret")),
                ("STORAGE_ENDPOINT", Some("https://acct.r2.cloudflarestorage.com")),
                ("STORAGE_REGION", None),
            ],
            || {
                let config = StorageConfig::from_env().unwrap();
                assert_eq!(config.bucket, "billing-exports");
                assert_eq!(config.region, "auto");
                assert_eq!(
                    config.endpoint.as_deref(),
                    Some("https://acct.r2.cloudflarestorage.com")
                );
            },
        );
    }

    #[test]
    fn test_storage_config_missing_bucket() {
        temp_env::with_vars(
            [
                ("STORAGE_BUCKET", None::<&str>),
                ("STORAGE_ACCESS_KEY_ID", Some("key")),
                ("STORAGE_SECRET_ACCESS_KEY", Some("secret")),
            ],
            || {
                let err = StorageConfig::from_env().unwrap_err();
                assert!(err.to_string().contains("STORAGE_BUCKET"));
            },
        );
    }
}
