//! S3-backed presigner

use std::time::Duration;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_credential_types::{
    provider::{ProvideCredentials, SharedCredentialsProvider},
    Credentials,
};
use aws_sdk_s3::{presigning::PresigningConfig, Client as S3Client};
use chrono::Utc;
use tracing::{debug, instrument};

use crate::{
    bucket::{supports_virtual_host, validate_bucket_name},
    post_policy::PostPolicy,
    PresignedPost, PresignedUrl, StorageError, StorageResult,
};

/// Produces presigned requests for objects in a storage provider
#[async_trait]
pub trait Presigner: Send + Sync {
    /// Generates a presigned POST descriptor for uploading `key` into `bucket`
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when credentials cannot be resolved or the request is rejected
    async fn presign_post(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<PresignedPost>;

    /// Generates a presigned GET URL for `key` in `bucket`
    ///
    /// No existence check is made; signing a URL for a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when credentials cannot be resolved or the request is rejected
    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<PresignedUrl>;
}

/// Presigner for Amazon S3 and S3-compatible endpoints
pub struct S3Presigner {
    s3_client: S3Client,
    credentials_provider: Option<SharedCredentialsProvider>,
    region: Option<String>,
    endpoint_url: Option<String>,
}

impl S3Presigner {
    /// Creates a new presigner
    ///
    /// # Arguments
    ///
    /// * `aws_config` - Shared SDK config carrying credentials, region and endpoint
    /// * `s3_config` - S3 service config derived from `aws_config`
    #[must_use]
    pub fn new(aws_config: &SdkConfig, s3_config: aws_sdk_s3::Config) -> Self {
        Self {
            s3_client: S3Client::from_conf(s3_config),
            credentials_provider: aws_config.credentials_provider(),
            region: aws_config.region().map(ToString::to_string),
            endpoint_url: aws_config.endpoint_url().map(str::to_string),
        }
    }

    /// Resolves credentials through the SDK provider chain
    async fn credentials(&self) -> StorageResult<Credentials> {
        let provider = self.credentials_provider.as_ref().ok_or_else(|| {
            StorageError::ConfigError("no AWS credentials provider configured".to_string())
        })?;

        Ok(provider.provide_credentials().await?)
    }

    fn region(&self) -> StorageResult<&str> {
        self.region
            .as_deref()
            .ok_or_else(|| StorageError::ConfigError("no AWS region configured".to_string()))
    }

    /// URL the presigned POST form is sent to
    fn post_url(&self, bucket: &str, region: &str) -> String {
        match &self.endpoint_url {
            Some(endpoint) => format!("{}/{bucket}", endpoint.trim_end_matches('/')),
            None if supports_virtual_host(bucket) => {
                format!("https://{bucket}.s3.{region}.amazonaws.com/")
            }
            None => format!("https://s3.{region}.amazonaws.com/{bucket}"),
        }
    }
}

#[async_trait]
impl Presigner for S3Presigner {
    #[instrument(skip(self))]
    async fn presign_post(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<PresignedPost> {
        validate_bucket_name(bucket)?;
        // Same bounds the SDK enforces for presigned GET
        PresigningConfig::expires_in(expires_in)?;

        let region = self.region()?;
        let credentials = self.credentials().await?;

        let fields = PostPolicy::new(bucket, key, expires_in).sign(&credentials, region, Utc::now());
        let url = self.post_url(bucket, region);

        debug!("presigned POST target: {url}");

        Ok(PresignedPost { url, fields })
    }

    #[instrument(skip(self))]
    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<PresignedUrl> {
        validate_bucket_name(bucket)?;
        let presigning_config = PresigningConfig::expires_in(expires_in)?;

        // Resolve up front so credential problems surface as configuration errors
        self.region()?;
        self.credentials().await?;

        let presigned_request = self
            .s3_client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning_config)
            .await?;

        Ok(PresignedUrl {
            url: presigned_request.uri().to_string(),
            expires_in,
        })
    }
}
