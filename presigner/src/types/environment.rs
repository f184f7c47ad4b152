//! Environment configuration for the presigner

use std::env;
use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion, Region, SdkConfig};

use super::{PresignError, PresignResult};

/// Region used when neither the profile nor the environment names one
const DEFAULT_REGION: &str = "us-east-1";

/// LocalStack edge endpoint used in development
const LOCALSTACK_ENDPOINT: &str = "http://localhost:4566";

/// Default timeout for the presigned POST upload
const DEFAULT_UPLOAD_TIMEOUT_SECS: u64 = 30;

/// Timeout for any AWS SDK operation
const AWS_OPERATION_TIMEOUT_SECS: u64 = 30;

/// Where the presigner talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Real AWS endpoints
    Production,
    /// `LocalStack` on localhost
    Development,
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Errors
    ///
    /// Returns `PresignError::Configuration` if `APP_ENV` contains an unknown value
    pub fn from_env() -> PresignResult<Self> {
        let app_env = env::var("APP_ENV")
            .unwrap_or_else(|_| "production".to_string())
            .trim()
            .to_lowercase();

        match app_env.as_str() {
            "production" => Ok(Self::Production),
            "development" => Ok(Self::Development),
            _ => Err(PresignError::Configuration(format!(
                "Invalid environment: {app_env}"
            ))),
        }
    }

    /// Returns the endpoint URL to use for AWS services
    #[must_use]
    pub const fn override_aws_endpoint_url(&self) -> Option<&str> {
        match self {
            Self::Production => None,
            Self::Development => Some(LOCALSTACK_ENDPOINT),
        }
    }

    /// AWS configuration for `profile` with timeouts and retries disabled
    pub async fn aws_config(&self, profile: &str) -> SdkConfig {
        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(AWS_OPERATION_TIMEOUT_SECS))
            .build();

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .profile_name(profile)
            .retry_config(RetryConfig::disabled())
            .timeout_config(timeout_config);

        if let Some(endpoint_url) = self.override_aws_endpoint_url() {
            loader = loader.endpoint_url(endpoint_url);
        }

        let config = loader.load().await;
        if config.region().is_some() {
            config
        } else {
            config
                .to_builder()
                .region(Region::new(DEFAULT_REGION))
                .build()
        }
    }

    /// AWS S3 service configuration
    #[must_use]
    pub fn s3_client_config(&self, aws_config: &SdkConfig) -> aws_sdk_s3::Config {
        let s3_config: aws_sdk_s3::Config = aws_config.into();
        let mut builder = s3_config.to_builder();

        // LocalStack only serves path-style requests
        if matches!(self, Self::Development) {
            builder.set_force_path_style(Some(true));
        }

        builder.build()
    }

    /// Timeout for the multipart upload, from `UPLOAD_TIMEOUT_SECS`
    #[must_use]
    pub fn upload_timeout(&self) -> Duration {
        let secs = env::var("UPLOAD_TIMEOUT_SECS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_UPLOAD_TIMEOUT_SECS);

        Duration::from_secs(secs)
    }
}
