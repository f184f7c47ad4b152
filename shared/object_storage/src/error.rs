//! Error types for presigning operations

use aws_credential_types::provider::error::CredentialsError;
use aws_sdk_s3::{
    error::{DisplayErrorContext, SdkError},
    operation::get_object::GetObjectError,
    presigning::PresigningConfigError,
};
use thiserror::Error;

/// Result type for presigning operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while producing presigned requests
#[derive(Error, Debug)]
pub enum StorageError {
    /// Credentials, profile or region could not be resolved
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The provider refused the request (HTTP 401/403)
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Bucket name is not acceptable to S3
    #[error("Invalid bucket name '{0}'")]
    InvalidBucket(String),

    /// Any other failure reported by the AWS SDK
    #[error("S3 service error: {0}")]
    S3Error(String),
}

impl From<CredentialsError> for StorageError {
    fn from(error: CredentialsError) -> Self {
        Self::ConfigError(format!(
            "failed to resolve AWS credentials: {}",
            DisplayErrorContext(&error)
        ))
    }
}

impl From<PresigningConfigError> for StorageError {
    fn from(error: PresigningConfigError) -> Self {
        Self::ConfigError(format!(
            "failed to create presigning config: {}",
            DisplayErrorContext(&error)
        ))
    }
}

impl From<SdkError<GetObjectError>> for StorageError {
    fn from(error: SdkError<GetObjectError>) -> Self {
        match &error {
            SdkError::ServiceError(service_err)
                if matches!(service_err.raw().status().as_u16(), 401 | 403) =>
            {
                Self::AccessDenied(format!("{}", DisplayErrorContext(&error)))
            }
            _ => Self::S3Error(format!("{}", DisplayErrorContext(&error))),
        }
    }
}
