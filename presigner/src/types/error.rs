//! Error taxonomy for presigner operations

use std::path::PathBuf;

use object_storage::StorageError;
use reqwest::StatusCode;
use thiserror::Error;

/// Result type for presigner operations
pub type PresignResult<T> = Result<T, PresignError>;

/// Every way a presigner invocation can fail
#[derive(Error, Debug)]
pub enum PresignError {
    /// Bad or missing command-line arguments
    #[error("Invalid arguments: {0}")]
    Validation(String),

    /// Upload source is missing or unreadable
    #[error("Cannot read file {}: {source}", path.display())]
    FileSystem {
        /// Path given on the command line
        path: PathBuf,
        /// Underlying I/O failure
        source: std::io::Error,
    },

    /// AWS profile, credentials or region could not be resolved
    #[error("AWS configuration error: {0}")]
    Configuration(String),

    /// The provider denied the operation or refused to sign for the bucket
    #[error("Authorization failed: {0}")]
    Authorization(String),

    /// Any other provider-reported failure
    #[error("Provider error: {0}")]
    Provider(String),

    /// Network failure while talking to the upload target
    #[error("Network error during upload: {0}")]
    Transport(#[from] reqwest::Error),

    /// The upload target answered with a non-success status
    #[error("Upload failed with HTTP status {status}: {body}")]
    UploadStatus {
        /// Status returned by the upload target
        status: StatusCode,
        /// Response body, usually an S3 XML error document
        body: String,
    },
}

impl PresignError {
    /// Process exit code for this error
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::FileSystem { .. } => 3,
            Self::Configuration(_) => 4,
            Self::Authorization(_) => 5,
            Self::Provider(_) => 6,
            Self::Transport(_) => 7,
            Self::UploadStatus { .. } => 8,
        }
    }

    /// Short machine-readable name used in log lines
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::FileSystem { .. } => "file_system_error",
            Self::Configuration(_) => "configuration_error",
            Self::Authorization(_) => "authorization_error",
            Self::Provider(_) => "provider_error",
            Self::Transport(_) => "transport_error",
            Self::UploadStatus { .. } => "upload_status_error",
        }
    }
}

/// Convert storage errors to presigner errors
impl From<StorageError> for PresignError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ConfigError(msg) => Self::Configuration(msg),
            StorageError::AccessDenied(msg) => Self::Authorization(msg),
            StorageError::InvalidBucket(_) => Self::Authorization(err.to_string()),
            StorageError::S3Error(msg) => Self::Provider(msg),
        }
    }
}

/// Convert argument parsing failures to validation errors
impl From<clap::Error> for PresignError {
    fn from(err: clap::Error) -> Self {
        let rendered = err.to_string();
        let message = rendered.trim_start_matches("error: ").trim_end();
        Self::Validation(message.to_string())
    }
}
