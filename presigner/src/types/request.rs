//! Request records built from parsed arguments

use std::path::PathBuf;
use std::time::Duration;

use strum::{Display, EnumString};

use super::{PresignError, PresignResult};

/// Default lifetime of presigned URLs, in seconds
pub const DEFAULT_EXPIRATION_SECS: u64 = 3600;

/// Longest lifetime SigV4 allows for presigned requests (7 days)
pub const MAX_EXPIRATION_SECS: u64 = 7 * 24 * 60 * 60;

/// AWS profile used when none is given
pub const DEFAULT_PROFILE: &str = "default";

/// Operation selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Operation {
    /// Upload through a presigned POST
    Post,
    /// Generate a presigned GET URL
    Get,
}

/// Upload a local file through a presigned POST
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    /// Target bucket
    pub bucket: String,
    /// Local file to upload
    pub file: PathBuf,
    /// Object key, the file's base name when absent
    pub key: Option<String>,
    /// Presigned POST lifetime in seconds
    pub expiration_secs: u64,
    /// AWS profile for credentials
    pub profile: String,
}

impl UploadRequest {
    /// Object key to upload to: the given key, else the file's base name
    ///
    /// # Errors
    ///
    /// Returns `PresignError::Validation` when no key is given and the path has no file name
    pub fn object_key(&self) -> PresignResult<String> {
        if let Some(key) = &self.key {
            return Ok(key.clone());
        }

        self.file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                PresignError::Validation(format!(
                    "cannot derive an object key from '{}', pass --key",
                    self.file.display()
                ))
            })
    }

    /// Presigned POST lifetime
    #[must_use]
    pub const fn expires_in(&self) -> Duration {
        Duration::from_secs(self.expiration_secs)
    }
}

/// Generate a presigned GET URL for an existing (or future) object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Bucket holding the object
    pub bucket: String,
    /// Object key
    pub key: String,
    /// URL lifetime in seconds
    pub expiration_secs: u64,
    /// AWS profile for credentials
    pub profile: String,
}

impl DownloadRequest {
    /// URL lifetime
    #[must_use]
    pub const fn expires_in(&self) -> Duration {
        Duration::from_secs(self.expiration_secs)
    }
}

/// A validated request for one of the two operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// `post`
    Upload(UploadRequest),
    /// `get`
    Download(DownloadRequest),
}

impl Request {
    /// Operation this request performs
    #[must_use]
    pub const fn operation(&self) -> Operation {
        match self {
            Self::Upload(_) => Operation::Post,
            Self::Download(_) => Operation::Get,
        }
    }

    /// AWS profile the request runs under
    #[must_use]
    pub fn profile(&self) -> &str {
        match self {
            Self::Upload(request) => &request.profile,
            Self::Download(request) => &request.profile,
        }
    }
}
