//! Presigned request descriptors

use std::collections::BTreeMap;
use std::time::Duration;

/// Presigned POST target plus the form fields that must accompany the upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedPost {
    /// URL the multipart form is posted to
    pub url: String,
    /// Form fields (policy, signature, key, ...) to send before the file part
    pub fields: BTreeMap<String, String>,
}

/// Presigned URL with the lifetime it was signed for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedUrl {
    /// The presigned URL
    pub url: String,
    /// How long the URL stays valid after signing
    pub expires_in: Duration,
}
