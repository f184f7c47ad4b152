//! Bucket name checks applied before any signing happens

use crate::{StorageError, StorageResult};

const MIN_BUCKET_NAME_LEN: usize = 3;
const MAX_BUCKET_NAME_LEN: usize = 63;

/// Validates a bucket name against the S3 general purpose bucket naming rules
///
/// # Errors
///
/// Returns `StorageError::InvalidBucket` when the name cannot be addressed on S3
pub fn validate_bucket_name(bucket: &str) -> StorageResult<()> {
    let len_ok = (MIN_BUCKET_NAME_LEN..=MAX_BUCKET_NAME_LEN).contains(&bucket.len());
    let chars_ok = bucket
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-');
    let edges_ok = bucket
        .chars()
        .next()
        .zip(bucket.chars().last())
        .is_some_and(|(first, last)| first.is_ascii_alphanumeric() && last.is_ascii_alphanumeric());

    if len_ok && chars_ok && edges_ok && !bucket.contains("..") {
        Ok(())
    } else {
        Err(StorageError::InvalidBucket(bucket.to_string()))
    }
}

/// Whether the bucket can be addressed as `<bucket>.s3.<region>.amazonaws.com` over TLS
#[must_use]
pub fn supports_virtual_host(bucket: &str) -> bool {
    !bucket.contains('.')
}
