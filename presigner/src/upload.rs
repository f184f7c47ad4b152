//! Multipart upload to a presigned POST target

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use object_storage::PresignedPost;
use reqwest::{
    multipart::{Form, Part},
    redirect::Policy,
    Body, Client,
};
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{debug, info, instrument};

use crate::types::{PresignError, PresignResult};

/// Form field carrying the file contents; S3 ignores fields after it
const FILE_FIELD: &str = "file";

/// Local file opened for upload
///
/// The handle is owned by this value and, once handed to the uploader, by the
/// request body. Dropping either closes the file.
#[derive(Debug)]
pub struct UploadSource {
    path: PathBuf,
    file: File,
    length: u64,
}

impl UploadSource {
    /// Opens `path` for reading
    ///
    /// # Errors
    ///
    /// Returns `PresignError::FileSystem` if the path does not exist, is not a
    /// regular file, or cannot be read
    pub async fn open(path: &Path) -> PresignResult<Self> {
        let file_error = |source: io::Error| PresignError::FileSystem {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).await.map_err(file_error)?;
        let metadata = file.metadata().await.map_err(file_error)?;
        if !metadata.is_file() {
            return Err(file_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a regular file",
            )));
        }

        Ok(Self {
            path: path.to_path_buf(),
            file,
            length: metadata.len(),
        })
    }

    /// Path the file was opened from
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File size in bytes at open time
    #[must_use]
    pub const fn len(&self) -> u64 {
        self.length
    }

    /// Whether the file is empty
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Streams the file as the multipart file part
    fn into_part(self, file_name: &str) -> PresignResult<Part> {
        let body = Body::wrap_stream(ReaderStream::new(self.file));
        let part = Part::stream_with_length(body, self.length)
            .file_name(file_name.to_string())
            .mime_str("application/octet-stream")?;

        Ok(part)
    }
}

/// HTTP client for presigned POST uploads
pub struct Uploader {
    client: Client,
}

impl Uploader {
    /// Creates an uploader whose requests give up after `timeout`
    ///
    /// Redirects are not followed: a 3xx from the POST target means the object
    /// was not stored.
    ///
    /// # Errors
    ///
    /// Returns `PresignError::Transport` if the HTTP client cannot be built
    pub fn new(timeout: Duration) -> PresignResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(Policy::none())
            .user_agent(format!("presigner/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }

    /// Posts `source` to the presigned target as a multipart form
    ///
    /// The presigned fields are sent first, then the file part named after `key`.
    ///
    /// # Errors
    ///
    /// Returns `PresignError::Transport` on network failure and
    /// `PresignError::UploadStatus` when the target answers with a non-success status
    #[instrument(skip(self, presigned_post, source), fields(url = %presigned_post.url, bytes = source.len()))]
    pub async fn upload(
        &self,
        presigned_post: &PresignedPost,
        key: &str,
        source: UploadSource,
    ) -> PresignResult<()> {
        let path = source.path().to_path_buf();

        let form = presigned_post
            .fields
            .iter()
            .fold(Form::new(), |form, (name, value)| {
                form.text(name.clone(), value.clone())
            })
            .part(FILE_FIELD, source.into_part(key)?);

        debug!("posting {} form fields plus file part", presigned_post.fields.len());

        let response = self
            .client
            .post(&presigned_post.url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!("Successfully uploaded {} (HTTP {status})", path.display());
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
        Err(PresignError::UploadStatus { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_open_missing_file() {
        let result = UploadSource::open(Path::new("/definitely/not/here.jpg")).await;

        match result {
            Err(PresignError::FileSystem { path, source }) => {
                assert_eq!(path, Path::new("/definitely/not/here.jpg"));
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected file system error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_open_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();

        let result = UploadSource::open(dir.path()).await;

        assert!(matches!(result, Err(PresignError::FileSystem { .. })));
    }

    #[tokio::test]
    async fn test_open_reports_length() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello presigned world").unwrap();

        let source = UploadSource::open(file.path()).await.unwrap();

        assert_eq!(source.len(), 21);
        assert!(!source.is_empty());
        assert_eq!(source.path(), file.path());
    }

    #[test]
    fn test_uploader_builds() {
        assert!(Uploader::new(Duration::from_secs(30)).is_ok());
    }
}
