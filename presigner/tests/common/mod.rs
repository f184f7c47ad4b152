// Not every utils is used in every test, so we allow dead code
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Bytes,
    http::{
        header::{CONTENT_TYPE, LOCATION},
        HeaderMap, StatusCode, Uri,
    },
    routing::{get, post},
    Router,
};
use object_storage::{PresignedPost, PresignedUrl, Presigner, StorageError, StorageResult};
use presigner::types::{UploadRequest, DEFAULT_EXPIRATION_SECS, DEFAULT_PROFILE};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Setup test environment with logging
pub fn setup_test_env() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .ok();
}

/// Buffer collecting formatted log lines for the current thread
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Routes this thread's events into the buffer until the guard drops
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Everything logged so far
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Presigner double that counts calls and never talks to AWS
pub struct FakePresigner {
    target_url: String,
    failure: Option<fn() -> StorageError>,
    calls: AtomicUsize,
}

impl FakePresigner {
    /// Presigns POSTs against `target_url/<bucket>`
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails every call with the error built by `failure`
    pub fn failing(failure: fn() -> StorageError) -> Self {
        Self {
            target_url: String::new(),
            failure: Some(failure),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of presign calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) -> StorageResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.failure.map_or(Ok(()), |failure| Err(failure()))
    }
}

#[async_trait]
impl Presigner for FakePresigner {
    async fn presign_post(
        &self,
        bucket: &str,
        key: &str,
        _expires_in: Duration,
    ) -> StorageResult<PresignedPost> {
        self.record_call()?;

        Ok(PresignedPost {
            url: format!("{}/{bucket}", self.target_url),
            fields: BTreeMap::from([
                ("key".to_string(), key.to_string()),
                ("policy".to_string(), "dGVzdC1wb2xpY3k=".to_string()),
                ("x-amz-signature".to_string(), "test-signature".to_string()),
            ]),
        })
    }

    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<PresignedUrl> {
        self.record_call()?;

        Ok(PresignedUrl {
            url: format!(
                "https://{bucket}.s3.us-east-1.amazonaws.com/{key}?X-Amz-Expires={}&X-Amz-Signature=test",
                expires_in.as_secs()
            ),
            expires_in,
        })
    }
}

/// A request received by the upload target
#[derive(Debug, Clone)]
pub struct ReceivedUpload {
    pub path: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl ReceivedUpload {
    /// Byte offset of `needle` in the body
    pub fn find(&self, needle: &str) -> Option<usize> {
        self.body
            .windows(needle.len())
            .position(|window| window == needle.as_bytes())
    }
}

/// Local HTTP server standing in for the S3 POST endpoint
pub struct UploadTarget {
    pub url: String,
    received: Arc<Mutex<Vec<ReceivedUpload>>>,
}

impl UploadTarget {
    /// Starts a server answering every `POST /{bucket}` with `status` and `body`
    pub async fn spawn(status: StatusCode, body: &'static str) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = received.clone();

        let app = Router::new().route(
            "/{bucket}",
            post(move |uri: Uri, headers: HeaderMap, payload: Bytes| {
                let state = state.clone();
                async move {
                    record(&state, &uri, &headers, &payload);
                    (status, body)
                }
            }),
        );

        Self::serve(app, received).await
    }

    /// Starts a server that answers `POST /{bucket}` with a 303 to `location`,
    /// where a `GET` returns a 200 landing page
    pub async fn spawn_redirect(location: &'static str) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = received.clone();

        let app = Router::new()
            .route(
                "/{bucket}",
                post(move |uri: Uri, headers: HeaderMap, payload: Bytes| {
                    let state = state.clone();
                    async move {
                        record(&state, &uri, &headers, &payload);
                        (StatusCode::SEE_OTHER, [(LOCATION, location)])
                    }
                }),
            )
            .route(location, get(|| async { "welcome page" }));

        Self::serve(app, received).await
    }

    async fn serve(app: Router, received: Arc<Mutex<Vec<ReceivedUpload>>>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}"),
            received,
        }
    }

    /// Requests received so far
    pub fn received(&self) -> Vec<ReceivedUpload> {
        self.received.lock().unwrap().clone()
    }
}

fn record(
    state: &Mutex<Vec<ReceivedUpload>>,
    uri: &Uri,
    headers: &HeaderMap,
    payload: &Bytes,
) {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    state.lock().unwrap().push(ReceivedUpload {
        path: uri.path().to_string(),
        content_type,
        body: payload.to_vec(),
    });
}

/// Raw HTTP server that reads one multipart upload, answers 500 with a
/// `Content-Length` it never fulfils, and hangs up
pub async fn spawn_truncated_response() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        while !request.ends_with(b"--\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        socket
            .write_all(b"HTTP/1.1 500 Internal Server Error\r\nContent-Length: 100\r\n\r\npartial")
            .await
            .unwrap();
        socket.shutdown().await.ok();
    });

    format!("http://{addr}")
}

/// URL on localhost where nothing is listening
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Writes `contents` to `dir/name` and returns the path
pub fn write_file(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Upload request with default expiration and profile
pub fn upload_request(bucket: &str, file: &Path, key: Option<&str>) -> UploadRequest {
    UploadRequest {
        bucket: bucket.to_string(),
        file: file.to_path_buf(),
        key: key.map(str::to_string),
        expiration_secs: DEFAULT_EXPIRATION_SECS,
        profile: DEFAULT_PROFILE.to_string(),
    }
}

/// Whether this process still holds a descriptor for `path`
#[cfg(target_os = "linux")]
pub fn has_open_descriptor(path: &Path) -> bool {
    let target = path.canonicalize().unwrap();
    std::fs::read_dir("/proc/self/fd")
        .unwrap()
        .filter_map(Result::ok)
        .filter_map(|entry| std::fs::read_link(entry.path()).ok())
        .any(|link| link == target)
}
