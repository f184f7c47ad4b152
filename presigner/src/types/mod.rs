mod environment;
mod error;
mod request;

pub use environment::Environment;
pub use error::{PresignError, PresignResult};
pub use request::{
    DownloadRequest, Operation, Request, UploadRequest, DEFAULT_EXPIRATION_SECS, DEFAULT_PROFILE,
    MAX_EXPIRATION_SECS,
};
