//! Object storage presigning
//!
//! This crate provides the storage side of the presigner CLI: presigned POST
//! descriptors and presigned GET URLs for S3 objects, behind the `Presigner`
//! trait so callers can swap in another provider.

#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(missing_docs)]

mod bucket;
mod client;
mod error;
pub mod post_policy;
mod types;

pub use bucket::validate_bucket_name;
pub use client::{Presigner, S3Presigner};
pub use error::{StorageError, StorageResult};
pub use types::{PresignedPost, PresignedUrl};
