//! Presigned S3 upload and download URL CLI
//!
//! `post` uploads a local file through a presigned POST, `get` prints a
//! presigned GET URL. Each invocation runs one operation and exits.

#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(missing_docs)]

/// Command-line parsing
pub mod cli;

/// Operation handlers and dispatch
pub mod commands;

/// Result formatting and exit codes
pub mod report;

/// Logging setup
pub mod telemetry;

/// Requests, configuration and errors
pub mod types;

/// Multipart upload to presigned POST targets
pub mod upload;
