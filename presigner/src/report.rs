//! Result reporting and exit codes

use std::fmt;
use std::io::{self, Write};

use crate::types::PresignResult;

/// Exit code when the result itself could not be written
const EXIT_OUTPUT_FAILURE: u8 = 1;

/// Successful result of an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// File uploaded through a presigned POST
    Uploaded {
        /// Bucket the object landed in
        bucket: String,
        /// Resolved object key
        key: String,
    },
    /// Presigned GET URL generated
    PresignedGet {
        /// The presigned URL
        url: String,
        /// Lifetime the URL was signed for
        expires_in_secs: u64,
    },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uploaded { bucket, key } => {
                writeln!(f, "SUCCESS: File uploaded to S3")?;
                writeln!(f, "S3 Object Key: {key}")?;
                write!(f, "S3 URI: s3://{bucket}/{key}")
            }
            Self::PresignedGet {
                url,
                expires_in_secs,
            } => {
                writeln!(f, "SUCCESS: Presigned GET URL generated")?;
                writeln!(f, "URL: {url}")?;
                write!(f, "Expires in: {expires_in_secs} seconds")
            }
        }
    }
}

/// Prints the result to stdout/stderr and returns the process exit code
#[must_use]
pub fn report(result: &PresignResult<Outcome>) -> u8 {
    write_report(result, &mut io::stdout().lock(), &mut io::stderr().lock())
}

/// Writes a success block to `out` or an `ERROR:` line to `err`
#[must_use]
pub fn write_report(
    result: &PresignResult<Outcome>,
    out: &mut impl Write,
    err: &mut impl Write,
) -> u8 {
    match result {
        Ok(outcome) => match writeln!(out, "{outcome}") {
            Ok(()) => 0,
            Err(_) => EXIT_OUTPUT_FAILURE,
        },
        Err(error) => {
            // Nothing left to report to if stderr is gone
            let _ = writeln!(err, "ERROR: {error}");
            error.exit_code()
        }
    }
}
