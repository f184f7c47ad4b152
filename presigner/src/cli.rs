//! Command-line interface

use std::path::PathBuf;

use clap::{builder::NonEmptyStringValueParser, value_parser, Args, Parser, Subcommand};

use crate::types::{
    DownloadRequest, Operation, Request, UploadRequest, DEFAULT_EXPIRATION_SECS, DEFAULT_PROFILE,
    MAX_EXPIRATION_SECS,
};

const EXAMPLES: &str = "\
Examples:
  # Upload a file and get the S3 object key
  presigner post --bucket my-bucket --file image.jpg

  # Generate a presigned GET URL for downloading
  presigner get --bucket my-bucket --key path/to/image.jpg

  # Upload with custom expiration time (2 hours)
  presigner post --bucket my-bucket --file image.jpg --expiration 7200";

/// S3 presigned URL generator and file uploader
#[derive(Debug, Parser)]
#[command(name = "presigner", version, about, after_help = EXAMPLES)]
pub struct Cli {
    /// AWS profile name
    #[arg(
        long,
        short = 'p',
        global = true,
        default_value = DEFAULT_PROFILE,
        value_parser = NonEmptyStringValueParser::new()
    )]
    pub profile: String,

    /// Operation to perform
    #[command(subcommand)]
    pub command: Command,
}

/// Supported operations
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Upload file using presigned POST URL
    Post(PostArgs),
    /// Generate presigned GET URL for downloading
    Get(GetArgs),
}

/// Arguments for `post`
#[derive(Debug, Args)]
pub struct PostArgs {
    /// S3 bucket name
    #[arg(long, short = 'b', value_parser = NonEmptyStringValueParser::new())]
    pub bucket: String,

    /// File path to upload
    #[arg(long, short = 'f')]
    pub file: PathBuf,

    /// S3 object key (defaults to filename)
    #[arg(long, short = 'k', value_parser = NonEmptyStringValueParser::new())]
    pub key: Option<String>,

    /// URL expiration time in seconds
    #[arg(
        long,
        short = 'e',
        default_value_t = DEFAULT_EXPIRATION_SECS,
        value_parser = value_parser!(u64).range(1..=MAX_EXPIRATION_SECS)
    )]
    pub expiration: u64,
}

/// Arguments for `get`
#[derive(Debug, Args)]
pub struct GetArgs {
    /// S3 bucket name
    #[arg(long, short = 'b', value_parser = NonEmptyStringValueParser::new())]
    pub bucket: String,

    /// S3 object key
    #[arg(long, short = 'k', value_parser = NonEmptyStringValueParser::new())]
    pub key: String,

    /// URL expiration time in seconds
    #[arg(
        long,
        short = 'e',
        default_value_t = DEFAULT_EXPIRATION_SECS,
        value_parser = value_parser!(u64).range(1..=MAX_EXPIRATION_SECS)
    )]
    pub expiration: u64,
}

impl Cli {
    /// Turns parsed arguments into the matching request record
    #[must_use]
    pub fn into_request(self) -> Request {
        match self.command {
            Command::Post(args) => Request::Upload(UploadRequest {
                bucket: args.bucket,
                file: args.file,
                key: args.key,
                expiration_secs: args.expiration,
                profile: self.profile,
            }),
            Command::Get(args) => Request::Download(DownloadRequest {
                bucket: args.bucket,
                key: args.key,
                expiration_secs: args.expiration,
                profile: self.profile,
            }),
        }
    }
}

/// First raw argument naming an operation, for logging arguments that failed to parse
pub fn requested_operation<I, S>(args: I) -> Option<Operation>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    args.into_iter().find_map(|arg| arg.as_ref().parse().ok())
}
