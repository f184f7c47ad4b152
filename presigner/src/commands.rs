//! Operation handlers and the dispatcher that wires them to AWS

use object_storage::{Presigner, S3Presigner};
use tracing::{error, info};

use crate::{
    cli::Cli,
    report::Outcome,
    types::{
        DownloadRequest, Environment, Operation, PresignError, PresignResult, Request,
        UploadRequest,
    },
    upload::{UploadSource, Uploader},
};

/// Runs the operation selected on the command line against S3
///
/// # Errors
///
/// Returns the first error of the operation; nothing is retried
pub async fn execute(cli: Cli) -> PresignResult<Outcome> {
    let request = cli.into_request();
    let environment = Environment::from_env().inspect_err(|e| {
        error!(
            operation = %request.operation(),
            profile = request.profile(),
            kind = e.kind(),
            "Failed to read environment: {e}"
        );
    })?;

    info!(
        "Running {} with AWS profile '{}' ({environment:?})",
        request.operation(),
        request.profile()
    );

    let aws_config = environment.aws_config(request.profile()).await;
    let presigner = S3Presigner::new(&aws_config, environment.s3_client_config(&aws_config));

    match request {
        Request::Upload(request) => {
            let uploader = Uploader::new(environment.upload_timeout()).inspect_err(|e| {
                error!(
                    operation = %Operation::Post,
                    bucket = %request.bucket,
                    file = %request.file.display(),
                    kind = e.kind(),
                    "Failed to build upload client: {e}"
                );
            })?;
            upload(&request, &presigner, &uploader).await
        }
        Request::Download(request) => download_url(&request, &presigner).await,
    }
}

/// Uploads a file through a presigned POST
///
/// The file is opened before the provider is asked for anything, so a missing
/// file never reaches S3.
///
/// # Errors
///
/// Returns `FileSystem`, `Configuration`, `Authorization`, `Provider`,
/// `Transport` or `UploadStatus` errors; every failure is logged with the
/// operation context before it is returned.
pub async fn upload(
    request: &UploadRequest,
    presigner: &dyn Presigner,
    uploader: &Uploader,
) -> PresignResult<Outcome> {
    try_upload(request, presigner, uploader)
        .await
        .inspect_err(|e| {
            let key = request.object_key().unwrap_or_default();
            error!(
                operation = %Operation::Post,
                bucket = %request.bucket,
                file = %request.file.display(),
                key = %key,
                kind = e.kind(),
                "File upload failed: {e}"
            );
        })
}

async fn try_upload(
    request: &UploadRequest,
    presigner: &dyn Presigner,
    uploader: &Uploader,
) -> PresignResult<Outcome> {
    let key = request.object_key()?;
    let source = UploadSource::open(&request.file).await?;

    info!(
        "POST operation: Uploading {} to s3://{}/{key}",
        request.file.display(),
        request.bucket
    );

    // `source` is dropped, closing the file, if presigning fails
    let presigned_post = presigner
        .presign_post(&request.bucket, &key, request.expires_in())
        .await?;
    info!("Successfully generated presigned POST for {key}");

    uploader.upload(&presigned_post, &key, source).await?;

    Ok(Outcome::Uploaded {
        bucket: request.bucket.clone(),
        key,
    })
}

/// Generates a presigned GET URL
///
/// # Errors
///
/// Returns `Configuration`, `Authorization` or `Provider` errors, logged with
/// the operation context
pub async fn download_url(
    request: &DownloadRequest,
    presigner: &dyn Presigner,
) -> PresignResult<Outcome> {
    info!(
        "GET operation: Generating presigned URL for s3://{}/{}",
        request.bucket, request.key
    );

    let presigned_url = presigner
        .presign_get(&request.bucket, &request.key, request.expires_in())
        .await
        .map_err(PresignError::from)
        .inspect_err(|e| {
            error!(
                operation = %Operation::Get,
                bucket = %request.bucket,
                key = %request.key,
                kind = e.kind(),
                "Failed to generate presigned GET URL: {e}"
            );
        })?;

    info!("Successfully generated presigned GET URL for {}", request.key);

    Ok(Outcome::PresignedGet {
        url: presigned_url.url,
        expires_in_secs: request.expiration_secs,
    })
}
