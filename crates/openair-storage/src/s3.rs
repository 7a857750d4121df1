//! S3 storage backend.
//!
//! Works against any S3-compatible endpoint (MinIO and friends) via a custom
//! endpoint URL and path-style addressing. SDK retries are disabled: a failed
//! storage call surfaces immediately rather than being retried under the
//! caller.

use crate::traits::{
    ObjectStat, ObjectStorage, ObjectStream, StorageError, StorageObject, StorageResult,
};
use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use aws_sdk_s3::Client;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use openair_core::S3Config;
use std::pin::Pin;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::io::ReaderStream;

// Parts below 5MB (except the last) are rejected by S3.
const MULTIPART_THRESHOLD: u64 = 5 * 1024 * 1024;
const PART_SIZE: usize = 5 * 1024 * 1024;

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
}

impl S3Storage {
    /// Create a new S3Storage instance from configuration.
    pub fn new(config: &S3Config) -> Self {
        let credentials = Credentials::new(
            config.user.clone(),
            config.password.clone(),
            None,
            None,
            "openair-config",
        );

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(config.endpoint())
            .credentials_provider(credentials)
            .retry_config(RetryConfig::disabled())
            .force_path_style(true)
            .build();

        S3Storage {
            client: Client::from_conf(s3_config),
            bucket: config.bucket.clone(),
        }
    }

    fn convert_timestamp(timestamp: Option<&aws_sdk_s3::primitives::DateTime>) -> DateTime<Utc> {
        timestamp
            .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos()))
            .unwrap_or_default()
    }

    async fn head(&self, key: &str) -> StorageResult<ObjectStat> {
        let response = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| match &e {
                SdkError::ServiceError(service_err) => match service_err.err() {
                    HeadObjectError::NotFound(_) => StorageError::NotFound(key.to_string()),
                    _ => StorageError::BackendError(e.to_string()),
                },
                _ => StorageError::BackendError(e.to_string()),
            })?;

        Ok(ObjectStat {
            content_type: response
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string(),
            size: response.content_length().unwrap_or(0).max(0) as u64,
            tag: response.e_tag().unwrap_or_default().to_string(),
            modified: Self::convert_timestamp(response.last_modified()),
        })
    }

    async fn put_multipart(
        &self,
        key: &str,
        content_type: &str,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64> {
        let create_result = self
            .client
            .create_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    "Failed to create multipart upload"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        let upload_id = create_result
            .upload_id()
            .ok_or_else(|| StorageError::UploadFailed("No upload ID returned".to_string()))?;

        let mut part_number = 1i32;
        let mut parts = Vec::new();
        let mut part_buffer = vec![0u8; PART_SIZE];
        let mut total_size = 0u64;

        loop {
            let mut bytes_in_part = 0usize;
            while bytes_in_part < PART_SIZE {
                let bytes_read = reader
                    .read(&mut part_buffer[bytes_in_part..])
                    .await
                    .map_err(|e| {
                        StorageError::UploadFailed(format!("Failed to read from stream: {e}"))
                    })?;

                if bytes_read == 0 {
                    break; // EOF
                }

                bytes_in_part += bytes_read;
            }

            if bytes_in_part == 0 {
                break;
            }

            total_size += bytes_in_part as u64;

            let part_body = ByteStream::from(Bytes::from(part_buffer[..bytes_in_part].to_vec()));

            let upload_part_result = self
                .client
                .upload_part()
                .bucket(&self.bucket)
                .key(key)
                .upload_id(upload_id)
                .part_number(part_number)
                .body(part_body)
                .send()
                .await
                .map_err(|e| {
                    tracing::error!(
                        error = %e,
                        bucket = %self.bucket,
                        key = %key,
                        part_number,
                        "Failed to upload part"
                    );
                    StorageError::UploadFailed(e.to_string())
                })?;

            let etag = upload_part_result
                .e_tag()
                .ok_or_else(|| {
                    StorageError::UploadFailed(format!("No ETag returned for part {part_number}"))
                })?
                .to_string();

            parts.push(
                CompletedPart::builder()
                    .part_number(part_number)
                    .e_tag(etag)
                    .build(),
            );

            part_number += 1;

            if bytes_in_part < PART_SIZE {
                break; // EOF inside this part
            }
        }

        let completed_parts = CompletedMultipartUpload::builder()
            .set_parts(Some(parts))
            .build();

        self.client
            .complete_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .upload_id(upload_id)
            .multipart_upload(completed_parts)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    "Failed to complete multipart upload"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        Ok(total_size)
    }

    async fn put_single(
        &self,
        key: &str,
        content_type: &str,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<u64> {
        let mut buffer = Vec::new();
        reader
            .read_to_end(&mut buffer)
            .await
            .map_err(|e| StorageError::UploadFailed(format!("Failed to read from stream: {e}")))?;

        let size = buffer.len() as u64;
        let body = ByteStream::from(Bytes::from(buffer));

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    size_bytes = size,
                    "S3 upload failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        Ok(size)
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn list(&self, prefix: &str) -> StorageResult<Vec<StorageObject>> {
        let start = std::time::Instant::now();
        let mut objects = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .delimiter("/");
            if let Some(token) = &continuation_token {
                request = request.continuation_token(token);
            }

            let response = request.send().await.map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    prefix = %prefix,
                    "S3 list failed"
                );
                StorageError::BackendError(e.to_string())
            })?;

            for object in response.contents() {
                let Some(key) = object.key() else { continue };
                objects.push(StorageObject {
                    key: key.to_string(),
                    size: object.size().unwrap_or(0).max(0) as u64,
                    modified: Self::convert_timestamp(object.last_modified()),
                    tag: object.e_tag().map(str::to_string),
                });
            }

            continuation_token = response.next_continuation_token().map(str::to_string);
            if !response.is_truncated().unwrap_or(false) || continuation_token.is_none() {
                break;
            }
        }

        tracing::debug!(
            bucket = %self.bucket,
            prefix = %prefix,
            count = objects.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 list successful"
        );

        Ok(objects)
    }

    async fn stat(&self, key: &str) -> StorageResult<ObjectStat> {
        self.head(key).await
    }

    async fn get(&self, key: &str) -> StorageResult<(ObjectStat, ObjectStream)> {
        let start = std::time::Instant::now();

        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| match &e {
                SdkError::ServiceError(service_err) => match service_err.err() {
                    GetObjectError::NoSuchKey(_) => StorageError::NotFound(key.to_string()),
                    _ => {
                        tracing::error!(
                            error = %e,
                            bucket = %self.bucket,
                            key = %key,
                            "S3 download failed"
                        );
                        StorageError::DownloadFailed(e.to_string())
                    }
                },
                _ => {
                    tracing::error!(
                        error = %e,
                        bucket = %self.bucket,
                        key = %key,
                        "S3 download failed"
                    );
                    StorageError::DownloadFailed(e.to_string())
                }
            })?;

        let stat = ObjectStat {
            content_type: response
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string(),
            size: response.content_length().unwrap_or(0).max(0) as u64,
            tag: response.e_tag().unwrap_or_default().to_string(),
            modified: Self::convert_timestamp(response.last_modified()),
        };

        let async_read = response.body.into_async_read();
        let stream = ReaderStream::new(async_read)
            .map(|result| result.map_err(|e| StorageError::DownloadFailed(e.to_string())));

        let bucket = self.bucket.clone();
        let logged_key = key.to_string();
        let logged_stream = stream.map(move |item| {
            if item.is_err() {
                tracing::error!(
                    bucket = %bucket,
                    key = %logged_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 stream download error"
                );
            }
            item
        });

        Ok((stat, Box::pin(logged_stream)))
    }

    async fn put(
        &self,
        key: &str,
        content_type: &str,
        content_length: Option<u64>,
        reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<()> {
        let start = std::time::Instant::now();

        // Multipart for unbounded or large bodies, plain put otherwise.
        let use_multipart = content_length
            .map(|len| len > MULTIPART_THRESHOLD)
            .unwrap_or(true);

        let size = if use_multipart {
            self.put_multipart(key, content_type, reader).await?
        } else {
            self.put_single(key, content_type, reader).await?
        };

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            multipart = use_multipart,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let start = std::time::Instant::now();

        // DeleteObject is silent on absent keys; stat first so callers can
        // tell removal apart from never-existed.
        self.head(key).await?;

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    "S3 delete failed"
                );
                StorageError::DeleteFailed(e.to_string())
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }
}
