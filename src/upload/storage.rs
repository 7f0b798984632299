//! Direct transfer of file bytes to object storage.

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, ETAG, HeaderMap, HeaderName, HeaderValue};

use super::DocumentFile;
use crate::api::UploadTarget;
use crate::config::ApiConfig;
use crate::error::ApiError;

/// Longest storage error body kept in a failure reason.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// A direct transfer that storage did not accept.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct TransferFailure {
    /// Storage status code, if storage answered.
    pub status: Option<u16>,
    pub reason: String,
}

impl TransferFailure {
    fn new(status: Option<u16>, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
        }
    }
}

/// Object storage reachable through presigned URLs.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Send the file to the target. Returns the storage ETag, if any.
    async fn put(
        &self,
        target: &UploadTarget,
        file: &DocumentFile,
    ) -> Result<Option<String>, TransferFailure>;
}

/// [`BlobStore`] over plain HTTP. Only the broker-supplied headers are sent;
/// the back office bearer token never reaches storage.
pub struct HttpBlobStore {
    client: reqwest::Client,
}

impl HttpBlobStore {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        Ok(Self {
            client: crate::api::http_client(config)?,
        })
    }

    fn headers(target: &UploadTarget, file: &DocumentFile) -> Result<HeaderMap, TransferFailure> {
        let mut headers = HeaderMap::new();
        for (name, value) in &target.required_headers {
            let header = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| TransferFailure::new(None, format!("invalid header name {name:?}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| TransferFailure::new(None, format!("invalid value for header {name}")))?;
            headers.insert(header, value);
        }

        if !headers.contains_key(CONTENT_TYPE) {
            let mime = HeaderValue::from_str(&file.mime_type).map_err(|_| {
                TransferFailure::new(None, format!("invalid MIME type {:?}", file.mime_type))
            })?;
            headers.insert(CONTENT_TYPE, mime);
        }

        Ok(headers)
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn put(
        &self,
        target: &UploadTarget,
        file: &DocumentFile,
    ) -> Result<Option<String>, TransferFailure> {
        let method = Method::from_bytes(target.method().to_ascii_uppercase().as_bytes())
            .map_err(|_| {
                TransferFailure::new(None, format!("invalid upload method {:?}", target.method()))
            })?;
        let url = reqwest::Url::parse(&target.upload_url)
            .map_err(|e| TransferFailure::new(None, format!("invalid upload URL: {e}")))?;
        let headers = Self::headers(target, file)?;

        tracing::debug!(
            %method,
            host = url.host_str().unwrap_or_default(),
            file = %file.file_name,
            size = file.size(),
            "Sending file to storage"
        );

        let resp = self
            .client
            .request(method, url)
            .headers(headers)
            .body(file.bytes.clone())
            .send()
            .await
            .map_err(|e| TransferFailure::new(None, e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let snippet: String = body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect();
            let reason = if snippet.is_empty() {
                format!("storage returned {status}")
            } else {
                format!("storage returned {status}: {snippet}")
            };
            return Err(TransferFailure::new(Some(status.as_u16()), reason));
        }

        let etag = resp
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from);

        Ok(etag)
    }
}
