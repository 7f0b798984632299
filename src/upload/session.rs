//! The init → put → complete handshake for a single file.
//!
//! Each phase consumes the value produced by the previous one, so the calls
//! can only be made in order: there is no way to `put` without an `init`, or
//! to `complete` without a successful `put`.

use super::storage::BlobStore;
use super::{DocumentFile, DocumentUploadInput, UploadPhase};
use crate::api::{AdminApi, RemoteId, UploadCompleteRequest, UploadInitRequest, UploadTarget};
use crate::error::UploadError;

/// Entry point for uploading files on behalf of one customer.
#[derive(Clone, Copy)]
pub struct UploadProtocol<'a> {
    api: &'a dyn AdminApi,
    store: &'a dyn BlobStore,
    customer_id: &'a RemoteId,
}

impl<'a> UploadProtocol<'a> {
    pub fn new(api: &'a dyn AdminApi, store: &'a dyn BlobStore, customer_id: &'a RemoteId) -> Self {
        Self {
            api,
            store,
            customer_id,
        }
    }

    /// Register the upload with the broker and obtain a storage target.
    pub async fn init(
        &self,
        document: &str,
        request: &UploadInitRequest,
    ) -> Result<UploadSession<'a>, UploadError> {
        let target = self
            .api
            .upload_init(self.customer_id, request)
            .await
            .map_err(|source| UploadError::Broker {
                phase: UploadPhase::Init,
                document: document.to_string(),
                source,
            })?;

        tracing::debug!(
            document,
            document_id = %target.document_id,
            method = target.method(),
            "Upload initialised"
        );

        Ok(UploadSession {
            protocol: *self,
            document: document.to_string(),
            target,
        })
    }

    /// Run all three phases for one input. Returns the broker's document id.
    pub async fn upload(
        &self,
        input: &DocumentUploadInput,
        registration_id: Option<&str>,
    ) -> Result<RemoteId, UploadError> {
        let request = UploadInitRequest {
            name: input.name.clone(),
            category: input.category.clone(),
            file_name: input.file.file_name.clone(),
            mime_type: input.file.mime_type.clone(),
            file_size: input.file.size(),
            document_type: input.document_type.clone(),
            registration_id: input
                .registration_id
                .as_deref()
                .or(registration_id)
                .map(String::from),
        };

        self.init(&input.name, &request)
            .await?
            .put(&input.file)
            .await?
            .complete()
            .await
    }
}

/// An initialised upload waiting for its bytes.
pub struct UploadSession<'a> {
    protocol: UploadProtocol<'a>,
    document: String,
    target: UploadTarget,
}

impl<'a> UploadSession<'a> {
    pub fn document_id(&self) -> &RemoteId {
        &self.target.document_id
    }

    pub fn target(&self) -> &UploadTarget {
        &self.target
    }

    /// Send the bytes directly to storage.
    pub async fn put(self, file: &DocumentFile) -> Result<TransferredUpload<'a>, UploadError> {
        let etag = self
            .protocol
            .store
            .put(&self.target, file)
            .await
            .map_err(|failure| UploadError::Transfer {
                document: self.document.clone(),
                status: failure.status,
                reason: failure.reason,
            })?;

        Ok(TransferredUpload {
            protocol: self.protocol,
            document: self.document,
            document_id: self.target.document_id,
            etag,
        })
    }
}

/// Bytes are in storage; the broker has not been told yet.
pub struct TransferredUpload<'a> {
    protocol: UploadProtocol<'a>,
    document: String,
    document_id: RemoteId,
    etag: Option<String>,
}

impl TransferredUpload<'_> {
    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    /// Finalise the upload, forwarding the storage ETag when there is one.
    pub async fn complete(self) -> Result<RemoteId, UploadError> {
        let request = UploadCompleteRequest::new(self.etag);
        self.protocol
            .api
            .upload_complete(self.protocol.customer_id, &self.document_id, &request)
            .await
            .map_err(|source| UploadError::Broker {
                phase: UploadPhase::Complete,
                document: self.document,
                source,
            })?;

        Ok(self.document_id)
    }
}
