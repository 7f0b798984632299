//! Sequential upload of a request's documents.

use std::sync::Arc;

use super::session::UploadProtocol;
use super::storage::BlobStore;
use super::DocumentUploadInput;
use crate::api::{AdminApi, RemoteId};
use crate::error::UploadError;
use crate::onboarding::result::PartialResult;

/// Uploads documents one at a time, stopping at the first failure.
///
/// Each finished document is recorded in the caller's accumulator as soon as
/// its upload completes, so a later failure still reports everything that
/// made it. The failing document and everything after it are left alone.
#[derive(Clone)]
pub struct DocumentUploader {
    api: Arc<dyn AdminApi>,
    store: Arc<dyn BlobStore>,
}

impl DocumentUploader {
    pub fn new(api: Arc<dyn AdminApi>, store: Arc<dyn BlobStore>) -> Self {
        Self { api, store }
    }

    /// Upload `documents` in order for `customer_id`.
    ///
    /// `on_start` is called with the 1-based position and total before each
    /// document is attempted.
    pub async fn upload_all(
        &self,
        customer_id: &RemoteId,
        registration_id: &str,
        documents: &[DocumentUploadInput],
        partial: &mut PartialResult,
        mut on_start: impl FnMut(usize, usize) + Send,
    ) -> Result<(), UploadError> {
        let protocol = UploadProtocol::new(self.api.as_ref(), self.store.as_ref(), customer_id);
        let total = documents.len();

        for (index, input) in documents.iter().enumerate() {
            on_start(index + 1, total);

            match protocol.upload(input, Some(registration_id)).await {
                Ok(document_id) => {
                    tracing::info!(
                        document = %input.name,
                        %document_id,
                        position = index + 1,
                        total,
                        "Document uploaded"
                    );
                    partial.record_uploaded_document(document_id);
                }
                Err(e) => {
                    tracing::warn!(
                        document = %input.name,
                        phase = %e.phase(),
                        position = index + 1,
                        total,
                        skipped = total - index - 1,
                        error = %e,
                        "Document upload failed; remaining documents not attempted"
                    );
                    return Err(e);
                }
            }
        }

        Ok(())
    }
}
