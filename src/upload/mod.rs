//! Presigned document upload.
//!
//! Every file goes through the same three calls: `upload-init` on the broker
//! hands out a storage URL, the bytes go straight to storage, and
//! `upload-complete` tells the broker the object exists. The broker never
//! sees the bytes.

pub mod session;
pub mod storage;
pub mod uploader;

pub use session::{TransferredUpload, UploadProtocol, UploadSession};
pub use storage::{BlobStore, HttpBlobStore, TransferFailure};
pub use uploader::DocumentUploader;

use std::path::Path;

use serde::{Deserialize, Serialize};

/// MIME type used when nothing better is known.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// The three phases of one file's upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadPhase {
    Init,
    Put,
    Complete,
}

impl std::fmt::Display for UploadPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Init => "upload-init",
            Self::Put => "direct upload",
            Self::Complete => "upload-complete",
        };
        write!(f, "{s}")
    }
}

/// File contents plus the metadata the broker asks for.
#[derive(Clone, PartialEq, Eq)]
pub struct DocumentFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl DocumentFile {
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk. The MIME type falls back to
    /// `application/octet-stream`.
    pub async fn from_path(path: &Path, mime_type: Option<&str>) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();
        Ok(Self {
            file_name,
            mime_type: mime_type.unwrap_or(DEFAULT_MIME_TYPE).to_string(),
            bytes,
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

impl std::fmt::Debug for DocumentFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentFile")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// One document to attach to the new customer.
#[derive(Debug, Clone)]
pub struct DocumentUploadInput {
    /// Display name, e.g. "Director passport".
    pub name: String,
    /// Document category, e.g. "kyc" or "incorporation".
    pub category: String,
    pub document_type: Option<String>,
    pub file: DocumentFile,
    /// Registration to associate with; defaults to the request's registration.
    pub registration_id: Option<String>,
}
