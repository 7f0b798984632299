//! Onboarding input, and the JSON manifest it can be loaded from.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::api::{CompanyProfileInput, LoginCredentials, RegistrationStatus};
use crate::upload::{DocumentFile, DocumentUploadInput};

/// Everything needed to turn a registration into a customer.
#[derive(Debug, Clone)]
pub struct OnboardingRequest {
    /// Registration being converted. Must not be blank.
    pub registration_id: String,
    pub login: LoginCredentials,
    pub company_profile: CompanyProfileInput,
    /// Uploaded in this order.
    pub documents: Vec<DocumentUploadInput>,
    /// Status to put on the registration once everything else succeeded.
    pub registration_status_to_set: Option<RegistrationStatus>,
}

/// On-disk form of an [`OnboardingRequest`]; documents reference local files.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingManifest {
    pub registration_id: String,
    pub login: LoginCredentials,
    pub company_profile: CompanyProfileInput,
    #[serde(default)]
    pub documents: Vec<DocumentManifestEntry>,
    #[serde(default)]
    pub registration_status_to_set: Option<RegistrationStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentManifestEntry {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub document_type: Option<String>,
    /// Relative paths resolve against the manifest's directory.
    pub path: PathBuf,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub registration_id: Option<String>,
}

impl OnboardingManifest {
    /// Parse a manifest file.
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading manifest {}", path.display()))?;
        let manifest: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parsing manifest {}", path.display()))?;
        if manifest.registration_id.trim().is_empty() {
            anyhow::bail!("manifest {} has an empty registrationId", path.display());
        }
        Ok(manifest)
    }

    /// Read every referenced document and build the request.
    pub async fn into_request(self, base_dir: &Path) -> anyhow::Result<OnboardingRequest> {
        let mut documents = Vec::with_capacity(self.documents.len());
        for entry in self.documents {
            let path = if entry.path.is_absolute() {
                entry.path.clone()
            } else {
                base_dir.join(&entry.path)
            };
            let file = DocumentFile::from_path(&path, entry.mime_type.as_deref())
                .await
                .with_context(|| format!("reading document {:?} from {}", entry.name, path.display()))?;
            documents.push(DocumentUploadInput {
                name: entry.name,
                category: entry.category,
                document_type: entry.document_type,
                file,
                registration_id: entry.registration_id,
            });
        }

        Ok(OnboardingRequest {
            registration_id: self.registration_id,
            login: self.login,
            company_profile: self.company_profile,
            documents,
            registration_status_to_set: self.registration_status_to_set,
        })
    }
}

/// Load a manifest and everything it references.
pub async fn load_request(path: &Path) -> anyhow::Result<OnboardingRequest> {
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    OnboardingManifest::load(path).await?.into_request(base_dir).await
}
