//! Scripted in-memory stand-ins for the back office API and object storage.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use secrecy::SecretString;

use backoffice_onboarding::api::{
    AdminApi, CompanyProfile, CompanyProfileInput, CompanyProfilePayload, LoginCredentials,
    RegistrationStatus, RemoteId, UploadCompleteRequest, UploadInitRequest, UploadTarget,
};
use backoffice_onboarding::error::ApiError;
use backoffice_onboarding::onboarding::OnboardingRequest;
use backoffice_onboarding::upload::{BlobStore, DocumentFile, DocumentUploadInput, TransferFailure};

/// Where the fake API should reject a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fail {
    CreateCustomer,
    LinkRegistration,
    /// Both the create and the update of the profile are rejected with 422.
    CompanyProfile,
    /// upload-init rejected for the document with this name.
    InitFor(String),
    /// upload-complete rejected for the document with this name.
    CompleteFor(String),
    SetStatus,
}

pub struct FakeApi {
    customer_id: RemoteId,
    fail: Option<Fail>,
    profiles: Mutex<HashSet<String>>,
    next_document: AtomicUsize,
    /// document id -> document name, for complete-time failures.
    initialised: Mutex<Vec<(RemoteId, String)>>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            customer_id: RemoteId::Number(42),
            fail: None,
            profiles: Mutex::new(HashSet::new()),
            next_document: AtomicUsize::new(1),
            initialised: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(fail: Fail) -> Self {
        Self {
            fail: Some(fail),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls whose log entry starts with `prefix`.
    pub fn calls_to(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }

    fn log(&self, entry: String) {
        self.calls.lock().unwrap().push(entry);
    }

    fn reject(call: &'static str, status: u16, message: &str) -> ApiError {
        ApiError::Status {
            call,
            status,
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl AdminApi for FakeApi {
    async fn create_customer(&self, login: &LoginCredentials) -> Result<RemoteId, ApiError> {
        self.log(format!("create_customer:{}", login.email));
        if self.fail == Some(Fail::CreateCustomer) {
            return Err(Self::reject("create-login", 409, "Email already registered"));
        }
        Ok(self.customer_id.clone())
    }

    async fn link_registration(
        &self,
        registration_id: &str,
        customer_id: &RemoteId,
    ) -> Result<(), ApiError> {
        self.log(format!("link_registration:{registration_id}:{customer_id}"));
        if self.fail == Some(Fail::LinkRegistration) {
            return Err(Self::reject("link-registration", 404, "Registration not found"));
        }
        Ok(())
    }

    async fn create_company_profile(
        &self,
        customer_id: &RemoteId,
        payload: &CompanyProfilePayload,
    ) -> Result<CompanyProfile, ApiError> {
        self.log(format!("create_profile:{customer_id}"));
        if self.fail == Some(Fail::CompanyProfile) {
            return Err(Self::reject("company-profile", 422, "Invalid incorporation date"));
        }
        if !self.profiles.lock().unwrap().insert(customer_id.to_string()) {
            return Err(Self::reject("company-profile", 409, "Company profile already exists"));
        }
        Ok(CompanyProfile {
            id: Some(RemoteId::Number(7)),
            customer_id: Some(customer_id.clone()),
            company_name: Some(payload.profile.company_name.clone()),
            registration_id: payload.registration_id.clone(),
        })
    }

    async fn update_company_profile(
        &self,
        customer_id: &RemoteId,
        payload: &CompanyProfilePayload,
    ) -> Result<CompanyProfile, ApiError> {
        self.log(format!("update_profile:{customer_id}"));
        if self.fail == Some(Fail::CompanyProfile) {
            return Err(Self::reject("company-profile", 422, "Invalid incorporation date"));
        }
        if !self.profiles.lock().unwrap().contains(&customer_id.to_string()) {
            return Err(Self::reject("company-profile", 404, "Company profile not found"));
        }
        Ok(CompanyProfile {
            id: Some(RemoteId::Number(7)),
            customer_id: Some(customer_id.clone()),
            company_name: Some(payload.profile.company_name.clone()),
            registration_id: payload.registration_id.clone(),
        })
    }

    async fn upload_init(
        &self,
        _customer_id: &RemoteId,
        request: &UploadInitRequest,
    ) -> Result<UploadTarget, ApiError> {
        self.log(format!(
            "upload_init:{}:{}",
            request.name,
            request.registration_id.as_deref().unwrap_or("-")
        ));
        if self.fail == Some(Fail::InitFor(request.name.clone())) {
            return Err(Self::reject("upload-init", 400, "Registration linkage missing"));
        }
        let n = self.next_document.fetch_add(1, Ordering::SeqCst);
        let document_id = RemoteId::Text(format!("doc_{n}"));
        self.initialised
            .lock()
            .unwrap()
            .push((document_id.clone(), request.name.clone()));
        Ok(UploadTarget {
            document_id,
            upload_url: format!("https://storage.test/bucket/doc_{n}"),
            upload_method: None,
            required_headers: Default::default(),
        })
    }

    async fn upload_complete(
        &self,
        _customer_id: &RemoteId,
        document_id: &RemoteId,
        request: &UploadCompleteRequest,
    ) -> Result<(), ApiError> {
        self.log(format!(
            "upload_complete:{document_id}:{}",
            request.etag.as_deref().unwrap_or("-")
        ));
        let name = self
            .initialised
            .lock()
            .unwrap()
            .iter()
            .find(|(id, _)| id == document_id)
            .map(|(_, name)| name.clone());
        if let (Some(Fail::CompleteFor(failing)), Some(name)) = (&self.fail, name) {
            if *failing == name {
                return Err(Self::reject("upload-complete", 404, "Upload session expired"));
            }
        }
        Ok(())
    }

    async fn set_registration_status(
        &self,
        registration_id: &str,
        status: RegistrationStatus,
    ) -> Result<(), ApiError> {
        self.log(format!("set_status:{registration_id}:{status}"));
        if self.fail == Some(Fail::SetStatus) {
            return Err(Self::reject("set-status", 422, "Invalid status transition"));
        }
        Ok(())
    }
}

/// In-memory storage that can refuse one file and optionally returns ETags.
pub struct FakeStore {
    fail_file: Option<String>,
    etag: Option<String>,
    puts: Mutex<Vec<String>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self {
            fail_file: None,
            etag: Some("\"etag-1\"".to_string()),
            puts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_for(file_name: &str) -> Self {
        Self {
            fail_file: Some(file_name.to_string()),
            ..Self::new()
        }
    }

    pub fn puts(&self) -> Vec<String> {
        self.puts.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobStore for FakeStore {
    async fn put(
        &self,
        _target: &UploadTarget,
        file: &DocumentFile,
    ) -> Result<Option<String>, TransferFailure> {
        self.puts.lock().unwrap().push(file.file_name.clone());
        if self.fail_file.as_deref() == Some(file.file_name.as_str()) {
            return Err(TransferFailure {
                status: Some(403),
                reason: "storage returned 403 Forbidden".to_string(),
            });
        }
        Ok(self.etag.clone())
    }
}

pub fn login() -> LoginCredentials {
    LoginCredentials {
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        email: "grace@example.com".to_string(),
        password: SecretString::from("correct horse battery staple"),
    }
}

pub fn company_profile() -> CompanyProfileInput {
    CompanyProfileInput {
        company_name: "Compiler Works Ltd".to_string(),
        business_nature: "Software consultancy".to_string(),
        business_email: "info@compiler.test".to_string(),
        phone_number: "+852 5555 0000".to_string(),
        registered_office_address: "1 Harbour Road, Wan Chai".to_string(),
        company_type: Some("private_limited".to_string()),
        country: Some("HK".to_string()),
        registration_number: None,
        incorporation_date: None,
    }
}

/// Document `n` is named `Document n` with file `doc-n.pdf`.
pub fn document(n: usize) -> DocumentUploadInput {
    DocumentUploadInput {
        name: format!("Document {n}"),
        category: "kyc".to_string(),
        document_type: Some("passport".to_string()),
        file: DocumentFile::new(
            format!("doc-{n}.pdf"),
            "application/pdf",
            format!("%PDF-{n}").into_bytes(),
        ),
        registration_id: None,
    }
}

pub fn request(documents: usize, status: Option<RegistrationStatus>) -> OnboardingRequest {
    OnboardingRequest {
        registration_id: "reg_1".to_string(),
        login: login(),
        company_profile: company_profile(),
        documents: (1..=documents).map(document).collect(),
        registration_status_to_set: status,
    }
}
