//! Back office API seam.
//!
//! The onboarding flow only ever talks to the API through [`AdminApi`], so
//! tests and alternative transports can stand in for [`HttpAdminApi`].

mod client;
pub mod types;

pub use client::HttpAdminApi;
pub(crate) use client::http_client;
pub use types::*;

use async_trait::async_trait;

use crate::error::ApiError;

/// Calls the onboarding flow makes against the back office API.
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// Create the customer login. Returns the new customer id.
    async fn create_customer(&self, login: &LoginCredentials) -> Result<RemoteId, ApiError>;

    /// Associate a customer with the registration it was created from.
    async fn link_registration(
        &self,
        registration_id: &str,
        customer_id: &RemoteId,
    ) -> Result<(), ApiError>;

    /// Create the customer's company profile.
    async fn create_company_profile(
        &self,
        customer_id: &RemoteId,
        payload: &CompanyProfilePayload,
    ) -> Result<CompanyProfile, ApiError>;

    /// Update an existing company profile.
    async fn update_company_profile(
        &self,
        customer_id: &RemoteId,
        payload: &CompanyProfilePayload,
    ) -> Result<CompanyProfile, ApiError>;

    /// Register an upload and obtain a presigned storage target.
    async fn upload_init(
        &self,
        customer_id: &RemoteId,
        request: &UploadInitRequest,
    ) -> Result<UploadTarget, ApiError>;

    /// Tell the broker the direct transfer finished.
    async fn upload_complete(
        &self,
        customer_id: &RemoteId,
        document_id: &RemoteId,
        request: &UploadCompleteRequest,
    ) -> Result<(), ApiError>;

    /// Set the status field of a registration.
    async fn set_registration_status(
        &self,
        registration_id: &str,
        status: RegistrationStatus,
    ) -> Result<(), ApiError>;
}
