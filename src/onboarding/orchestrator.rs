//! OnboardingOrchestrator — runs the onboarding steps in order and reports
//! how far it got.

use std::sync::Arc;

use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::api::{AdminApi, CompanyProfile, CompanyProfilePayload, HttpAdminApi, RemoteId};
use crate::config::ApiConfig;
use crate::error::{self, ApiError, OnboardingFlowError, StepError};
use crate::upload::{BlobStore, DocumentUploader, HttpBlobStore};

use super::progress::{ProgressReporter, notify};
use super::request::OnboardingRequest;
use super::result::{OnboardingOutcome, PartialResult};
use super::state::OnboardingState;
use super::step::OnboardingStep;

/// A step that failed, before the accumulator is attached.
struct StepFailure {
    step: OnboardingStep,
    cause: StepError,
}

impl StepFailure {
    fn at(step: OnboardingStep) -> impl FnOnce(ApiError) -> StepFailure {
        move |e| StepFailure {
            step,
            cause: e.into(),
        }
    }
}

/// Converts registrations into customers.
///
/// Steps run strictly one after another: create login, link registration,
/// save company profile, upload documents, set registration status. The first
/// failure stops the run. Nothing already created is undone; the returned
/// error says exactly what exists.
///
/// Holds no per-run state, so one orchestrator can serve concurrent runs for
/// different registrations.
#[derive(Clone)]
pub struct OnboardingOrchestrator {
    api: Arc<dyn AdminApi>,
    uploader: DocumentUploader,
}

impl OnboardingOrchestrator {
    pub fn new(api: Arc<dyn AdminApi>, store: Arc<dyn BlobStore>) -> Self {
        let uploader = DocumentUploader::new(Arc::clone(&api), store);
        Self { api, uploader }
    }

    /// Build an orchestrator talking HTTP to the configured API.
    pub fn from_config(config: &ApiConfig) -> error::Result<Self> {
        let api: Arc<dyn AdminApi> = Arc::new(HttpAdminApi::new(config)?);
        let store: Arc<dyn BlobStore> = Arc::new(HttpBlobStore::new(config)?);
        Ok(Self::new(api, store))
    }

    /// Build an orchestrator from the `BACKOFFICE_*` environment variables.
    pub fn from_env() -> error::Result<Self> {
        Self::from_config(&ApiConfig::from_env()?)
    }

    /// Run the whole flow for one request.
    pub async fn run(
        &self,
        request: &OnboardingRequest,
        progress: &dyn ProgressReporter,
    ) -> Result<OnboardingOutcome, OnboardingFlowError> {
        let span = info_span!(
            "onboarding",
            run_id = %Uuid::new_v4(),
            registration_id = %request.registration_id
        );

        async move {
            let mut partial = PartialResult::default();
            let mut state = OnboardingState::default();

            match self.drive(request, progress, &mut partial, &mut state).await {
                Ok(customer_id) => {
                    advance(&mut state);
                    notify(progress, None, "Onboarding complete");
                    info!(
                        %customer_id,
                        documents = partial.uploaded_documents().len(),
                        "Onboarding complete"
                    );
                    Ok(partial.into_outcome(customer_id))
                }
                Err(StepFailure { step, cause }) => {
                    warn!(
                        %step,
                        reached = %state,
                        error = %cause,
                        progress = %partial.summary(),
                        "Onboarding stopped"
                    );
                    Err(OnboardingFlowError::new(step, cause, partial))
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn drive(
        &self,
        request: &OnboardingRequest,
        progress: &dyn ProgressReporter,
        partial: &mut PartialResult,
        state: &mut OnboardingState,
    ) -> Result<RemoteId, StepFailure> {
        // Checked before anything is created: an empty id would address the
        // registrations collection instead of one registration.
        if request.registration_id.trim().is_empty() {
            return Err(StepFailure::at(OnboardingStep::LinkRegistration)(
                ApiError::InvalidRequest {
                    call: "link-registration",
                    reason: "registration id is empty".to_string(),
                },
            ));
        }

        notify(
            progress,
            Some(OnboardingStep::CreateLogin),
            "Creating customer account…",
        );
        let customer_id = self
            .api
            .create_customer(&request.login)
            .await
            .map_err(StepFailure::at(OnboardingStep::CreateLogin))?;
        partial.record_customer(customer_id.clone());
        advance(state);
        info!(%customer_id, "Customer account created");

        notify(
            progress,
            Some(OnboardingStep::LinkRegistration),
            "Linking registration…",
        );
        self.api
            .link_registration(&request.registration_id, &customer_id)
            .await
            .map_err(StepFailure::at(OnboardingStep::LinkRegistration))?;
        partial.mark_registration_linked();
        advance(state);
        info!(%customer_id, "Registration linked");

        notify(
            progress,
            Some(OnboardingStep::CompanyProfile),
            "Saving company profile…",
        );
        let profile = self
            .save_company_profile(&customer_id, request)
            .await
            .map_err(StepFailure::at(OnboardingStep::CompanyProfile))?;
        partial.mark_company_profile_saved();
        advance(state);
        info!(
            %customer_id,
            profile_id = ?profile.id,
            "Company profile saved"
        );

        self.uploader
            .upload_all(
                &customer_id,
                &request.registration_id,
                &request.documents,
                partial,
                |position, total| {
                    notify(
                        progress,
                        Some(OnboardingStep::Documents),
                        format!("Uploading documents ({position}/{total})…"),
                    )
                },
            )
            .await
            .map_err(|e| StepFailure {
                step: OnboardingStep::Documents,
                cause: e.into(),
            })?;
        advance(state);

        match request.registration_status_to_set {
            Some(status) => {
                notify(
                    progress,
                    Some(OnboardingStep::SetStatus),
                    "Updating registration status…",
                );
                self.api
                    .set_registration_status(&request.registration_id, status)
                    .await
                    .map_err(StepFailure::at(OnboardingStep::SetStatus))?;
                info!(%status, "Registration status updated");
            }
            None => debug!("No registration status requested"),
        }
        advance(state);

        Ok(customer_id)
    }

    /// Create the company profile, falling back to an update when the create
    /// is rejected (the profile may already exist).
    ///
    /// Also usable on its own to finish a run that stopped at this step.
    pub async fn save_company_profile(
        &self,
        customer_id: &RemoteId,
        request: &OnboardingRequest,
    ) -> Result<CompanyProfile, ApiError> {
        let payload = CompanyProfilePayload {
            profile: request.company_profile.clone(),
            registration_id: Some(request.registration_id.clone()),
        };

        match self.api.create_company_profile(customer_id, &payload).await {
            Ok(profile) => Ok(profile),
            Err(e) => {
                warn!(%customer_id, error = %e, "Creating company profile failed; trying update");
                self.api.update_company_profile(customer_id, &payload).await
            }
        }
    }
}

fn advance(state: &mut OnboardingState) {
    if let Err(e) = state.advance() {
        warn!("Failed to advance onboarding state: {}", e);
    }
}
