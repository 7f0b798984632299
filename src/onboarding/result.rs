//! Accumulated progress of an onboarding run.

use serde::Serialize;

use crate::api::RemoteId;

/// Record of which steps have completed.
///
/// Fields only ever move forward: the id stays once set, flags never go back
/// to `false`, and uploaded documents are only appended. The same value is
/// the success result and the payload of a failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialResult {
    customer_id: Option<RemoteId>,
    registration_linked: bool,
    company_profile_saved: bool,
    uploaded_documents: Vec<RemoteId>,
}

impl PartialResult {
    pub fn customer_id(&self) -> Option<&RemoteId> {
        self.customer_id.as_ref()
    }

    pub fn registration_linked(&self) -> bool {
        self.registration_linked
    }

    pub fn company_profile_saved(&self) -> bool {
        self.company_profile_saved
    }

    /// Documents that finished all three upload phases, in upload order.
    pub fn uploaded_documents(&self) -> &[RemoteId] {
        &self.uploaded_documents
    }

    /// Record the created customer. A second id is ignored.
    pub fn record_customer(&mut self, id: RemoteId) {
        if let Some(existing) = &self.customer_id {
            tracing::warn!(%existing, ignored = %id, "Customer id already recorded");
            return;
        }
        self.customer_id = Some(id);
    }

    pub fn mark_registration_linked(&mut self) {
        self.registration_linked = true;
    }

    pub fn mark_company_profile_saved(&mut self) {
        self.company_profile_saved = true;
    }

    pub fn record_uploaded_document(&mut self, id: RemoteId) {
        self.uploaded_documents.push(id);
    }

    /// One-line description for an operator deciding how to recover.
    pub fn summary(&self) -> String {
        let customer = match &self.customer_id {
            Some(id) => format!("customer {id} created"),
            None => "no customer created".to_string(),
        };
        let linked = if self.registration_linked {
            "registration linked"
        } else {
            "registration not linked"
        };
        let profile = if self.company_profile_saved {
            "company profile saved"
        } else {
            "company profile not saved"
        };
        format!(
            "{customer}; {linked}; {profile}; {} document(s) uploaded",
            self.uploaded_documents.len()
        )
    }

    /// Convert into a success value for the customer the run created.
    pub(crate) fn into_outcome(self, customer_id: RemoteId) -> OnboardingOutcome {
        OnboardingOutcome {
            customer_id: self.customer_id.unwrap_or(customer_id),
            registration_linked: self.registration_linked,
            company_profile_saved: self.company_profile_saved,
            uploaded_documents: self.uploaded_documents,
        }
    }
}

/// Result of a fully successful onboarding run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingOutcome {
    pub customer_id: RemoteId,
    pub registration_linked: bool,
    pub company_profile_saved: bool,
    pub uploaded_documents: Vec<RemoteId>,
}
