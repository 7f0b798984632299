//! Onboarding state machine — how far a run has progressed.

use serde::{Deserialize, Serialize};

/// Milestones of an onboarding run.
///
/// Progresses linearly: NotStarted → AccountCreated → RegistrationLinked →
/// ProfileSaved → DocumentsUploaded → StatusSet → Done. There is no way back;
/// a failed run simply stays at the last milestone it reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingState {
    #[default]
    NotStarted,
    AccountCreated,
    RegistrationLinked,
    ProfileSaved,
    DocumentsUploaded,
    /// Reached when the status step ran or was not requested.
    StatusSet,
    Done,
}

impl OnboardingState {
    /// Get the next state in the linear progression, if any.
    pub fn next(&self) -> Option<OnboardingState> {
        use OnboardingState::*;
        match self {
            NotStarted => Some(AccountCreated),
            AccountCreated => Some(RegistrationLinked),
            RegistrationLinked => Some(ProfileSaved),
            ProfileSaved => Some(DocumentsUploaded),
            DocumentsUploaded => Some(StatusSet),
            StatusSet => Some(Done),
            Done => None,
        }
    }

    /// Advance to the next state. Returns an error if already terminal.
    pub fn advance(&mut self) -> Result<OnboardingState, String> {
        let next = self
            .next()
            .ok_or_else(|| "Already at terminal state".to_string())?;
        *self = next;
        Ok(next)
    }
}

impl std::fmt::Display for OnboardingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::NotStarted => "not_started",
            Self::AccountCreated => "account_created",
            Self::RegistrationLinked => "registration_linked",
            Self::ProfileSaved => "profile_saved",
            Self::DocumentsUploaded => "documents_uploaded",
            Self::StatusSet => "status_set",
            Self::Done => "done",
        };
        write!(f, "{s}")
    }
}
