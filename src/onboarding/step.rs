//! Step labels used in progress reports and failures.

use serde::{Deserialize, Serialize};

/// One step of the onboarding flow, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OnboardingStep {
    CreateLogin,
    LinkRegistration,
    CompanyProfile,
    Documents,
    SetStatus,
}

impl OnboardingStep {
    /// All steps in the order they run.
    pub const ALL: [OnboardingStep; 5] = [
        Self::CreateLogin,
        Self::LinkRegistration,
        Self::CompanyProfile,
        Self::Documents,
        Self::SetStatus,
    ];

    /// Stable label reported to callers.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CreateLogin => "create-login",
            Self::LinkRegistration => "link-registration",
            Self::CompanyProfile => "company-profile",
            Self::Documents => "documents",
            Self::SetStatus => "set-status",
        }
    }
}

impl std::fmt::Display for OnboardingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
