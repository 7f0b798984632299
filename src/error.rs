//! Error types for the onboarding back office client.

use crate::onboarding::result::PartialResult;
use crate::onboarding::step::OnboardingStep;
use crate::upload::UploadPhase;

/// Errors raised while setting up an orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors returned by calls to the back office API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{call} request could not be sent: {reason}")]
    Transport { call: &'static str, reason: String },

    #[error("{call} failed with status {status}: {message}")]
    Status {
        call: &'static str,
        status: u16,
        message: String,
    },

    #[error("Invalid response from {call}: {reason}")]
    InvalidResponse { call: &'static str, reason: String },

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid {call} request: {reason}")]
    InvalidRequest { call: &'static str, reason: String },
}

impl ApiError {
    /// HTTP status of a rejected call, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failure of one file's presigned upload.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Broker rejected {phase} for document {document}: {source}")]
    Broker {
        phase: UploadPhase,
        document: String,
        #[source]
        source: ApiError,
    },

    #[error("Direct upload of document {document} failed: {reason}")]
    Transfer {
        document: String,
        status: Option<u16>,
        reason: String,
    },
}

impl UploadError {
    /// The upload phase that failed.
    pub fn phase(&self) -> UploadPhase {
        match self {
            Self::Broker { phase, .. } => *phase,
            Self::Transfer { .. } => UploadPhase::Put,
        }
    }
}

/// Underlying cause of a failed onboarding step.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Upload(#[from] UploadError),
}

/// A failed onboarding run.
///
/// Carries the label of the step that failed and the accumulator as it stood
/// at the moment of failure. Nothing that was created before the failing step
/// is rolled back.
#[derive(Debug, thiserror::Error)]
#[error("Onboarding failed at {step}: {message}")]
pub struct OnboardingFlowError {
    pub step: OnboardingStep,
    pub message: String,
    pub partial: PartialResult,
    #[source]
    pub cause: StepError,
}

impl OnboardingFlowError {
    pub(crate) fn new(step: OnboardingStep, cause: StepError, partial: PartialResult) -> Self {
        Self {
            step,
            message: cause.to_string(),
            partial,
            cause,
        }
    }
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
