//! Customer onboarding — turns a pending registration into a customer with a
//! login, a company profile and its documents.
//!
//! The flow is a forward-only sequence of remote calls. There is no rollback:
//! when a step fails the caller gets the step label and a [`PartialResult`]
//! describing everything that was created, and decides how to recover.

pub mod orchestrator;
pub mod progress;
pub mod request;
pub mod result;
pub mod state;
pub mod step;

pub use orchestrator::OnboardingOrchestrator;
pub use progress::{ChannelReporter, NoProgress, ProgressReporter, ProgressUpdate};
pub use request::{DocumentManifestEntry, OnboardingManifest, OnboardingRequest, load_request};
pub use result::{OnboardingOutcome, PartialResult};
pub use state::OnboardingState;
pub use step::OnboardingStep;
