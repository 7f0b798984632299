//! Progress reporting for onboarding runs.
//!
//! Reports are advisory. A reporter that errors or panics is logged and
//! ignored; it never changes the outcome of a run.

use std::panic::{AssertUnwindSafe, catch_unwind};

use tokio::sync::mpsc;

use super::step::OnboardingStep;

/// A progress report emitted by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    /// Step being started, or `None` for the final "complete" report.
    pub step: Option<OnboardingStep>,
    /// Short human-readable label, e.g. "Uploading documents (2/6)…".
    pub label: String,
}

/// Receives progress reports.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, update: &ProgressUpdate) -> anyhow::Result<()>;
}

impl<F> ProgressReporter for F
where
    F: Fn(&ProgressUpdate) -> anyhow::Result<()> + Send + Sync,
{
    fn report(&self, update: &ProgressUpdate) -> anyhow::Result<()> {
        self(update)
    }
}

/// Discards all reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _update: &ProgressUpdate) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Forwards reports into a channel, for callers that consume them elsewhere.
#[derive(Debug, Clone)]
pub struct ChannelReporter(mpsc::UnboundedSender<ProgressUpdate>);

impl ChannelReporter {
    /// Create a reporter and the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self(tx), rx)
    }
}

impl ProgressReporter for ChannelReporter {
    fn report(&self, update: &ProgressUpdate) -> anyhow::Result<()> {
        self.0
            .send(update.clone())
            .map_err(|_| anyhow::anyhow!("progress receiver dropped"))
    }
}

/// Deliver a report, swallowing any failure of the reporter.
pub(crate) fn notify(
    reporter: &dyn ProgressReporter,
    step: Option<OnboardingStep>,
    label: impl Into<String>,
) {
    let update = ProgressUpdate {
        step,
        label: label.into(),
    };
    match catch_unwind(AssertUnwindSafe(|| reporter.report(&update))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            tracing::debug!(label = %update.label, error = %e, "Progress reporter failed; ignoring");
        }
        Err(_) => {
            tracing::debug!(label = %update.label, "Progress reporter panicked; ignoring");
        }
    }
}
