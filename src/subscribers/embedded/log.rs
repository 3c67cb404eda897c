//! # LogWriter: lifecycle events as `tracing` records
//!
//! A minimal subscriber that turns every [`Event`] into one `tracing` record.
//! Failures are logged at `warn`, escalation at `warn`/`info`, per-try
//! progress at `debug`.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! DEBUG retryvisor: attempt group="api" phase="retry" attempt=1
//! DEBUG retryvisor: attempt failed group="api" phase="retry" attempt=1 error="refused"
//! DEBUG retryvisor: backoff group="api" phase="retry" delay_ms=100 after_attempt=1
//!  WARN retryvisor: retriesFailed group="api" message="Request failed." error="refused"
//!  WARN retryvisor: group blocked group="api"
//!  INFO retryvisor: reAttemptSuccessful group="api" attempt=2
//!  INFO retryvisor: group unblocked group="api"
//! ```

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let group = e.group.as_deref().unwrap_or("-");
        let phase = e.phase.map(|p| p.as_str()).unwrap_or("-");

        match e.kind {
            EventKind::AttemptStarting => {
                debug!(target: "retryvisor", group, phase, attempt = ?e.attempt, "attempt");
            }
            EventKind::AttemptFailed => {
                debug!(target: "retryvisor", group, phase, attempt = ?e.attempt, error = ?e.error, "attempt failed");
            }
            EventKind::BackoffScheduled => {
                debug!(target: "retryvisor", group, phase, delay_ms = ?e.delay_ms, after_attempt = ?e.attempt, "backoff");
            }
            EventKind::RetriesFailed | EventKind::RequestFailed | EventKind::ReAttemptsFailed => {
                warn!(target: "retryvisor", group, message = ?e.message, error = ?e.error, "{}", e.kind.as_str());
            }
            EventKind::GroupBlocked => {
                warn!(target: "retryvisor", group, "group blocked");
            }
            EventKind::GroupUnblocked => {
                info!(target: "retryvisor", group, "group unblocked");
            }
            EventKind::RequestBlocked => {
                debug!(target: "retryvisor", group, "request rejected: group blocked");
            }
            EventKind::RequestSucceeded | EventKind::ReAttemptSuccessful => {
                info!(target: "retryvisor", group, attempt = ?e.attempt, "{}", e.kind.as_str());
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
