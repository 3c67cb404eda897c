//! Error types returned by orchestrated requests.
//!
//! [`RetryError`] is the `Err` side of [`Orchestrator::run`](crate::Orchestrator::run).
//! Every variant carries a fixed human-readable message (see [`RetryError::message`])
//! and, except for [`RetryError::Blocked`], the executor error that ended the run.
//!
//! Helper methods follow the usual pattern: `as_label` for logs/metrics,
//! `message` for people.

use thiserror::Error;

/// Message of a run rejected because its group is escalated.
pub const BLOCKED_MESSAGE: &str = "Requests are currently blocked by Retry library.";

/// Message of a run whose retries ran out and no re-attempt was configured.
pub const REQUEST_FAILED_MESSAGE: &str = "Request failed.";

/// Message of a run whose re-attempts ran out.
pub const RE_ATTEMPTS_FAILED_MESSAGE: &str = "Re-attempts of request failed.";

/// Message published when a re-attempt brought the group back.
pub const RE_ATTEMPT_SUCCEEDED_MESSAGE: &str = "Re-attempt of request succeeded.";

/// # Why an orchestrated request was rejected.
///
/// `E` is the executor's error type.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RetryError<E> {
    /// The group is under escalation; the executor was not called.
    #[error("Requests are currently blocked by Retry library.")]
    Blocked {
        /// Group that was blocked.
        group: String,
    },

    /// Every retry try failed and no re-attempt policy was configured.
    #[error("Request failed.")]
    RetryExhausted {
        /// Executor calls made.
        attempts: u32,
        /// Error of the last try.
        error: E,
    },

    /// The re-attempt phase ran out of tries.
    #[error("Re-attempts of request failed.")]
    ReAttemptExhausted {
        /// Executor calls made during the re-attempt phase.
        attempts: u32,
        /// Error of the last try (the last retry error if no re-attempt ran).
        error: E,
    },
}

impl<E> RetryError<E> {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use retryvisor::RetryError;
    ///
    /// let err: RetryError<String> = RetryError::Blocked { group: "api".into() };
    /// assert_eq!(err.as_label(), "request_blocked");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RetryError::Blocked { .. } => "request_blocked",
            RetryError::RetryExhausted { .. } => "retry_exhausted",
            RetryError::ReAttemptExhausted { .. } => "re_attempt_exhausted",
        }
    }

    /// Returns the human-readable rejection message.
    pub fn message(&self) -> &'static str {
        match self {
            RetryError::Blocked { .. } => BLOCKED_MESSAGE,
            RetryError::RetryExhausted { .. } => REQUEST_FAILED_MESSAGE,
            RetryError::ReAttemptExhausted { .. } => RE_ATTEMPTS_FAILED_MESSAGE,
        }
    }

    /// Underlying executor error, if any try ran.
    pub fn error(&self) -> Option<&E> {
        match self {
            RetryError::Blocked { .. } => None,
            RetryError::RetryExhausted { error, .. } | RetryError::ReAttemptExhausted { error, .. } => {
                Some(error)
            }
        }
    }

    /// Consumes the rejection and returns the executor error, if any.
    pub fn into_error(self) -> Option<E> {
        match self {
            RetryError::Blocked { .. } => None,
            RetryError::RetryExhausted { error, .. } | RetryError::ReAttemptExhausted { error, .. } => {
                Some(error)
            }
        }
    }

    /// True when the run was short-circuited by a blocked group.
    pub fn is_blocked(&self) -> bool {
        matches!(self, RetryError::Blocked { .. })
    }
}
