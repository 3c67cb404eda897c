//! # Lifecycle events emitted by orchestrated requests.
//!
//! The [`EventKind`] enum classifies events in three groups:
//! - **Attempt events**: one try and its outcome (starting, failed, backoff)
//! - **Escalation events**: tier transitions and group blocking
//! - **Terminal events**: how a run ended
//!
//! The [`Event`] struct carries the metadata: timestamps, group, tier, attempt
//! number, delay, a human-readable message and the executor error text.
//!
//! ## Ordering guarantees
//! Each event gets a globally unique sequence number (`seq`) that increases
//! monotonically. Use it to restore order across receivers.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use retryvisor::{Event, EventKind, Phase};
//!
//! let ev = Event::new(EventKind::AttemptFailed)
//!     .with_group("payments")
//!     .with_phase(Phase::Retry)
//!     .with_attempt(2)
//!     .with_error("connection refused");
//!
//! assert_eq!(ev.kind.as_str(), "attemptFailed");
//! assert_eq!(ev.group.as_deref(), Some("payments"));
//! assert_eq!(ev.error.as_deref(), Some("connection refused"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Tier of the escalation protocol an attempt belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// First-line bounded retry.
    Retry,
    /// Escalated re-attempts while the group is blocked.
    ReAttempt,
}

impl Phase {
    /// Stable label for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Retry => "retry",
            Phase::ReAttempt => "re_attempt",
        }
    }
}

/// Classification of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // === Attempt events ===
    /// A try is about to call the executor.
    ///
    /// Sets: `group`, `phase`, `attempt` (1-based within the phase).
    AttemptStarting,

    /// A try returned an error.
    ///
    /// Sets: `group`, `phase`, `attempt`, `error`.
    AttemptFailed,

    /// The next try was scheduled.
    ///
    /// Sets: `group`, `phase`, `attempt` (the one that failed), `delay_ms`, `error`.
    BackoffScheduled,

    // === Escalation events ===
    /// Every retry try failed.
    ///
    /// Not terminal: a run with a re-attempt tier goes on to [`EventKind::GroupBlocked`],
    /// one without it ends with [`EventKind::RequestFailed`].
    ///
    /// Sets: `group`, `attempt` (tries made), `message`, `error`.
    RetriesFailed,

    /// The group was added to the blocked registry; re-attempts begin.
    ///
    /// Sets: `group`, `message`, `error`.
    GroupBlocked,

    /// The group was removed from the blocked registry.
    ///
    /// Sets: `group`.
    GroupUnblocked,

    // === Terminal events ===
    /// The run was rejected because its group is blocked.
    ///
    /// Sets: `group`, `message`.
    RequestBlocked,

    /// A retry try succeeded.
    ///
    /// Sets: `group`, `attempt`.
    RequestSucceeded,

    /// Retries ran out and no re-attempt tier was configured.
    ///
    /// Sets: `group`, `attempt`, `message`, `error`.
    RequestFailed,

    /// A re-attempt try succeeded.
    ///
    /// Sets: `group`, `attempt`, `message`.
    ReAttemptSuccessful,

    /// Every re-attempt try failed.
    ///
    /// Sets: `group`, `attempt` (re-attempt tries made), `message`, `error`.
    ReAttemptsFailed,
}

impl EventKind {
    /// Event name as seen by listeners.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::AttemptStarting => "attemptStarting",
            EventKind::AttemptFailed => "attemptFailed",
            EventKind::BackoffScheduled => "backoffScheduled",
            EventKind::RetriesFailed => "retriesFailed",
            EventKind::GroupBlocked => "groupBlocked",
            EventKind::GroupUnblocked => "groupUnblocked",
            EventKind::RequestBlocked => "requestBlocked",
            EventKind::RequestSucceeded => "requestSucceeded",
            EventKind::RequestFailed => "requestFailed",
            EventKind::ReAttemptSuccessful => "reAttemptSuccessful",
            EventKind::ReAttemptsFailed => "reAttemptsFailed",
        }
    }

    /// True for the events that end a run.
    ///
    /// Every run that completes publishes exactly one of them; a cancelled run publishes none.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EventKind::RequestBlocked
                | EventKind::RequestSucceeded
                | EventKind::RequestFailed
                | EventKind::ReAttemptSuccessful
                | EventKind::ReAttemptsFailed
        )
    }
}

/// Lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Group the run belongs to.
    pub group: Option<Arc<str>>,
    /// Tier of the attempt.
    pub phase: Option<Phase>,
    /// Attempt number or tries made, depending on the kind.
    pub attempt: Option<u32>,
    /// Delay before the next try in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Human-readable message for listeners (UI, logs).
    pub message: Option<Arc<str>>,
    /// Executor error text.
    pub error: Option<Arc<str>>,
}

impl Event {
    /// Creates an event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            group: None,
            phase: None,
            attempt: None,
            delay_ms: None,
            message: None,
            error: None,
        }
    }

    #[inline]
    pub fn with_group(mut self, group: impl Into<Arc<str>>) -> Self {
        self.group = Some(group.into());
        self
    }

    #[inline]
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a delay (stored as milliseconds, saturating).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    #[inline]
    pub fn with_message(mut self, message: impl Into<Arc<str>>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[inline]
    pub fn with_error(mut self, error: impl Into<Arc<str>>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Delay as a [`Duration`], if set.
    pub fn delay(&self) -> Option<Duration> {
        self.delay_ms.map(|ms| Duration::from_millis(u64::from(ms)))
    }
}
