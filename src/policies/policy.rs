//! # Tier policy.
//!
//! A [`Policy`] describes one tier of the escalation protocol: how many tries
//! it gets and how the wait between them evolves. The same shape serves both
//! tiers; [`RetryPolicy`] and [`ReAttemptPolicy`] are aliases that name the
//! role at call sites.
//!
//! ## Tier semantics
//! ```text
//! retry      max_attempts = N  → N tries in total (first try + N-1 further)
//! re-attempt max_attempts = K  → K-1 further tries; the last retry try counts
//!                                as the first re-attempt
//! ```

use std::time::Duration;

use crate::policies::backoff::BackoffPolicy;
use crate::policies::jitter::JitterPolicy;

/// Attempt count and backoff shape for one tier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Policy {
    /// Tries granted to this tier (`>= 1`).
    pub max_attempts: u32,
    /// Delay before the first further try.
    pub interval: Duration,
    /// Scale applied to the delay for every further try (`1.0` = constant).
    pub interval_multiplier: f64,
    /// Randomization on top of the computed delay.
    pub jitter: JitterPolicy,
}

/// Policy of the first tier (bounded retry).
pub type RetryPolicy = Policy;

/// Policy of the second tier (escalated re-attempts).
pub type ReAttemptPolicy = Policy;

impl Policy {
    /// Default first-tier policy: 3 tries, 100ms apart.
    pub const RETRY: Policy = Policy::new(3, Duration::from_millis(100), 1.0);

    /// Default second-tier policy: 3 tries (2 issued), 1s apart.
    pub const RE_ATTEMPT: Policy = Policy::new(3, Duration::from_secs(1), 1.0);

    /// Creates a policy without jitter.
    pub const fn new(max_attempts: u32, interval: Duration, interval_multiplier: f64) -> Self {
        Self {
            max_attempts,
            interval,
            interval_multiplier,
            jitter: JitterPolicy::None,
        }
    }

    /// Returns the policy with the given jitter.
    pub fn with_jitter(mut self, jitter: JitterPolicy) -> Self {
        self.jitter = jitter;
        self
    }

    /// Builds the delay schedule for this tier, capped at `max`.
    pub fn backoff(&self, max: Duration) -> BackoffPolicy {
        BackoffPolicy {
            first: self.interval,
            max,
            factor: self.interval_multiplier,
            jitter: self.jitter,
        }
    }

    /// Further tries after the first one when this policy drives the retry tier.
    #[inline]
    pub(crate) fn retry_further(&self) -> u32 {
        self.max_attempts.max(1) - 1
    }

    /// Further tries when this policy drives the re-attempt tier.
    #[inline]
    pub(crate) fn re_attempt_further(&self) -> u32 {
        self.max_attempts.saturating_sub(1)
    }
}
