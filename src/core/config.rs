//! # Client configuration.
//!
//! Provides [`Config`], the settings a [`Client`](crate::Client) is built with.
//!
//! Config is used in two ways:
//! 1. **Client creation**: `Client::builder(executor).with_config(cfg)`
//! 2. **Policy defaults**: overrides given to `Orchestrator::retry` /
//!    `Orchestrator::re_attempt` resolve over [`Config::retry`] / [`Config::re_attempt`]
//!
//! ## Sentinel values
//! - `max_delay = 0s` → delays are not capped

use std::time::Duration;

use crate::policies::Policy;

/// Settings shared by every run of a client.
///
/// ## Field semantics
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by Bus)
/// - `retry`: default retry tier
/// - `re_attempt`: default re-attempt tier (used when a re-attempt is enabled with empty overrides)
/// - `max_delay`: cap for every computed delay (`0s` = no cap)
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Receivers lagging more than `bus_capacity` events skip the oldest ones.
    pub bus_capacity: usize,

    /// Defaults of the retry tier.
    ///
    /// Applied when a run sets no retry policy, and used as the fallback side of
    /// [`resolve`](crate::resolve) when it does.
    pub retry: Policy,

    /// Defaults of the re-attempt tier.
    ///
    /// A run only re-attempts when it asks for it; these values fill in what its
    /// overrides leave unset.
    pub re_attempt: Policy,

    /// Upper bound for any single delay.
    ///
    /// - `Duration::ZERO` = no cap
    /// - `> 0` = every computed delay is clamped to this value
    pub max_delay: Duration,
}

impl Config {
    /// Returns the delay cap, with the `0s` sentinel mapped to `Duration::MAX`.
    #[inline]
    pub fn delay_cap(&self) -> Duration {
        if self.max_delay == Duration::ZERO {
            Duration::MAX
        } else {
            self.max_delay
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024`
    /// - `retry = {3, 100ms, ×1}`
    /// - `re_attempt = {3, 1s, ×1}`
    /// - `max_delay = 0s` (uncapped)
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            retry: Policy::RETRY,
            re_attempt: Policy::RE_ATTEMPT,
            max_delay: Duration::ZERO,
        }
    }
}
