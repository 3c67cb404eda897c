//! # Jitter for retry and re-attempt delays.
//!
//! [`JitterPolicy`] randomizes the delay computed for the next try so that many
//! callers failing against the same group do not come back in lockstep.
//!
//! - [`JitterPolicy::None`]  exact delay (default, deterministic schedules)
//! - [`JitterPolicy::Full`]  random delay in `[0, delay]`
//! - [`JitterPolicy::Equal`] `delay/2 + random[0, delay/2]`

use rand::Rng;
use std::time::Duration;

/// Randomization applied on top of a computed delay.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterPolicy {
    /// Use the computed delay as is.
    #[default]
    None,

    /// Random delay in `[0, delay]`.
    ///
    /// Spreads load the most, but can shorten a delay to nothing.
    Full,

    /// `delay/2 + random[0, delay/2]`.
    ///
    /// Keeps at least half of the schedule.
    Equal,
}

impl JitterPolicy {
    /// Applies jitter to the given delay.
    pub fn apply(&self, delay: Duration) -> Duration {
        match self {
            JitterPolicy::None => delay,
            JitterPolicy::Full => full_jitter(delay),
            JitterPolicy::Equal => equal_jitter(delay),
        }
    }

    /// Whether this policy changes delays at all.
    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, JitterPolicy::None)
    }
}

/// Delay in milliseconds, saturating for delays past `u64::MAX` ms.
#[inline]
fn whole_millis(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

fn full_jitter(delay: Duration) -> Duration {
    let ms = whole_millis(delay);
    if ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::rng().random_range(0..=ms))
}

fn equal_jitter(delay: Duration) -> Duration {
    let ms = whole_millis(delay);
    if ms == 0 {
        return Duration::ZERO;
    }
    let half = ms / 2;
    let jitter = if half == 0 {
        0
    } else {
        rand::rng().random_range(0..=half)
    };
    Duration::from_millis(half + jitter)
}
