//! # Policy resolution.
//!
//! [`resolve`] lays caller overrides over a default [`Policy`], key by key.
//! An override only wins when it is *truthy*:
//!
//! | field                 | falsy when                 |
//! |-----------------------|----------------------------|
//! | `max_attempts`        | `0`                        |
//! | `interval`            | `Duration::ZERO`           |
//! | `interval_multiplier` | `0.0` or NaN               |
//! | `jitter`              | `JitterPolicy::None`       |
//!
//! Falsy values fall back to the default even when they were set on purpose,
//! so `interval: 0` cannot switch a default interval off. Existing callers rely
//! on this, keep it.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use retryvisor::{resolve, Policy, PolicyOverrides};
//!
//! let defaults = Policy::new(3, Duration::from_millis(100), 1.0);
//! let given = PolicyOverrides::default().max_attempts(5).interval(Duration::ZERO);
//!
//! let p = resolve(Some(&given), &defaults);
//! assert_eq!(p.max_attempts, 5);
//! assert_eq!(p.interval, Duration::from_millis(100));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;
use crate::policies::policy::Policy;

/// Partially specified [`Policy`]; unset fields come from the defaults.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PolicyOverrides {
    pub max_attempts: Option<u32>,
    pub interval: Option<Duration>,
    pub interval_multiplier: Option<f64>,
    pub jitter: Option<JitterPolicy>,
}

impl PolicyOverrides {
    /// Sets the tries granted to the tier.
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = Some(n);
        self
    }

    /// Sets the delay before the first further try.
    pub fn interval(mut self, d: Duration) -> Self {
        self.interval = Some(d);
        self
    }

    /// Sets the per-try delay scale.
    pub fn interval_multiplier(mut self, m: f64) -> Self {
        self.interval_multiplier = Some(m);
        self
    }

    /// Sets the jitter.
    pub fn jitter(mut self, j: JitterPolicy) -> Self {
        self.jitter = Some(j);
        self
    }

    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.max_attempts.is_none()
            && self.interval.is_none()
            && self.interval_multiplier.is_none()
            && self.jitter.is_none()
    }
}

impl From<Policy> for PolicyOverrides {
    fn from(p: Policy) -> Self {
        Self {
            max_attempts: Some(p.max_attempts),
            interval: Some(p.interval),
            interval_multiplier: Some(p.interval_multiplier),
            jitter: Some(p.jitter),
        }
    }
}

impl From<Option<Policy>> for PolicyOverrides {
    fn from(p: Option<Policy>) -> Self {
        p.map(Into::into).unwrap_or_default()
    }
}

/// Values that can stand for "unset" in an override.
trait Truthy: Copy {
    fn is_truthy(&self) -> bool;
}

impl Truthy for u32 {
    fn is_truthy(&self) -> bool {
        *self != 0
    }
}

impl Truthy for Duration {
    fn is_truthy(&self) -> bool {
        !self.is_zero()
    }
}

impl Truthy for f64 {
    fn is_truthy(&self) -> bool {
        *self != 0.0 && !self.is_nan()
    }
}

impl Truthy for JitterPolicy {
    fn is_truthy(&self) -> bool {
        !self.is_none()
    }
}

#[inline]
fn pick<T: Truthy>(given: Option<T>, default: T) -> T {
    given.filter(Truthy::is_truthy).unwrap_or(default)
}

/// Resolves `given` over `defaults` with per-key truthy fallback.
///
/// Absent or empty overrides return `defaults` unchanged.
pub fn resolve(given: Option<&PolicyOverrides>, defaults: &Policy) -> Policy {
    let Some(given) = given.filter(|g| !g.is_empty()) else {
        return *defaults;
    };

    Policy {
        max_attempts: pick(given.max_attempts, defaults.max_attempts),
        interval: pick(given.interval, defaults.interval),
        interval_multiplier: pick(given.interval_multiplier, defaults.interval_multiplier),
        jitter: pick(given.jitter, defaults.jitter),
    }
}
