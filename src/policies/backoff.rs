//! # Delay schedule between tries.
//!
//! [`BackoffPolicy`] is the computed form of a tier [`Policy`](crate::Policy):
//! - [`BackoffPolicy::first`] the delay before the first further try (`interval`);
//! - [`BackoffPolicy::factor`] the growth per further try (`interval_multiplier`);
//! - [`BackoffPolicy::max`] the cap applied to every computed delay.
//!
//! The delay before further try `k` (0-indexed) is `first × factor^k`, clamped to
//! `max`, then jitter is applied. The base delay depends only on `k`, so jitter
//! never feeds back into later delays.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use retryvisor::{BackoffPolicy, JitterPolicy};
//!
//! let backoff = BackoffPolicy {
//!     first: Duration::from_millis(100),
//!     max: Duration::from_secs(10),
//!     factor: 1.5,
//!     jitter: JitterPolicy::None,
//! };
//!
//! assert_eq!(backoff.next(0), Duration::from_millis(100));
//! assert_eq!(backoff.next(1), Duration::from_millis(150));
//! assert_eq!(backoff.next(2), Duration::from_millis(225));
//! assert_eq!(backoff.next(40), Duration::from_secs(10));
//! ```

use std::time::Duration;

use crate::policies::jitter::JitterPolicy;

/// Delay schedule for one tier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackoffPolicy {
    /// Delay before the first further try.
    pub first: Duration,
    /// Cap for every computed delay.
    pub max: Duration,
    /// Multiplicative growth factor (`>= 1.0` expected).
    pub factor: f64,
    /// Randomization applied after clamping.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// `first = 100ms`, `factor = 1.0`, `max = 5min`, no jitter.
    fn default() -> Self {
        Self {
            first: Duration::from_millis(100),
            max: Duration::from_secs(300),
            factor: 1.0,
            jitter: JitterPolicy::None,
        }
    }
}

impl BackoffPolicy {
    /// Computes the delay before further try `attempt` (0-indexed).
    ///
    /// Non-finite or negative products clamp to [`BackoffPolicy::max`].
    pub fn next(&self, attempt: u32) -> Duration {
        let max_secs = self.max.as_secs_f64();
        let exp = attempt.min(i32::MAX as u32) as i32;
        let unclamped = self.first.as_secs_f64() * self.factor.powi(exp);

        let base = if !unclamped.is_finite() || unclamped < 0.0 || unclamped > max_secs {
            self.max
        } else {
            Duration::try_from_secs_f64(unclamped).unwrap_or(self.max)
        };

        self.jitter.apply(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(first_ms: u64, factor: f64, max: Duration) -> BackoffPolicy {
        BackoffPolicy {
            first: Duration::from_millis(first_ms),
            max,
            factor,
            jitter: JitterPolicy::None,
        }
    }

    #[test]
    fn first_further_try_uses_interval() {
        let p = policy(100, 2.0, Duration::from_secs(30));
        assert_eq!(p.next(0), Duration::from_millis(100));
    }

    #[test]
    fn multiplier_scales_each_try() {
        let p = policy(1000, 1.5, Duration::from_secs(30));
        assert_eq!(p.next(0), Duration::from_millis(1000));
        assert_eq!(p.next(1), Duration::from_millis(1500));
        assert_eq!(p.next(2), Duration::from_millis(2250));
    }

    #[test]
    fn constant_multiplier_keeps_interval() {
        let p = policy(500, 1.0, Duration::from_secs(30));
        for attempt in 0..10 {
            assert_eq!(p.next(attempt), Duration::from_millis(500), "attempt {attempt}");
        }
    }

    #[test]
    fn zero_interval_stays_zero() {
        let p = policy(0, 3.0, Duration::from_secs(30));
        assert_eq!(p.next(5), Duration::ZERO);
    }

    #[test]
    fn clamped_to_max() {
        let p = policy(100, 2.0, Duration::from_secs(1));
        assert_eq!(p.next(10), Duration::from_secs(1));
        assert_eq!(p.next(u32::MAX), Duration::from_secs(1));
    }

    #[test]
    fn uncapped_huge_exponent_does_not_panic() {
        let p = policy(100, 2.0, Duration::MAX);
        assert_eq!(p.next(u32::MAX), Duration::MAX);
    }

    #[test]
    fn negative_factor_clamps_to_max() {
        let p = policy(100, -2.0, Duration::from_secs(3));
        assert_eq!(p.next(1), Duration::from_secs(3));
    }

    #[test]
    fn equal_jitter_bounds() {
        let p = BackoffPolicy {
            jitter: JitterPolicy::Equal,
            ..policy(1000, 1.0, Duration::from_secs(30))
        };
        for attempt in 0..50 {
            let d = p.next(attempt);
            assert!(d >= Duration::from_millis(500));
            assert!(d <= Duration::from_millis(1000));
        }
    }
}
