//! # Bounded tries for one tier.
//!
//! [`Attempts`] drives one tier of the protocol: it calls the operation,
//! waits according to the tier's [`BackoffPolicy`] and calls again, up to
//! `max_retry` further times. It publishes per-try events and returns either
//! the first success or the last error.
//!
//! ## Event flow
//! ```text
//! AttemptStarting → op() → Ok  → return Success
//!                        → Err → AttemptFailed
//!                                 ├─ budget left → BackoffScheduled → sleep → next try
//!                                 └─ exhausted   → return Exhausted(last error)
//! ```
//!
//! ## Entry points
//! - [`Attempts::run`]: first try immediately, then up to `max_retry` further tries.
//! - [`Attempts::retry_from`]: the first try already happened elsewhere and failed
//!   with `seed`; only the further tries run, each after its delay.
//!
//! ## Rules
//! - Tries are **sequential**; the next one starts after the previous resolved.
//! - The delay before further try `k` (0-indexed) is `backoff.next(k)`.
//! - No delay after the last try.
//! - Sleeping is not cancellable.

use std::fmt::Display;
use std::future::Future;

use tokio::time;
use tracing::debug;

use crate::events::{Bus, Event, EventKind, Phase};
use crate::policies::BackoffPolicy;

/// Successful outcome of a tier.
#[derive(Debug)]
pub(crate) struct Success<T> {
    pub value: T,
    /// Tries made in this tier, including the successful one.
    pub tries: u32,
}

/// Failed outcome of a tier.
#[derive(Debug)]
pub(crate) struct Exhausted<E> {
    /// Tries made in this tier (0 if `retry_from` had no budget).
    pub tries: u32,
    /// Error of the last try, or the seed when no try ran.
    pub error: E,
}

/// One tier's schedule, bound to the group and bus it reports to.
pub(crate) struct Attempts<'a> {
    pub phase: Phase,
    pub group: &'a str,
    pub bus: &'a Bus,
    /// Further tries after the first one.
    pub max_retry: u32,
    pub backoff: BackoffPolicy,
}

impl Attempts<'_> {
    /// Tries once, then up to `max_retry` more times.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<Success<T>, Exhausted<E>>
    where
        E: Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        match self.try_once(1, &mut op).await {
            Ok(value) => Ok(Success { value, tries: 1 }),
            Err(error) => self.further(error, 1, op).await,
        }
    }

    /// Runs only the further tries, starting from a failure that happened before.
    pub async fn retry_from<T, E, F, Fut>(&self, seed: E, op: F) -> Result<Success<T>, Exhausted<E>>
    where
        E: Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.further(seed, 0, op).await
    }

    async fn further<T, E, F, Fut>(&self, mut last: E, done: u32, mut op: F) -> Result<Success<T>, Exhausted<E>>
    where
        E: Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut tries = done;

        for k in 0..self.max_retry {
            let delay = self.backoff.next(k);
            self.bus.publish(
                Event::new(EventKind::BackoffScheduled)
                    .with_group(self.group)
                    .with_phase(self.phase)
                    .with_attempt(tries)
                    .with_delay(delay)
                    .with_error(last.to_string()),
            );
            time::sleep(delay).await;

            tries += 1;
            match self.try_once(tries, &mut op).await {
                Ok(value) => return Ok(Success { value, tries }),
                Err(error) => last = error,
            }
        }

        Err(Exhausted { tries, error: last })
    }

    async fn try_once<T, E, F, Fut>(&self, attempt: u32, op: &mut F) -> Result<T, E>
    where
        E: Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.bus.publish(
            Event::new(EventKind::AttemptStarting)
                .with_group(self.group)
                .with_phase(self.phase)
                .with_attempt(attempt),
        );

        let res = op().await;
        if let Err(e) = &res {
            debug!(group = self.group, phase = self.phase.as_str(), attempt, error = %e, "attempt failed");
            self.bus.publish(
                Event::new(EventKind::AttemptFailed)
                    .with_group(self.group)
                    .with_phase(self.phase)
                    .with_attempt(attempt)
                    .with_error(e.to_string()),
            );
        }
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::JitterPolicy;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use tokio::time::Instant;

    fn attempts(bus: &Bus, phase: Phase, max_retry: u32, first_ms: u64, factor: f64) -> Attempts<'_> {
        Attempts {
            phase,
            group: "g",
            bus,
            max_retry,
            backoff: BackoffPolicy {
                first: Duration::from_millis(first_ms),
                max: Duration::from_secs(60),
                factor,
                jitter: JitterPolicy::None,
            },
        }
    }

    fn failing_until(ok_at: u32, calls: &Arc<AtomicU32>) -> impl FnMut() -> std::future::Ready<Result<u32, String>> {
        let calls = Arc::clone(calls);
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            std::future::ready(if n >= ok_at { Ok(n) } else { Err(format!("fail #{n}")) })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_within_budget() {
        let bus = Bus::new(64);
        let calls = Arc::new(AtomicU32::new(0));

        let out = attempts(&bus, Phase::Retry, 2, 100, 1.0)
            .run(failing_until(3, &calls))
            .await
            .expect("third try succeeds");

        assert_eq!(out.value, 3);
        assert_eq!(out.tries, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_with_last_error() {
        let bus = Bus::new(64);
        let calls = Arc::new(AtomicU32::new(0));

        let err = attempts(&bus, Phase::Retry, 1, 100, 1.0)
            .run(failing_until(u32::MAX, &calls))
            .await
            .expect_err("never succeeds");

        assert_eq!(err.tries, 2);
        assert_eq!(err.error, "fail #2");
    }

    #[tokio::test(start_paused = true)]
    async fn delays_grow_by_multiplier() {
        let bus = Bus::new(64);
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();

        let _ = attempts(&bus, Phase::Retry, 2, 100, 2.0)
            .run(failing_until(u32::MAX, &calls))
            .await;

        // 100ms before try 2, 200ms before try 3, nothing after the last.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(300) && elapsed < Duration::from_millis(310), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn retry_from_without_budget_returns_seed() {
        let bus = Bus::new(64);
        let calls = Arc::new(AtomicU32::new(0));

        let err = attempts(&bus, Phase::ReAttempt, 0, 1000, 1.0)
            .retry_from("seed".to_string(), failing_until(1, &calls))
            .await
            .expect_err("no budget");

        assert_eq!(err.tries, 0);
        assert_eq!(err.error, "seed");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_from_waits_before_each_try() {
        let bus = Bus::new(64);
        let calls = Arc::new(AtomicU32::new(0));
        let start = Instant::now();

        let out = attempts(&bus, Phase::ReAttempt, 2, 1000, 1.0)
            .retry_from("seed".to_string(), failing_until(2, &calls))
            .await
            .expect("second re-attempt succeeds");

        assert_eq!(out.tries, 2);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(2000) && elapsed < Duration::from_millis(2010), "{elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn publishes_per_try_events() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let calls = Arc::new(AtomicU32::new(0));

        let _ = attempts(&bus, Phase::Retry, 1, 10, 1.0)
            .run(failing_until(2, &calls))
            .await;

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            assert_eq!(ev.group.as_deref(), Some("g"));
            kinds.push(ev.kind);
        }
        assert_eq!(
            kinds,
            vec![
                EventKind::AttemptStarting,
                EventKind::AttemptFailed,
                EventKind::BackoffScheduled,
                EventKind::AttemptStarting,
            ]
        );
    }
}
