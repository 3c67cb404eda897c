//! # Two-tier escalation protocol.
//!
//! Runs a configured [`Plan`] against the client's executor, registries and bus.
//!
//! ## State machine
//! ```text
//! configured ──► group blocked? ── yes ─► RequestBlocked ─► Err(Blocked)
//!                      │ no
//!                      ▼
//!                retry tier (max_attempts tries)
//!                      ├─ Ok  ─► RequestSucceeded ─► Ok(response)
//!                      └─ Err ─► RetriesFailed
//!                                ├─ no re-attempt ─► RequestFailed ─► Err(RetryExhausted)
//!                                └─ re-attempt:
//!                                     notify(Notice)
//!                                     BlockedGroups::add(group) ─► GroupBlocked
//!                                     re-attempt tier (max_attempts - 1 tries)
//!                                     BlockedGroups::remove(group) ─► GroupUnblocked
//!                                     ├─ Ok  ─► ReAttemptSuccessful ─► Ok(response)
//!                                     └─ Err ─► ReAttemptsFailed ─► Err(ReAttemptExhausted)
//! ```
//!
//! ## Rules
//! - A blocked group short-circuits before the executor is called.
//! - A run that blocks its group always unblocks it when its re-attempt tier
//!   ends, whatever the outcome and even if another run blocked it too. The
//!   same holds when the run future is dropped or the executor panics.
//! - The blocked check and the block are not atomic (see `BlockedGroups`).
//! - The progress callback fires at most once, before the group is blocked.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::core::attempts::Attempts;
use crate::core::client::Context;
use crate::core::orchestrator::{Notice, NotifyFn, Plan};
use crate::error::{
    BLOCKED_MESSAGE, RE_ATTEMPT_SUCCEEDED_MESSAGE, RE_ATTEMPTS_FAILED_MESSAGE, REQUEST_FAILED_MESSAGE,
    RetryError,
};
use crate::events::{Bus, Event, EventKind, Phase};
use crate::registry::BlockedGroups;
use crate::requests::Executor;

/// Keeps a group blocked for as long as it is alive.
///
/// Dropping the guard unblocks the group and publishes `GroupUnblocked`, also
/// when the run is cancelled or the executor panics mid re-attempt.
struct BlockGuard<'a> {
    blocked: &'a BlockedGroups,
    bus: &'a Bus,
    group: &'a Arc<str>,
}

impl<'a> BlockGuard<'a> {
    fn acquire(blocked: &'a BlockedGroups, bus: &'a Bus, group: &'a Arc<str>) -> Self {
        if !blocked.add(group) {
            debug!(group = %group, "group was already blocked by another run");
        }
        Self { blocked, bus, group }
    }
}

impl Drop for BlockGuard<'_> {
    fn drop(&mut self) {
        self.blocked.remove(self.group);
        self.bus
            .publish(Event::new(EventKind::GroupUnblocked).with_group(Arc::clone(self.group)));
    }
}

/// Executes `plan` through both tiers.
pub(crate) async fn execute<X: Executor>(
    ctx: &Context<X>,
    plan: Plan<X::Request>,
    notify: Option<&NotifyFn<X::Error>>,
) -> Result<X::Response, RetryError<X::Error>> {
    let Plan {
        request,
        group,
        retry,
        re_attempt,
    } = plan;

    if ctx.blocked.contains(&group) {
        debug!(group = %group, "group is blocked; rejecting request");
        ctx.bus.publish(
            Event::new(EventKind::RequestBlocked)
                .with_group(Arc::clone(&group))
                .with_message(BLOCKED_MESSAGE),
        );
        return Err(RetryError::Blocked {
            group: group.to_string(),
        });
    }

    let cap = ctx.cfg.delay_cap();
    let executor: &X = &ctx.executor;
    let op = move || executor.execute(Arc::clone(&request));

    let retry_tier = Attempts {
        phase: Phase::Retry,
        group: &group,
        bus: &ctx.bus,
        max_retry: retry.retry_further(),
        backoff: retry.backoff(cap),
    };

    let exhausted = match retry_tier.run(&op).await {
        Ok(done) => {
            ctx.bus.publish(
                Event::new(EventKind::RequestSucceeded)
                    .with_group(Arc::clone(&group))
                    .with_attempt(done.tries),
            );
            return Ok(done.value);
        }
        Err(exhausted) => exhausted,
    };

    warn!(group = %group, attempts = exhausted.tries, error = %exhausted.error, "retries exhausted");
    ctx.bus.publish(
        Event::new(EventKind::RetriesFailed)
            .with_group(Arc::clone(&group))
            .with_attempt(exhausted.tries)
            .with_message(REQUEST_FAILED_MESSAGE)
            .with_error(exhausted.error.to_string()),
    );

    let Some(re_attempt) = re_attempt else {
        ctx.bus.publish(
            Event::new(EventKind::RequestFailed)
                .with_group(Arc::clone(&group))
                .with_attempt(exhausted.tries)
                .with_message(REQUEST_FAILED_MESSAGE)
                .with_error(exhausted.error.to_string()),
        );
        return Err(RetryError::RetryExhausted {
            attempts: exhausted.tries,
            error: exhausted.error,
        });
    };

    if let Some(notify) = notify {
        notify(&Notice {
            message: REQUEST_FAILED_MESSAGE,
            error: &exhausted.error,
            group: &group,
        });
    }

    let block = BlockGuard::acquire(&ctx.blocked, &ctx.bus, &group);
    ctx.bus.publish(
        Event::new(EventKind::GroupBlocked)
            .with_group(Arc::clone(&group))
            .with_message(REQUEST_FAILED_MESSAGE)
            .with_error(exhausted.error.to_string()),
    );

    let re_attempt_tier = Attempts {
        phase: Phase::ReAttempt,
        group: &group,
        bus: &ctx.bus,
        max_retry: re_attempt.re_attempt_further(),
        backoff: re_attempt.backoff(cap),
    };
    let outcome = re_attempt_tier.retry_from(exhausted.error, &op).await;

    drop(block);

    match outcome {
        Ok(done) => {
            info!(group = %group, attempts = done.tries, "re-attempt succeeded");
            ctx.bus.publish(
                Event::new(EventKind::ReAttemptSuccessful)
                    .with_group(Arc::clone(&group))
                    .with_attempt(done.tries)
                    .with_message(RE_ATTEMPT_SUCCEEDED_MESSAGE),
            );
            Ok(done.value)
        }
        Err(failed) => {
            warn!(group = %group, attempts = failed.tries, error = %failed.error, "re-attempts exhausted");
            ctx.bus.publish(
                Event::new(EventKind::ReAttemptsFailed)
                    .with_group(Arc::clone(&group))
                    .with_attempt(failed.tries)
                    .with_message(RE_ATTEMPTS_FAILED_MESSAGE)
                    .with_error(failed.error.to_string()),
            );
            Err(RetryError::ReAttemptExhausted {
                attempts: failed.tries,
                error: failed.error,
            })
        }
    }
}
