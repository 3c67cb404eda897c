//! # Orchestrator: configuration of one orchestrated request.
//!
//! An [`Orchestrator`] is an immutable value describing one logical call:
//! the request, the retry tier, the optional re-attempt tier, the group and an
//! optional progress callback. Every setter consumes the value and returns a
//! new one, so two configurations derived from a common base never affect each
//! other.
//!
//! ## Lifecycle
//! ```text
//! Client::request(req)
//!   ├─► .retry(..) / .re_attempt(..) / .group(..) / .on_notify(..)   (or .apply_strategy(name))
//!   └─► .run().await
//!          ├─► configure(): defaults, group = group or req.target()
//!          └─► escalation::execute(): blocked check → retry tier → re-attempt tier
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use retryvisor::{Client, ExecutorFn, PolicyOverrides, Request};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let client = Client::builder(ExecutorFn::new(|req: Arc<Request>| async move {
//!     Ok::<_, String>(format!("200 {}", req.target))
//! }))
//! .build();
//!
//! let res = client
//!     .request(Request::get("https://api.example.com/health"))
//!     .retry(PolicyOverrides::default().max_attempts(2))
//!     .re_attempt(PolicyOverrides::default().interval(Duration::from_secs(2)))
//!     .group("health")
//!     .run()
//!     .await;
//!
//! assert_eq!(res.ok().as_deref(), Some("200 https://api.example.com/health"));
//! # }
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tracing::error;

use crate::core::client::Context;
use crate::core::escalation;
use crate::error::RetryError;
use crate::policies::{Policy, PolicyOverrides, resolve};
use crate::requests::{Executor, RequestDescriptor};

/// Progress notification fired once when a run escalates to re-attempts.
#[derive(Debug)]
pub struct Notice<'a, E> {
    /// Human-readable failure message.
    pub message: &'static str,
    /// Error of the last retry try.
    pub error: &'a E,
    /// Group that is being blocked.
    pub group: &'a str,
}

/// Shared progress callback.
pub type NotifyFn<E> = Arc<dyn Fn(&Notice<'_, E>) + Send + Sync>;

/// Fully configured run, produced by [`Orchestrator::configure`].
pub(crate) struct Plan<R> {
    pub request: Arc<R>,
    pub group: Arc<str>,
    pub retry: Policy,
    pub re_attempt: Option<Policy>,
}

/// Immutable configuration of one orchestrated request.
pub struct Orchestrator<X: Executor> {
    ctx: Arc<Context<X>>,
    request: Arc<X::Request>,
    retry: Option<Policy>,
    re_attempt: Option<Policy>,
    group: Option<Arc<str>>,
    notify: Option<NotifyFn<X::Error>>,
}

impl<X: Executor> Clone for Orchestrator<X> {
    fn clone(&self) -> Self {
        Self {
            ctx: Arc::clone(&self.ctx),
            request: Arc::clone(&self.request),
            retry: self.retry,
            re_attempt: self.re_attempt,
            group: self.group.clone(),
            notify: self.notify.clone(),
        }
    }
}

impl<X: Executor> fmt::Debug for Orchestrator<X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("target", &self.request.target())
            .field("retry", &self.retry)
            .field("re_attempt", &self.re_attempt)
            .field("group", &self.group)
            .field("notify", &self.notify.is_some())
            .finish_non_exhaustive()
    }
}

impl<X: Executor> Orchestrator<X> {
    pub(crate) fn new(ctx: Arc<Context<X>>, request: X::Request) -> Self {
        Self {
            ctx,
            request: Arc::new(request),
            retry: None,
            re_attempt: None,
            group: None,
            notify: None,
        }
    }

    /// Replaces the request.
    pub fn request(self, request: X::Request) -> Self {
        Self {
            request: Arc::new(request),
            ..self
        }
    }

    /// Sets the retry tier, resolved over [`Config::retry`](crate::Config::retry).
    ///
    /// Empty overrides select the defaults.
    pub fn retry(self, given: impl Into<PolicyOverrides>) -> Self {
        let policy = resolve(Some(&given.into()), &self.ctx.cfg.retry);
        Self {
            retry: Some(policy),
            ..self
        }
    }

    /// Enables the re-attempt tier, resolved over [`Config::re_attempt`](crate::Config::re_attempt).
    ///
    /// Empty overrides select the defaults.
    pub fn re_attempt(self, given: impl Into<PolicyOverrides>) -> Self {
        let policy = resolve(Some(&given.into()), &self.ctx.cfg.re_attempt);
        Self {
            re_attempt: Some(policy),
            ..self
        }
    }

    /// Disables the re-attempt tier.
    pub fn without_re_attempt(self) -> Self {
        Self {
            re_attempt: None,
            ..self
        }
    }

    /// Sets the group; defaults to the request target.
    pub fn group(self, name: impl Into<Arc<str>>) -> Self {
        Self {
            group: Some(name.into()),
            ..self
        }
    }

    /// Sets the progress callback fired when the run escalates.
    pub fn on_notify<F>(self, f: F) -> Self
    where
        F: Fn(&Notice<'_, X::Error>) + Send + Sync + 'static,
    {
        Self {
            notify: Some(Arc::new(f)),
            ..self
        }
    }

    /// Applies the named strategy through the regular setters.
    ///
    /// Returns `None` if no strategy is registered under `name`.
    pub fn apply_strategy(self, name: &str) -> Option<Self> {
        let strategy = self.ctx.strategies.get(name)?;

        let mut next = self.retry(strategy.retry);
        if let Some(re_attempt) = strategy.re_attempt {
            next = next.re_attempt(re_attempt);
        }
        if let Some(group) = strategy.group {
            next = next.group(group);
        }
        Some(next)
    }

    /// Applies the named strategy and runs.
    ///
    /// An unknown name is reported here, synchronously: an error is logged and
    /// `None` is returned instead of a future.
    pub fn run_strategy(
        self,
        name: &str,
    ) -> Option<impl Future<Output = Result<X::Response, RetryError<X::Error>>> + use<X>> {
        match self.apply_strategy(name) {
            Some(configured) => Some(configured.run()),
            None => {
                error!(strategy = name, "strategy is not registered");
                None
            }
        }
    }

    /// Runs the request through the escalation protocol.
    ///
    /// Resolves with the first successful response; rejects with
    /// [`RetryError::Blocked`], [`RetryError::RetryExhausted`] or
    /// [`RetryError::ReAttemptExhausted`].
    pub async fn run(self) -> Result<X::Response, RetryError<X::Error>> {
        let plan = self.configure();
        escalation::execute(&self.ctx, plan, self.notify.as_ref()).await
    }

    /// Resolves defaults and the group.
    pub(crate) fn configure(&self) -> Plan<X::Request> {
        let group = match &self.group {
            Some(g) => Arc::clone(g),
            None => Arc::from(self.request.target()),
        };

        Plan {
            request: Arc::clone(&self.request),
            group,
            retry: self.retry.unwrap_or(self.ctx.cfg.retry),
            re_attempt: self.re_attempt,
        }
    }

    /// Group the run will use.
    pub fn resolved_group(&self) -> Arc<str> {
        self.configure().group
    }

    /// Retry tier the run will use.
    pub fn retry_policy(&self) -> Policy {
        self.retry.unwrap_or(self.ctx.cfg.retry)
    }

    /// Re-attempt tier, if enabled.
    pub fn re_attempt_policy(&self) -> Option<Policy> {
        self.re_attempt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Client, Config};
    use crate::policies::JitterPolicy;
    use crate::registry::Strategy;
    use crate::requests::{ExecutorFn, Request};
    use std::time::Duration;

    fn client() -> Client<impl Executor<Request = Request, Error = String>> {
        Client::builder(ExecutorFn::new(|_req: Arc<Request>| async { Ok::<_, String>(()) })).build()
    }

    #[test]
    fn group_defaults_to_target() {
        let c = client();
        let o = c.request(Request::get("https://api.example.com/users"));
        assert_eq!(&*o.resolved_group(), "https://api.example.com/users");

        let o = o.group("users");
        assert_eq!(&*o.resolved_group(), "users");
    }

    #[test]
    fn unset_tiers_use_config_and_no_escalation() {
        let c = client();
        let o = c.request(Request::get("/x"));
        assert_eq!(o.retry_policy(), Config::default().retry);
        assert_eq!(o.re_attempt_policy(), None);
    }

    #[test]
    fn empty_re_attempt_overrides_select_defaults() {
        let c = client();
        let o = c.request(Request::get("/x")).re_attempt(PolicyOverrides::default());
        assert_eq!(o.re_attempt_policy(), Some(Policy::RE_ATTEMPT));

        let o = o.without_re_attempt();
        assert_eq!(o.re_attempt_policy(), None);
    }

    #[test]
    fn derived_configurations_are_independent() {
        let c = client();
        let base = c
            .request(Request::get("/x"))
            .retry(Policy::new(2, Duration::from_millis(50), 1.0));

        let grouped = base.clone().group("a");
        let escalating = base
            .clone()
            .re_attempt(PolicyOverrides::default().max_attempts(5));
        let replaced = base.clone().request(Request::get("/y"));

        assert_eq!(&*base.resolved_group(), "/x");
        assert_eq!(base.re_attempt_policy(), None);
        assert_eq!(&*grouped.resolved_group(), "a");
        assert_eq!(escalating.re_attempt_policy().map(|p| p.max_attempts), Some(5));
        assert_eq!(&*replaced.resolved_group(), "/y");
        assert_eq!(replaced.retry_policy().max_attempts, 2);
    }

    #[test]
    fn partial_overrides_keep_given_fields() {
        let c = client();
        let o = c.request(Request::get("/x")).retry(
            PolicyOverrides::default()
                .interval(Duration::from_millis(250))
                .jitter(JitterPolicy::Full),
        );

        let p = o.retry_policy();
        assert_eq!(p.max_attempts, Policy::RETRY.max_attempts);
        assert_eq!(p.interval, Duration::from_millis(250));
        assert_eq!(p.interval_multiplier, Policy::RETRY.interval_multiplier);
        assert_eq!(p.jitter, JitterPolicy::Full);
    }

    #[test]
    fn strategy_applies_tiers_and_group() {
        let c = client();
        let s = Strategy::new(Policy::new(4, Duration::from_millis(20), 2.0))
            .with_re_attempt(Policy::new(6, Duration::from_secs(2), 1.0))
            .with_group("svc");
        assert!(c.add_strategy("svc", s));

        let o = c.request(Request::get("/x")).apply_strategy("svc").expect("registered");
        assert_eq!(o.retry_policy().max_attempts, 4);
        assert_eq!(o.re_attempt_policy().map(|p| p.max_attempts), Some(6));
        assert_eq!(&*o.resolved_group(), "svc");

        assert!(c.request(Request::get("/x")).apply_strategy("nope").is_none());
    }

    #[test]
    fn builtin_strategies_are_registered() {
        let c = client();
        let o = c
            .request(Request::get("/x"))
            .apply_strategy(crate::registry::EXPONENTIAL_BACKOFF)
            .expect("built-in");
        assert_eq!(o.retry_policy().interval_multiplier, 1.5);
        assert_eq!(&*o.resolved_group(), "/x");
    }
}
