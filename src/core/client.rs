//! # Client: owns the executor, registries, bus and subscriber fan-out.
//!
//! The [`Client`] is the explicit home of everything that is shared between
//! runs: the executor, the [`BlockedGroups`] and [`StrategyRegistry`]
//! registries, the event [`Bus`] and the subscriber workers. Every
//! [`Orchestrator`] it hands out holds a reference to that shared context.
//!
//! ## Architecture
//! ```text
//! ClientBuilder::build()
//!   ├─► Bus::new(cfg.bus_capacity)
//!   ├─► registries (injected or fresh)
//!   └─► subscriber_listener (only with subscribers):
//!          Bus.subscribe() ─► SubscriberSet::emit(&Event)
//!
//! Client::request(req) ─► Orchestrator ─► run() ─► escalation ─► Bus.publish(..)
//!
//! Client::shutdown():
//!   runtime_token.cancel() ─► listener drains buffered events
//!                          ─► SubscriberSet::shutdown() (workers finish queues)
//! ```
//!
//! ## Rules
//! - Registries are shared by `Arc`; inject the same instance into several clients
//!   to give them one process-wide view of blocked groups and strategies.
//! - Shutdown only stops event delivery to subscribers. Runs in flight keep going.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::builder::ClientBuilder;
use crate::core::config::Config;
use crate::core::orchestrator::Orchestrator;
use crate::events::{Bus, Event};
use crate::registry::{BlockedGroups, Strategy, StrategyRegistry};
use crate::requests::Executor;
use crate::subscribers::SubscriberSet;

/// State shared by a client and every orchestrator it created.
pub(crate) struct Context<X: Executor> {
    pub executor: Arc<X>,
    pub bus: Bus,
    pub blocked: Arc<BlockedGroups>,
    pub strategies: Arc<StrategyRegistry>,
    pub cfg: Config,
}

/// Entry point for orchestrated requests.
pub struct Client<X: Executor> {
    ctx: Arc<Context<X>>,
    runtime_token: CancellationToken,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl<X: Executor> Client<X> {
    /// Starts building a client around `executor`.
    pub fn builder(executor: X) -> ClientBuilder<X> {
        ClientBuilder::new(Arc::new(executor))
    }

    pub(crate) fn new_internal(ctx: Context<X>, subs: SubscriberSet) -> Self {
        let runtime_token = CancellationToken::new();
        let listener = if subs.is_empty() {
            None
        } else {
            Some(Self::subscriber_listener(&ctx.bus, subs, runtime_token.clone()))
        };

        Self {
            ctx: Arc::new(ctx),
            runtime_token,
            listener: Mutex::new(listener),
        }
    }

    /// Forwards bus events to the subscriber set until cancelled.
    fn subscriber_listener(bus: &Bus, subs: SubscriberSet, token: CancellationToken) -> JoinHandle<()> {
        let mut rx = bus.subscribe();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    msg = rx.recv() => match msg {
                        Ok(ev) => subs.emit(&ev),
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(skipped, "subscriber listener lagged behind the bus");
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
            }

            while let Ok(ev) = rx.try_recv() {
                subs.emit(&ev);
            }
            debug!(subscribers = subs.len(), dropped = subs.dropped(), "subscriber listener stopped");
            subs.shutdown().await;
        })
    }

    /// Creates the configuration of one orchestrated request.
    pub fn request(&self, request: X::Request) -> Orchestrator<X> {
        Orchestrator::new(Arc::clone(&self.ctx), request)
    }

    /// Registers a named strategy. Returns `false` if the name is taken.
    pub fn add_strategy(&self, name: &str, strategy: Strategy) -> bool {
        self.ctx.strategies.add(name, strategy)
    }

    /// Looks up a named strategy.
    pub fn strategy(&self, name: &str) -> Option<Strategy> {
        self.ctx.strategies.get(name)
    }

    pub fn blocked_groups(&self) -> &Arc<BlockedGroups> {
        &self.ctx.blocked
    }

    pub fn strategies(&self) -> &Arc<StrategyRegistry> {
        &self.ctx.strategies
    }

    pub fn config(&self) -> &Config {
        &self.ctx.cfg
    }

    pub fn executor(&self) -> &Arc<X> {
        &self.ctx.executor
    }

    /// Raw receiver of every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.ctx.bus.subscribe()
    }

    /// Stops the subscriber listener after it delivered buffered events and
    /// waits for subscriber workers to drain their queues.
    pub async fn shutdown(&self) {
        self.runtime_token.cancel();
        let handle = self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

impl<X: Executor> Drop for Client<X> {
    fn drop(&mut self) {
        self.runtime_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use crate::policies::Policy;
    use crate::requests::{ExecutorFn, Request};
    use crate::subscribers::Subscribe;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    struct Recorder(Arc<Mutex<Vec<EventKind>>>);

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, ev: &Event) {
            self.0.lock().unwrap().push(ev.kind);
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_receive_events_before_shutdown_returns() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let client = Client::builder(ExecutorFn::new(move |_req: Arc<Request>| {
            let n = c.fetch_add(1, Ordering::SeqCst) + 1;
            async move { if n < 2 { Err("refused".to_string()) } else { Ok(n) } }
        }))
        .with_subscribers(vec![Arc::new(Recorder(Arc::clone(&seen))) as Arc<dyn Subscribe>])
        .build();

        let res = client
            .request(Request::get("/orders"))
            .retry(Policy::new(2, Duration::from_millis(10), 1.0))
            .run()
            .await;
        assert_eq!(res.ok(), Some(2));

        client.shutdown().await;

        let seen = seen.lock().unwrap();
        assert_eq!(seen.first(), Some(&EventKind::AttemptStarting));
        assert_eq!(seen.last(), Some(&EventKind::RequestSucceeded));
        assert_eq!(seen.iter().filter(|k| **k == EventKind::AttemptFailed).count(), 1);
    }

    #[test]
    fn strategies_are_shared_through_the_client() {
        let client = Client::builder(ExecutorFn::new(|_req: Arc<Request>| async { Ok::<_, String>(()) })).build();

        assert!(client.strategy("resilient").is_some());
        assert!(client.add_strategy("once", Strategy::new(Policy::new(1, Duration::ZERO, 1.0))));
        assert_eq!(client.strategies().names(), vec!["exponential-backoff", "once", "resilient"]);
        assert_eq!(client.config().bus_capacity, 1024);
    }

    #[test]
    fn builder_without_subscribers_needs_no_runtime() {
        let client = Client::builder(ExecutorFn::new(|_req: Arc<Request>| async { Ok::<_, String>(()) }))
            .with_strategies(Arc::new(StrategyRegistry::empty()))
            .build();

        assert!(client.strategy("resilient").is_none());
        assert!(client.blocked_groups().is_empty());
    }
}
