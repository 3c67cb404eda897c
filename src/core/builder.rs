use std::sync::Arc;

use crate::{
    core::{
        client::{Client, Context},
        config::Config,
    },
    events::Bus,
    registry::{BlockedGroups, StrategyRegistry},
    requests::Executor,
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for constructing a [`Client`].
pub struct ClientBuilder<X: Executor> {
    executor: Arc<X>,
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    blocked: Option<Arc<BlockedGroups>>,
    strategies: Option<Arc<StrategyRegistry>>,
}

impl<X: Executor> ClientBuilder<X> {
    /// Creates a builder with default configuration.
    pub fn new(executor: Arc<X>) -> Self {
        Self {
            executor,
            cfg: Config::default(),
            subscribers: Vec::new(),
            blocked: None,
            strategies: None,
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets event subscribers.
    ///
    /// Subscribers receive lifecycle events through dedicated workers with
    /// bounded queues. With at least one subscriber, [`build`](Self::build) must
    /// run inside a Tokio runtime.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Shares an existing blocked-group registry instead of creating one.
    pub fn with_blocked_groups(mut self, blocked: Arc<BlockedGroups>) -> Self {
        self.blocked = Some(blocked);
        self
    }

    /// Shares an existing strategy registry instead of creating one with the built-ins.
    pub fn with_strategies(mut self, strategies: Arc<StrategyRegistry>) -> Self {
        self.strategies = Some(strategies);
        self
    }

    /// Builds the client.
    ///
    /// Creates the bus, fresh registries where none were injected, and the
    /// subscriber workers.
    pub fn build(self) -> Client<X> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = SubscriberSet::new(self.subscribers);

        let ctx = Context {
            executor: self.executor,
            bus,
            blocked: self.blocked.unwrap_or_default(),
            strategies: self.strategies.unwrap_or_default(),
            cfg: self.cfg,
        };

        Client::new_internal(ctx, subs)
    }
}
