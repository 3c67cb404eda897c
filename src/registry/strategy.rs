//! # Named strategies.
//!
//! A [`Strategy`] bundles a retry policy, an optional re-attempt policy and an
//! optional group under a name. [`StrategyRegistry`] stores them write-once:
//! the first registration of a name wins and later ones are ignored.
//!
//! ## Built-ins
//! ```text
//! resilient            retry {5, 100ms, ×1}    re-attempt {10, 1000ms, ×1}
//! exponential-backoff  retry {2, 100ms, ×1.5}  re-attempt {3, 1000ms, ×1.5}
//! ```
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use retryvisor::{Policy, Strategy, StrategyRegistry};
//!
//! let reg = StrategyRegistry::default();
//! let quick = Strategy::new(Policy::new(2, Duration::from_millis(50), 1.0));
//!
//! assert!(reg.add("quick", quick.clone()));
//! assert!(!reg.add("quick", Strategy::resilient()));
//! assert_eq!(reg.get("quick"), Some(quick));
//! assert!(reg.get("resilient").is_some());
//! ```

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use crate::policies::Policy;

/// Name of the built-in [`Strategy::resilient`].
pub const RESILIENT: &str = "resilient";

/// Name of the built-in [`Strategy::exponential_backoff`].
pub const EXPONENTIAL_BACKOFF: &str = "exponential-backoff";

/// Reusable bundle of policies applied by name.
#[derive(Clone, Debug, PartialEq)]
pub struct Strategy {
    /// Retry tier.
    pub retry: Policy,
    /// Re-attempt tier; `None` disables escalation.
    pub re_attempt: Option<Policy>,
    /// Group override; `None` keeps the run's group.
    pub group: Option<Arc<str>>,
}

impl Strategy {
    /// Strategy with only a retry tier.
    pub fn new(retry: Policy) -> Self {
        Self {
            retry,
            re_attempt: None,
            group: None,
        }
    }

    /// Adds a re-attempt tier.
    pub fn with_re_attempt(mut self, re_attempt: Policy) -> Self {
        self.re_attempt = Some(re_attempt);
        self
    }

    /// Pins the group.
    pub fn with_group(mut self, group: impl Into<Arc<str>>) -> Self {
        self.group = Some(group.into());
        self
    }

    /// Many quick retries, then a long escalation.
    pub fn resilient() -> Self {
        Self::new(Policy::new(5, Duration::from_millis(100), 1.0))
            .with_re_attempt(Policy::new(10, Duration::from_millis(1000), 1.0))
    }

    /// Few retries with growing delays in both tiers.
    pub fn exponential_backoff() -> Self {
        Self::new(Policy::new(2, Duration::from_millis(100), 1.5))
            .with_re_attempt(Policy::new(3, Duration::from_millis(1000), 1.5))
    }
}

/// Write-once map of named strategies.
#[derive(Debug)]
pub struct StrategyRegistry {
    strategies: RwLock<HashMap<String, Strategy>>,
}

impl Default for StrategyRegistry {
    /// Registry with the built-in strategies.
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl StrategyRegistry {
    /// Registry without any strategy.
    pub fn empty() -> Self {
        Self {
            strategies: RwLock::new(HashMap::new()),
        }
    }

    /// Registry preloaded with [`RESILIENT`] and [`EXPONENTIAL_BACKOFF`].
    pub fn with_builtins() -> Self {
        let reg = Self::empty();
        reg.add(RESILIENT, Strategy::resilient());
        reg.add(EXPONENTIAL_BACKOFF, Strategy::exponential_backoff());
        reg
    }

    /// Registers `strategy` under `name`.
    ///
    /// Returns `false` and leaves the registry untouched if the name is taken.
    pub fn add(&self, name: &str, strategy: Strategy) -> bool {
        let mut map = self.strategies.write().unwrap_or_else(PoisonError::into_inner);
        if map.contains_key(name) {
            return false;
        }
        map.insert(name.to_owned(), strategy);
        true
    }

    /// Returns the strategy registered under `name`.
    pub fn get(&self, name: &str) -> Option<Strategy> {
        self.strategies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.strategies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Sorted list of registered names.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .strategies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort_unstable();
        names
    }
}
