//! Shared registries.
//!
//! - [`BlockedGroups`]     groups under escalation (runs for them fail fast)
//! - [`StrategyRegistry`]  write-once map of named [`Strategy`] bundles
//!
//! Both are plain values shared through `Arc`. A client creates its own unless
//! one is injected through the builder.

mod blocked;
mod strategy;

pub use blocked::BlockedGroups;
pub use strategy::{EXPONENTIAL_BACKOFF, RESILIENT, Strategy, StrategyRegistry};
