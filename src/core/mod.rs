//! Runtime core: client, orchestration and the escalation protocol.
//!
//! The public API from this module is [`Client`], [`ClientBuilder`],
//! [`Config`], [`Orchestrator`] and [`Notice`].
//!
//! Internal modules:
//! - [`attempts`]: bounded tries of one tier with backoff and per-try events;
//! - [`escalation`]: the two-tier state machine and group blocking;
//! - [`orchestrator`]: immutable per-request configuration;
//! - [`client`]: shared context and subscriber listener;
//! - [`builder`]: client construction and registry injection.

mod attempts;
mod builder;
mod client;
mod config;
mod escalation;
mod orchestrator;

pub use builder::ClientBuilder;
pub use client::Client;
pub use config::Config;
pub use orchestrator::{Notice, NotifyFn, Orchestrator};
