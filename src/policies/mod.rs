//! Tier policies and their resolution.
//!
//! This module groups the knobs that control **how many** tries each tier gets
//! and **how long** to wait between them.
//!
//! ## Contents
//! - [`Policy`]          tries + interval + multiplier for one tier
//! - [`PolicyOverrides`] partially specified policy given by callers
//! - [`resolve`]         per-key truthy fallback of overrides over defaults
//! - [`BackoffPolicy`]   computed delay schedule (`interval × multiplier^k`, capped)
//! - [`JitterPolicy`]    optional randomization of delays
//!
//! ## Quick wiring
//! ```text
//! Orchestrator::retry(overrides) ─► resolve(overrides, Config::retry) ─► Policy
//!      └─► core::escalation builds Policy::backoff(Config::delay_cap())
//!           and core::attempts sleeps backoff.next(k) before further try k
//! ```

mod backoff;
mod jitter;
mod policy;
mod resolve;

pub use backoff::BackoffPolicy;
pub use jitter::JitterPolicy;
pub use policy::{Policy, ReAttemptPolicy, RetryPolicy};
pub use resolve::{PolicyOverrides, resolve};
