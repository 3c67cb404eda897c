//! Lifecycle events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`], [`Phase`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `core::escalation` (escalation and terminal events) and
//!   `core::attempts` (per-try events).
//! - **Consumers**: the client listener (fans out to `SubscriberSet`) and any
//!   receiver obtained through `Client::subscribe()`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind, Phase};
