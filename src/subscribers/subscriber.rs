//! # Event subscriber trait.
//!
//! [`Subscribe`] is the extension point for reacting to lifecycle events: UI
//! notifications when a group gets blocked, logs, metrics.
//!
//! Each subscriber gets:
//! - **Dedicated worker task** (runs independently of the requests)
//! - **Per-subscriber bounded queue** (capacity via [`Subscribe::queue_capacity`])
//! - **Panic isolation** (a panic is caught and logged, the worker keeps going)
//!
//! ## Rules
//! - A slow subscriber only affects its own queue.
//! - Queue overflow drops the event **for this subscriber only**.
//! - Events are processed sequentially (FIFO) per subscriber.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use retryvisor::{Event, EventKind, Subscribe};
//!
//! struct Toasts;
//!
//! #[async_trait]
//! impl Subscribe for Toasts {
//!     async fn on_event(&self, ev: &Event) {
//!         if matches!(ev.kind, EventKind::RetriesFailed | EventKind::ReAttemptsFailed) {
//!             // show ev.message to the user
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "toasts" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::Event;

/// Listener for lifecycle events.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from the subscriber's worker task, never from the publishing run.
    async fn on_event(&self, event: &Event);

    /// Name used in overflow and panic logs.
    ///
    /// The default uses `type_name::<Self>()`, override it with something short.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred queue capacity (clamped to at least 1). Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
