//! # Event subscribers.
//!
//! ```text
//!   run ── publish(Event) ──► Bus ──► client listener ──► SubscriberSet::emit
//!                                                            ├──► [queue] ─► LogWriter
//!                                                            └──► [queue] ─► custom
//! ```
//!
//! - [`Subscribe`]: trait implemented by listeners
//! - [`SubscriberSet`]: bounded per-subscriber queues, one worker each
//! - `LogWriter` (feature `logging`): `tracing` output for every event

#[cfg(feature = "logging")]
mod embedded;
mod set;
mod subscriber;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
