//! # SubscriberSet: non-blocking fan-out over multiple subscribers
//!
//! [`SubscriberSet`] hands each [`Event`] to every subscriber **without awaiting**
//! their processing.
//!
//! ## What it guarantees
//! - `emit(&Event)` returns immediately.
//! - Per-subscriber FIFO.
//! - A panicking subscriber is logged and keeps receiving events.
//!
//! ## What it does **not** guarantee
//! - No global ordering across subscribers.
//! - No redelivery on queue overflow.
//!
//! ```text
//!    emit(&Event)
//!        │                        (Arc-clone per subscriber)
//!        ├────────────────► [queue S1] ─► worker S1 ─► on_event()
//!        └────────────────► [queue SN] ─► worker SN ─► on_event()
//! ```

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::FutureExt;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{error, warn};

use crate::events::Event;

use super::Subscribe;

/// Queue and worker serving one subscriber.
struct Lane {
    name: &'static str,
    tx: mpsc::Sender<Arc<Event>>,
    worker: JoinHandle<()>,
    dropped: AtomicU64,
}

impl Lane {
    fn open(sub: Arc<dyn Subscribe>) -> Self {
        let name = sub.name();
        let (tx, rx) = mpsc::channel(sub.queue_capacity().max(1));
        Self {
            name,
            tx,
            worker: tokio::spawn(deliver(sub, rx)),
            dropped: AtomicU64::new(0),
        }
    }

    fn offer(&self, ev: &Arc<Event>) {
        let reason = match self.tx.try_send(Arc::clone(ev)) {
            Ok(()) => return,
            Err(TrySendError::Full(_)) => "queue full",
            Err(TrySendError::Closed(_)) => "worker closed",
        };
        let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
        warn!(subscriber = self.name, event = ev.kind.as_str(), reason, total, "dropped event");
    }
}

/// Worker loop: hands queued events to `sub` one at a time until the queue closes.
async fn deliver(sub: Arc<dyn Subscribe>, mut rx: mpsc::Receiver<Arc<Event>>) {
    while let Some(ev) = rx.recv().await {
        let handled = AssertUnwindSafe(sub.on_event(&ev)).catch_unwind().await;
        if let Err(panic) = handled {
            error!(subscriber = sub.name(), event = ev.kind.as_str(), ?panic, "subscriber panicked");
        }
    }
}

/// Fan-out with per-subscriber bounded queues and worker tasks.
pub struct SubscriberSet {
    lanes: Vec<Lane>,
}

impl SubscriberSet {
    /// Creates a set and spawns one worker per subscriber.
    ///
    /// Must be called inside a Tokio runtime when `subs` is not empty.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>) -> Self {
        Self {
            lanes: subs.into_iter().map(Lane::open).collect(),
        }
    }

    /// Fans one event out to all subscribers (non-blocking).
    ///
    /// A full or closed queue drops the event for that subscriber only.
    pub fn emit(&self, event: &Event) {
        if self.lanes.is_empty() {
            return;
        }
        let ev = Arc::new(event.clone());
        self.lanes.iter().for_each(|lane| lane.offer(&ev));
    }

    /// Events dropped so far, summed over all subscribers.
    pub fn dropped(&self) -> u64 {
        self.lanes
            .iter()
            .map(|lane| lane.dropped.load(Ordering::Relaxed))
            .sum()
    }

    /// Closes all queues and waits for the workers to drain them.
    pub async fn shutdown(self) {
        let workers: Vec<JoinHandle<()>> = self.lanes.into_iter().map(|lane| lane.worker).collect();
        for worker in workers {
            let _ = worker.await;
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lanes.len()
    }
}
