//! # retryvisor
//!
//! **Retryvisor** is a retry-orchestration layer for asynchronous network calls.
//!
//! It retries transient failures under a bounded policy and, when those retries
//! run out, escalates into a slower re-attempt tier while marking the failing
//! endpoint group as blocked, so that other callers of that group fail fast
//! instead of piling on doomed calls.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │ Orchestrator │   │ Orchestrator │   │ Orchestrator │
//!     │ (request #1) │   │ (request #2) │   │ (request #3) │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Client (shared context)                                          │
//! │  - Executor (performs one try)                                    │
//! │  - BlockedGroups (groups under escalation)                        │
//! │  - StrategyRegistry (named policy bundles)                        │
//! │  - Bus (broadcast events) ─► SubscriberSet (per-sub queues)       │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! Client::request(req).retry(..).re_attempt(..).run()
//!
//!   ├─► group blocked?          ─► Err(Blocked), executor untouched
//!   ├─► retry tier: try, sleep interval × multiplier^k, try ... (max_attempts tries)
//!   │       └─ Ok ─► Ok(response)
//!   ├─► retries exhausted       ─► publish RetriesFailed
//!   │       └─ no re-attempt    ─► publish RequestFailed ─► Err(RetryExhausted)
//!   └─► re-attempt tier:
//!           notify(Notice), block group
//!           sleep, try ... (max_attempts - 1 tries)
//!           unblock group
//!           ├─ Ok  ─► publish ReAttemptSuccessful ─► Ok(response)
//!           └─ Err ─► publish ReAttemptsFailed    ─► Err(ReAttemptExhausted)
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                          |
//! |-------------------|---------------------------------------------------------------|---------------------------------------------|
//! | **Orchestration** | Two-tier retry with group blocking.                           | [`Client`], [`Orchestrator`]                |
//! | **Policies**      | Tier policies, resolution over defaults, backoff and jitter.  | [`Policy`], [`PolicyOverrides`], [`resolve`]|
//! | **Registries**    | Blocked groups and named strategies.                          | [`BlockedGroups`], [`StrategyRegistry`]     |
//! | **Requests**      | Executor abstraction and request descriptors.                 | [`Executor`], [`ExecutorFn`], [`Request`]   |
//! | **Events**        | Lifecycle events and subscribers.                             | [`Event`], [`Subscribe`]                    |
//! | **Errors**        | Typed rejections with fixed messages.                         | [`RetryError`]                              |
//!
//! ## Optional features
//! - `logging`: exports [`LogWriter`], a subscriber that renders events through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::time::Duration;
//! use retryvisor::{Client, ExecutorFn, Policy, Request};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let calls = Arc::new(AtomicU32::new(0));
//!     let c = Arc::clone(&calls);
//!     let executor = ExecutorFn::new(move |_req: Arc<Request>| {
//!         let n = c.fetch_add(1, Ordering::SeqCst) + 1;
//!         async move { if n < 3 { Err(format!("refused #{n}")) } else { Ok(n) } }
//!     });
//!
//!     let client = Client::builder(executor).build();
//!
//!     let res = client
//!         .request(Request::get("https://api.example.com/orders"))
//!         .retry(Policy::new(3, Duration::from_millis(10), 1.0))
//!         .run()
//!         .await;
//!     assert_eq!(res.ok(), Some(3));
//!
//!     // Built-in strategies are applied by name.
//!     let fut = client
//!         .request(Request::get("https://api.example.com/orders"))
//!         .run_strategy("resilient")
//!         .expect("built-in strategy");
//!     assert!(fut.await.is_ok());
//!
//!     let unknown = client.request(Request::get("/x")).run_strategy("nope");
//!     assert!(unknown.is_none());
//! }
//! ```

mod core;
mod error;
mod events;
mod policies;
mod registry;
mod requests;
mod subscribers;

// ---- Public re-exports ----

pub use core::{Client, ClientBuilder, Config, Notice, NotifyFn, Orchestrator};
pub use error::{
    BLOCKED_MESSAGE, RE_ATTEMPT_SUCCEEDED_MESSAGE, RE_ATTEMPTS_FAILED_MESSAGE, REQUEST_FAILED_MESSAGE,
    RetryError,
};
pub use events::{Bus, Event, EventKind, Phase};
pub use policies::{BackoffPolicy, JitterPolicy, Policy, PolicyOverrides, ReAttemptPolicy, RetryPolicy, resolve};
pub use registry::{BlockedGroups, EXPONENTIAL_BACKOFF, RESILIENT, Strategy, StrategyRegistry};
pub use requests::{Executor, ExecutorFn, Method, Request, RequestDescriptor};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a built-in subscriber that logs every event through `tracing`.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
