//! # Requests and executors.
//!
//! - [`RequestDescriptor`] - what the orchestrator needs to know about a request
//! - [`Request`], [`Method`] - a ready-made descriptor
//! - [`Executor`] - trait performing one try of a request
//! - [`ExecutorFn`] - closure-backed executor

mod executor;
mod executor_fn;
mod request;

pub use executor::Executor;
pub use executor_fn::ExecutorFn;
pub use request::{Method, Request, RequestDescriptor};
