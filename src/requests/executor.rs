//! # Executor abstraction.
//!
//! An [`Executor`] performs one try of a request. Transport, connection reuse
//! and per-call timeouts live behind it; the orchestrator only sees
//! `Ok(response)` or `Err(error)` and decides whether to try again.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::requests::request::RequestDescriptor;

/// # Performs one try of a request.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use async_trait::async_trait;
/// use retryvisor::{Executor, Request};
///
/// struct Echo;
///
/// #[async_trait]
/// impl Executor for Echo {
///     type Request = Request;
///     type Response = String;
///     type Error = String;
///
///     async fn execute(&self, request: Arc<Request>) -> Result<String, String> {
///         Ok(request.to_string())
///     }
/// }
/// ```
#[async_trait]
pub trait Executor: Send + Sync + 'static {
    /// Request description handed to every try.
    type Request: RequestDescriptor;
    /// Value produced by a successful try.
    type Response: Send + 'static;
    /// Error produced by a failed try.
    type Error: fmt::Display + fmt::Debug + Send + Sync + 'static;

    /// Runs one try. Called sequentially, never concurrently, within one run.
    async fn execute(&self, request: Arc<Self::Request>) -> Result<Self::Response, Self::Error>;
}
