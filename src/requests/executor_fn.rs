//! # Function-backed executor (`ExecutorFn`)
//!
//! [`ExecutorFn`] wraps a closure `F: Fn(Arc<Req>) -> Fut`, producing a fresh
//! future per try. Shared state between tries goes into the closure explicitly
//! (`Arc<...>`), nothing is mutated behind the caller's back.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use retryvisor::{ExecutorFn, Request};
//!
//! let exec = ExecutorFn::new(|req: Arc<Request>| async move {
//!     Ok::<_, String>(format!("sent {req}"))
//! });
//! # let _ = exec;
//! ```

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use crate::requests::executor::Executor;
use crate::requests::request::RequestDescriptor;

/// Function-backed executor.
pub struct ExecutorFn<Req, Resp, Err, F> {
    f: F,
    _marker: PhantomData<fn(Arc<Req>) -> Result<Resp, Err>>,
}

impl<Req, Resp, Err, F, Fut> ExecutorFn<Req, Resp, Err, F>
where
    F: Fn(Arc<Req>) -> Fut,
    Fut: Future<Output = Result<Resp, Err>>,
{
    /// Wraps `f`; it is called once per try.
    pub fn new(f: F) -> Self {
        Self {
            f,
            _marker: PhantomData,
        }
    }
}

impl<Req, Resp, Err, F> fmt::Debug for ExecutorFn<Req, Resp, Err, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutorFn").finish_non_exhaustive()
    }
}

#[async_trait]
impl<Req, Resp, Err, F, Fut> Executor for ExecutorFn<Req, Resp, Err, F>
where
    Req: RequestDescriptor,
    Resp: Send + 'static,
    Err: fmt::Display + fmt::Debug + Send + Sync + 'static,
    F: Fn(Arc<Req>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Resp, Err>> + Send + 'static,
{
    type Request = Req;
    type Response = Resp;
    type Error = Err;

    async fn execute(&self, request: Arc<Req>) -> Result<Resp, Err> {
        (self.f)(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn calls_closure_per_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let exec = ExecutorFn::new(move |req: Arc<String>| {
            let c = Arc::clone(&c);
            async move {
                let n = c.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 2 { Err(format!("{req} down")) } else { Ok(n) }
            }
        });

        let req = Arc::new(String::from("svc"));
        assert_eq!(exec.execute(Arc::clone(&req)).await, Err("svc down".to_string()));
        assert_eq!(exec.execute(req).await, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
