//! # Example: Escalation
//!
//! A flaky endpoint refuses its first six calls. The first run exhausts its
//! retries, blocks the `inventory` group and keeps re-attempting; a second run
//! against the same group is rejected immediately while the first escalates.
//!
//! Run with: `RUST_LOG=debug cargo run --example escalation --features logging`

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use retryvisor::{Client, Config, ExecutorFn, LogWriter, Notice, Policy, Request, Subscribe};

/// Endpoint that succeeds from the `ok_at`-th call on.
fn flaky(ok_at: u32) -> impl Fn(Arc<Request>) -> std::future::Ready<Result<String, String>> + Send + Sync + 'static {
    let calls = Arc::new(AtomicU32::new(0));
    move |req: Arc<Request>| {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        std::future::ready(if n >= ok_at {
            Ok(format!("200 OK {req} (call #{n})"))
        } else {
            Err(format!("503 Service Unavailable (call #{n})"))
        })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = Config {
        max_delay: Duration::from_secs(2),
        ..Config::default()
    };

    let client = Arc::new(
        Client::builder(ExecutorFn::new(flaky(7)))
            .with_config(cfg)
            .with_subscribers(vec![Arc::new(LogWriter::new()) as Arc<dyn Subscribe>])
            .build(),
    );

    let escalating = {
        let run = client
            .request(Request::get("https://shop.example.com/inventory/42"))
            .group("inventory")
            .retry(Policy::new(3, Duration::from_millis(100), 2.0))
            .re_attempt(Policy::new(6, Duration::from_millis(500), 1.5))
            .on_notify(|n: &Notice<'_, String>| {
                println!("[notice] {}: {} (group {})", n.message, n.error, n.group);
            })
            .run();
        tokio::spawn(run)
    };

    tokio::time::sleep(Duration::from_millis(600)).await;
    println!("[main] blocked groups: {:?}", client.blocked_groups().snapshot());

    match client
        .request(Request::get("https://shop.example.com/inventory/7"))
        .group("inventory")
        .run()
        .await
    {
        Ok(body) => println!("[second] {body}"),
        Err(e) => println!("[second] rejected: {e}"),
    }

    match escalating.await {
        Ok(Ok(body)) => println!("[first] {body}"),
        Ok(Err(e)) => println!("[first] failed: {e}"),
        Err(e) => println!("[first] task failed: {e}"),
    }

    client.shutdown().await;
}
