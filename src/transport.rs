//! Tower-based request pacing for RPC clients.
//!
//! Public testnet endpoints throttle aggressively; this layer enforces a
//! minimum interval between consecutive requests so a benchmark pass does not
//! trip endpoint rate limits mid-run. Composes with alloy's transport stack:
//!
//! ```rust,ignore
//! use alloy_rpc_client::ClientBuilder;
//! use ledgerbench::transport::ThrottleLayer;
//!
//! let client = ClientBuilder::default()
//!     .layer(ThrottleLayer::per_second(4))
//!     .http(rpc_url);
//! ```

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Duration,
};

use tokio::sync::Mutex;
use tokio::time::Instant;
use tower::Layer;

/// A Tower layer enforcing a minimum interval between requests.
#[derive(Clone, Debug)]
pub struct ThrottleLayer {
    interval: Duration,
    last_dispatch: Arc<Mutex<Option<Instant>>>,
}

impl ThrottleLayer {
    /// At least `interval` between consecutive requests.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_dispatch: Arc::new(Mutex::new(None)),
        }
    }

    /// Convenience constructor: at most `requests` per second, evenly spaced.
    pub fn per_second(requests: u32) -> Self {
        let requests = requests.max(1);
        Self::new(Duration::from_secs(1) / requests)
    }
}

impl<S> Layer<S> for ThrottleLayer {
    type Service = ThrottleService<S>;

    fn layer(&self, service: S) -> Self::Service {
        ThrottleService {
            service,
            interval: self.interval,
            last_dispatch: Arc::clone(&self.last_dispatch),
        }
    }
}

/// Service produced by [`ThrottleLayer`]; waits out the remaining interval
/// before forwarding each request to the inner service.
#[derive(Clone, Debug)]
pub struct ThrottleService<S> {
    service: S,
    interval: Duration,
    last_dispatch: Arc<Mutex<Option<Instant>>>,
}

impl<S, Request> tower::Service<Request> for ThrottleService<S>
where
    S: tower::Service<Request> + Clone + Send + 'static,
    S::Future: Send,
    Request: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let interval = self.interval;
        let last_dispatch = Arc::clone(&self.last_dispatch);
        let mut service = self.service.clone();

        Box::pin(async move {
            // Claim the next dispatch slot while holding the lock, so queued
            // requests space themselves out instead of stampeding at once.
            {
                let mut last = last_dispatch.lock().await;
                let now = Instant::now();
                let ready_at = match *last {
                    Some(prev) => (prev + interval).max(now),
                    None => now,
                };
                *last = Some(ready_at);
                drop(last);
                tokio::time::sleep_until(ready_at).await;
            }

            service.call(request).await
        })
    }
}
