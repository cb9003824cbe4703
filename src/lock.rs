//! Serialization of operations that spend from a shared account.

use std::sync::Arc;

use std::future::Future;

/// Serializes operations that fund or create resources from a shared
/// operator/issuer account.
///
/// Two concurrent submissions from the same account race on sequence numbers
/// (nonces), making one of them fail non-deterministically. Each adapter
/// holds one `AccountLock` per shared account and routes every such
/// submission through [`with_exclusive_access`](Self::with_exclusive_access).
///
/// Guarantees:
///
/// - total order: guarded futures execute one at a time, in acquisition order
///   (the underlying `tokio::sync::Mutex` queues waiters FIFO);
/// - no starvation: every queued future runs once its predecessor finishes;
/// - a guarded future that returns an error or panics releases the lock on
///   guard drop and never wedges the queue.
///
/// Cloning is cheap and shares the same lock.
#[derive(Debug, Clone, Default)]
pub struct AccountLock {
    inner: Arc<tokio::sync::Mutex<()>>,
}

impl AccountLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` while holding exclusive access to the shared account.
    ///
    /// The result is returned unchanged, success or failure; the lock is
    /// released either way.
    pub async fn with_exclusive_access<F, T>(&self, action: F) -> T
    where
        F: Future<Output = T>,
    {
        let _guard = self.inner.lock().await;
        action.await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test]
    async fn guarded_futures_never_overlap() {
        let lock = AccountLock::new();
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let lock = lock.clone();
                let in_flight = Arc::clone(&in_flight);
                let max_seen = Arc::clone(&max_seen);
                tokio::spawn(async move {
                    lock.with_exclusive_access(async {
                        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                        max_seen.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                    })
                    .await;
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn a_failing_action_does_not_wedge_the_lock() {
        let lock = AccountLock::new();

        let outcome: Result<(), &str> = lock
            .with_exclusive_access(async { Err("sequence conflict") })
            .await;
        assert!(outcome.is_err());

        // Subsequent callers still acquire the lock.
        let ok: Result<(), &str> = lock.with_exclusive_access(async { Ok(()) }).await;
        assert!(ok.is_ok());
    }

    #[tokio::test]
    async fn all_queued_callers_eventually_complete() {
        let lock = AccountLock::new();
        let completed = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..32)
            .map(|i| {
                let lock = lock.clone();
                let completed = Arc::clone(&completed);
                tokio::spawn(async move {
                    let result: Result<usize, &str> = lock
                        .with_exclusive_access(async move {
                            // Every fourth action fails; the rest must still run.
                            if i % 4 == 0 {
                                Err("rejected")
                            } else {
                                Ok(i)
                            }
                        })
                        .await;
                    let _ = result;
                    completed.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(completed.load(Ordering::SeqCst), 32);
    }
}
