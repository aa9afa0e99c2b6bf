//! Single-flight execution of an async operation.
//!
//! Collapses concurrent demands for the same expensive operation into one
//! shared execution: the first caller creates the in-flight future, later
//! callers join it, and everyone observes the same result. The slot is
//! cleared when the attempt settles so the next demand starts a fresh
//! attempt instead of being served a stale or failed result.

use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;

type Slot<T> = Arc<Mutex<Option<Shared<BoxFuture<'static, T>>>>>;

/// A join-or-create slot for one logical operation.
///
/// `T` is the settled value shared by all joiners, so it must be `Clone`;
/// failures are represented inside `T` (e.g. `Option` or `Result`) rather
/// than by a separate error channel.
pub struct SingleFlight<T> {
    slot: Slot<T>,
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Join the pending attempt if one exists, otherwise start one from
    /// `make` and share it with every caller that arrives before it settles.
    ///
    /// The slot empties before the shared future resolves, so demands that
    /// arrive after settlement always trigger a new attempt.
    pub async fn run<F, Fut>(&self, make: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let shared = {
            let mut slot = self.slot.lock().await;
            match slot.as_ref() {
                Some(pending) => pending.clone(),
                None => {
                    let cleanup = Arc::clone(&self.slot);
                    let inner = make();
                    let shared = async move {
                        let out = inner.await;
                        cleanup.lock().await.take();
                        out
                    }
                    .boxed()
                    .shared();
                    *slot = Some(shared.clone());
                    shared
                }
            }
        };

        shared.await
    }
}

impl<T> Clone for SingleFlight<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Default for SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_concurrent_demands_share_one_execution() {
        let flight = SingleFlight::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let attempts = (0..4).map(|_| {
            let calls = Arc::clone(&calls);
            flight.run(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                42u32
            })
        });

        let results = futures::future::join_all(attempts).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|r| *r == 42));
    }

    #[tokio::test]
    async fn test_slot_clears_after_settlement() {
        let flight = SingleFlight::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let calls = Arc::clone(&calls);
            let out = flight
                .run(move || async move { calls.fetch_add(1, Ordering::SeqCst) })
                .await;
            let _ = out;
        }

        // Two sequential demands, two executions: nothing was memoized
        // past settlement.
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_attempt_is_not_cached() {
        let flight: SingleFlight<Option<u32>> = SingleFlight::new();

        let first = flight.run(|| async { None }).await;
        let second = flight.run(|| async { Some(7) }).await;

        assert_eq!(first, None);
        assert_eq!(second, Some(7));
    }
}
