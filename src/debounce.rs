//! Settle-timer for rapidly changing input, used by the live-search path.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Forwards only the latest submitted value, and only once the input has
/// stayed quiet for the configured period. Each new value supersedes the
/// pending timer; dropping the debouncer cancels it, so no callback fires
/// after teardown.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    worker: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F, Fut>(quiet: Duration, mut on_settled: F) -> Self
    where
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();
        let worker = tokio::spawn(async move {
            let mut pending: Option<T> = None;
            loop {
                if pending.is_some() {
                    tokio::select! {
                        next = rx.recv() => match next {
                            // Restart the quiet period from this newer value
                            Some(value) => pending = Some(value),
                            None => break,
                        },
                        _ = tokio::time::sleep(quiet) => {
                            if let Some(value) = pending.take() {
                                on_settled(value).await;
                            }
                        }
                    }
                } else {
                    match rx.recv().await {
                        Some(value) => pending = Some(value),
                        None => break,
                    }
                }
            }
        });
        Self { tx, worker }
    }

    /// Feed the next raw value; supersedes any value still waiting out its
    /// quiet period.
    pub fn submit(&self, value: T) {
        let _ = self.tx.send(value);
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::{Instant, advance, sleep};

    #[tokio::test(start_paused = true)]
    async fn settles_once_on_the_last_value() {
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();
        let start = Instant::now();
        let debouncer = Debouncer::new(Duration::from_millis(300), move |value: u32| {
            let out = out_tx.clone();
            async move {
                let _ = out.send((value, Instant::now()));
            }
        });

        debouncer.submit(1);
        sleep(Duration::from_millis(10)).await;
        debouncer.submit(2);
        sleep(Duration::from_millis(10)).await;
        debouncer.submit(3);

        // Nothing propagates before the quiet period ends
        sleep(Duration::from_millis(290)).await;
        assert!(out_rx.try_recv().is_err());

        sleep(Duration::from_millis(20)).await;
        let (value, at) = out_rx.try_recv().expect("one settled value");
        assert_eq!(value, 3);
        assert_eq!(at.duration_since(start), Duration::from_millis(320));
        assert!(out_rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_cancels_the_pending_timer() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let debouncer = Debouncer::new(Duration::from_millis(300), move |_: u32| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        debouncer.submit(5);
        advance(Duration::from_millis(100)).await;
        drop(debouncer);

        advance(Duration::from_millis(600)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn settled_values_arrive_in_submission_order() {
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();
        let debouncer = Debouncer::new(Duration::from_millis(300), move |value: u32| {
            let out = out_tx.clone();
            async move {
                let _ = out.send(value);
            }
        });

        debouncer.submit(1);
        sleep(Duration::from_millis(400)).await;
        debouncer.submit(2);
        sleep(Duration::from_millis(400)).await;

        assert_eq!(out_rx.try_recv().ok(), Some(1));
        assert_eq!(out_rx.try_recv().ok(), Some(2));
        assert!(out_rx.try_recv().is_err());
    }
}
