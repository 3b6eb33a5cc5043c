//! Debounced value
//!
//! Collapses bursts of input into one output after a quiet period. Each new
//! input aborts the pending timer task and schedules a fresh one, so a stale
//! timer can never overwrite a newer value.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Default quiet period
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

pub struct Debouncer<T> {
    delay: Duration,
    output: Arc<watch::Sender<T>>,
    pending: Option<JoinHandle<()>>,
}

impl<T> Debouncer<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Output starts at `initial`; later inputs appear after `delay` of quiet.
    pub fn new(initial: T, delay: Duration) -> Self {
        let (output, _) = watch::channel(initial);
        Self {
            delay,
            output: Arc::new(output),
            pending: None,
        }
    }

    pub fn with_default_delay(initial: T) -> Self {
        Self::new(initial, DEFAULT_DEBOUNCE)
    }

    /// Feed a new input, replacing any input still waiting for its quiet period.
    ///
    /// Must be called from within a tokio runtime.
    pub fn push(&mut self, value: T) {
        self.cancel();

        let output = self.output.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            output.send_replace(value);
            tracing::trace!("debounced value released after {:?}", delay);
        }));
    }

    /// Drop the pending input, if any, without releasing it.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// True while an input is waiting for its quiet period
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Last released value
    pub fn current(&self) -> T {
        self.output.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.output.subscribe()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn collect(mut rx: watch::Receiver<&'static str>) -> Arc<Mutex<Vec<&'static str>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let value = *rx.borrow_and_update();
                sink.lock().unwrap().push(value);
            }
        });
        seen
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_releases_only_last() {
        let mut debouncer = Debouncer::new("", Duration::from_millis(200));
        let seen = collect(debouncer.subscribe());

        debouncer.push("A");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.push("B");
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(*seen.lock().unwrap(), vec!["B"]);
        assert_eq!(debouncer.current(), "B");
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_inputs_release_in_order() {
        let mut debouncer = Debouncer::with_default_delay("");
        let seen = collect(debouncer.subscribe());

        debouncer.push("A");
        tokio::time::sleep(Duration::from_millis(300)).await;
        debouncer.push("B");
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(*seen.lock().unwrap(), vec!["A", "B"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_value_and_pending() {
        let mut debouncer = Debouncer::new("start", Duration::from_millis(200));
        assert_eq!(debouncer.current(), "start");
        assert!(!debouncer.is_pending());

        debouncer.push("next");
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.current(), "start");

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.current(), "next");
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending() {
        let mut debouncer = Debouncer::new("start", Duration::from_millis(200));
        let rx = debouncer.subscribe();

        debouncer.push("late");
        drop(debouncer);
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(*rx.borrow(), "start");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_input() {
        let mut debouncer = Debouncer::new(0u32, Duration::from_millis(200));
        debouncer.push(1);
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(debouncer.current(), 0);
    }
}
