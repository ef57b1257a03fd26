use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Latest progress percentage of a running batch, readable from other tasks.
#[derive(Clone)]
pub struct Progress {
    tx: watch::Sender<f64>,
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0.0);
        Self { tx }
    }

    /// Publishes `value`, ignoring anything lower than the current value.
    pub fn publish(&self, value: f64) {
        self.tx.send_if_modified(|current| {
            if value > *current {
                *current = value;
                true
            } else {
                false
            }
        });
    }

    pub fn get(&self) -> f64 {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<f64> {
        self.tx.subscribe()
    }

    /// Polls the published value every `interval` and hands it to `report`.
    /// The returned reporter can be cancelled without touching the producer.
    pub fn spawn_reporter<F>(&self, interval: Duration, mut report: F) -> ProgressReporter
    where
        F: FnMut(f64) + Send + 'static,
    {
        let rx = self.subscribe();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let value = *rx.borrow();
                report(value);
                if value >= 100.0 {
                    break;
                }
            }
        });
        ProgressReporter { handle }
    }
}

pub struct ProgressReporter {
    handle: JoinHandle<()>,
}

impl ProgressReporter {
    pub fn cancel(&self) {
        self.handle.abort();
    }
}
