use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::debug;

/// Enforces a minimum spacing between Spotify calls.
///
/// One pacer is shared (behind an `Arc`) by every call site of a run. The
/// lock is held while sleeping, so concurrent tiers queue up behind each
/// other instead of bursting.
pub struct RequestPacer {
    last_call: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RequestPacer {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            last_call: Mutex::new(None),
            min_interval,
        }
    }

    /// Waits until the interval since the previous call has passed.
    pub async fn wait(&self) {
        let mut last = self.last_call.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                debug!("Pacing request: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_first_call_does_not_wait() {
        let pacer = RequestPacer::new(Duration::from_millis(300));
        let start = Instant::now();
        pacer.wait().await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_consecutive_calls_are_spaced() {
        let pacer = RequestPacer::new(Duration::from_millis(100));
        let start = Instant::now();

        pacer.wait().await;
        pacer.wait().await;
        pacer.wait().await;

        assert!(start.elapsed() >= Duration::from_millis(190));
    }

    #[tokio::test]
    async fn test_shared_pacer_serializes_tasks() {
        let pacer = Arc::new(RequestPacer::new(Duration::from_millis(80)));
        let start = Instant::now();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pacer = Arc::clone(&pacer);
                tokio::spawn(async move { pacer.wait().await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        // four calls need three full gaps
        assert!(start.elapsed() >= Duration::from_millis(230));
    }
}
