//! Figure object accessor
//!
//! Polls an artifact until it exposes a ready figure, bounded by a deadline.

use crate::artifact::ArtifactHandle;
use crate::error::CaptureError;
use plotcheck_figure::FigureSnapshot;
use std::time::Duration;
use tokio::time::Instant;

/// Captures figure snapshots from artifact handles
#[derive(Debug, Clone, Copy)]
pub struct FigureAccessor {
    timeout: Duration,
    poll_interval: Duration,
}

impl FigureAccessor {
    /// Default capture deadline
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Default pause between polls
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

    /// Create accessor with the given deadline
    #[inline]
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
        }
    }

    /// Set pause between polls
    #[inline]
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Capture deadline
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Pause between polls
    #[inline]
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Poll `handle` until it exposes a ready figure
    ///
    /// A figure without any coordinate-bearing structure is not ready and
    /// polling continues. Each individual query is bounded by the remaining
    /// time, so a hung driver cannot outlive the deadline.
    ///
    /// # Errors
    /// - `CaptureError::Timeout` with the elapsed time if the deadline passes
    /// - `CaptureError::Artifact` if the handle fails
    /// - `CaptureError::Malformed` if the figure entry is not a figure object
    pub async fn capture(&self, handle: &dyn ArtifactHandle) -> Result<FigureSnapshot, CaptureError> {
        let started = Instant::now();
        let deadline = started + self.timeout;
        let mut polls = 0_u32;

        loop {
            polls += 1;
            match tokio::time::timeout_at(deadline, handle.figure_state()).await {
                Err(_) => break,
                Ok(Err(e)) => return Err(e.into()),
                Ok(Ok(Some(value))) => {
                    let snapshot = FigureSnapshot::from_value(value)?;
                    if snapshot.is_ready() {
                        tracing::debug!(
                            "Captured figure from {} after {} polls",
                            handle.location(),
                            polls
                        );
                        return Ok(snapshot);
                    }
                }
                Ok(Ok(None)) => {}
            }

            let now = Instant::now();
            if now >= deadline {
                break;
            }
            tokio::time::sleep(self.poll_interval.min(deadline - now)).await;
        }

        let elapsed = started.elapsed();
        tracing::debug!(
            "No ready figure from {} after {} polls ({:?})",
            handle.location(),
            polls,
            elapsed
        );
        Err(CaptureError::Timeout { elapsed })
    }
}

impl Default for FigureAccessor {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArtifactError;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Exposes `figure` from the `ready_after`-th query on
    struct Delayed {
        figure: Value,
        ready_after: usize,
        queries: AtomicUsize,
    }

    impl Delayed {
        fn new(figure: Value, ready_after: usize) -> Self {
            Self {
                figure,
                ready_after,
                queries: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ArtifactHandle for Delayed {
        async fn load(&mut self) -> Result<(), ArtifactError> {
            Ok(())
        }

        async fn figure_state(&self) -> Result<Option<Value>, ArtifactError> {
            let n = self.queries.fetch_add(1, Ordering::SeqCst) + 1;
            Ok((n >= self.ready_after).then(|| self.figure.clone()))
        }

        fn location(&self) -> String {
            "delayed".to_string()
        }
    }

    struct Hung;

    #[async_trait]
    impl ArtifactHandle for Hung {
        async fn load(&mut self) -> Result<(), ArtifactError> {
            Ok(())
        }

        async fn figure_state(&self) -> Result<Option<Value>, ArtifactError> {
            std::future::pending().await
        }

        fn location(&self) -> String {
            "hung".to_string()
        }
    }

    fn ready_figure() -> Value {
        json!({ "data": { "data01": [[0.0, 1.0]] }, "props": { "axes": [] } })
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_figure_to_appear() {
        let handle = Delayed::new(ready_figure(), 5);
        let accessor = FigureAccessor::new(Duration::from_secs(2));

        let snapshot = accessor.capture(&handle).await.unwrap();
        assert!(snapshot.primary_series().is_some());
        assert_eq!(handle.queries.load(Ordering::SeqCst), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn uninitialized_figure_is_not_ready() {
        let handle = Delayed::new(json!({ "data": {}, "props": { "axes": [{}] } }), 1);
        let accessor = FigureAccessor::new(Duration::from_secs(1));

        let err = accessor.capture(&handle).await.unwrap_err();
        match err {
            CaptureError::Timeout { elapsed } => assert!(elapsed >= Duration::from_secs(1)),
            other => panic!("expected timeout, got {other:?}"),
        }
        assert!(handle.queries.load(Ordering::SeqCst) > 1);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_query_is_bounded_by_deadline() {
        let accessor = FigureAccessor::new(Duration::from_millis(500));
        let err = accessor.capture(&Hung).await.unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test(start_paused = true)]
    async fn non_object_figure_is_malformed() {
        let handle = Delayed::new(json!([1, 2, 3]), 1);
        let err = FigureAccessor::default().capture(&handle).await.unwrap_err();
        assert!(matches!(err, CaptureError::Malformed(_)));
    }
}
