//! Shutdown coordination.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::lifecycle::LifecycleError;

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that all long-running tasks can subscribe to.
pub struct Shutdown {
    /// Broadcast channel sender.
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Get the number of active subscribers (tasks still running).
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// How the drain phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownOutcome {
    /// Every in-flight request finished inside the grace period.
    Clean,
    /// The grace period elapsed first and the accept loop was aborted.
    ///
    /// Connection tasks already spawned by the server are not tracked; they
    /// keep running until the runtime is dropped, which for the binary is
    /// process exit.
    Forced { grace: Duration },
}

/// Wait up to `grace` for the serve task to finish draining.
///
/// The serve task must already have been told to stop accepting. On timeout
/// the serve task (accept loop and drain wait) is aborted and the outcome is
/// `Forced`; that is not an error. Per-connection tasks are left to the
/// runtime.
pub async fn drain(
    serving: JoinHandle<std::io::Result<()>>,
    grace: Duration,
) -> Result<ShutdownOutcome, LifecycleError> {
    let abort = serving.abort_handle();

    match tokio::time::timeout(grace, serving).await {
        Ok(joined) => {
            joined??;
            Ok(ShutdownOutcome::Clean)
        }
        Err(_) => {
            abort.abort();
            Ok(ShutdownOutcome::Forced { grace })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_reaches_subscribers() {
        let shutdown = Shutdown::new();
        let mut a = shutdown.subscribe();
        let mut b = shutdown.subscribe();
        assert_eq!(shutdown.receiver_count(), 2);

        shutdown.trigger();
        assert!(a.recv().await.is_ok());
        assert!(b.recv().await.is_ok());
    }

    #[tokio::test]
    async fn test_drain_clean() {
        let task = tokio::spawn(async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok::<(), std::io::Error>(())
        });
        let outcome = drain(task, Duration::from_secs(1)).await.unwrap();
        assert_eq!(outcome, ShutdownOutcome::Clean);
    }

    #[tokio::test]
    async fn test_drain_forced() {
        let task = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok::<(), std::io::Error>(())
        });
        let grace = Duration::from_millis(50);
        let outcome = drain(task, grace).await.unwrap();
        assert_eq!(outcome, ShutdownOutcome::Forced { grace });
    }

    #[tokio::test]
    async fn test_drain_surfaces_io_error() {
        let task = tokio::spawn(async { Err::<(), _>(std::io::Error::other("socket closed")) });
        let err = drain(task, Duration::from_secs(1)).await.unwrap_err();
        assert!(matches!(err, LifecycleError::Serve(_)));
    }
}
