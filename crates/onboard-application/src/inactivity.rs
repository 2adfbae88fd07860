//! Inactivity monitor: wipes the journey after a period without user input.
//!
//! Expiry calls `reset_all()` whatever step is active, then re-arms.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::latency::SharedController;

/// User-activity signals that re-arm the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum ActivitySignal {
    PointerMove,
    KeyPress,
    Click,
    Touch,
}

/// Single re-armable inactivity timer running as a tokio task.
///
/// Dropping the monitor stops it.
pub struct InactivityMonitor {
    activity: Arc<Notify>,
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl InactivityMonitor {
    /// Arms the timer against `controller`.
    pub fn spawn(controller: SharedController, timeout: Duration) -> Self {
        let activity = Arc::new(Notify::new());
        let token = CancellationToken::new();

        let handle = tokio::spawn({
            let activity = activity.clone();
            let token = token.clone();
            async move {
                tracing::debug!(timeout_secs = timeout.as_secs(), "[Inactivity] Monitor armed");
                loop {
                    tokio::select! {
                        _ = token.cancelled() => break,
                        _ = activity.notified() => continue,
                        _ = tokio::time::sleep(timeout) => {
                            tracing::info!("[Inactivity] Session expired; resetting journey");
                            controller.lock().await.reset_all();
                        }
                    }
                }
                tracing::debug!("[Inactivity] Monitor stopped");
            }
        });

        Self {
            activity,
            token,
            handle: Some(handle),
        }
    }

    /// Records user activity, restarting the countdown.
    pub fn touch(&self, signal: ActivitySignal) {
        tracing::trace!(%signal, "[Inactivity] Activity");
        self.activity.notify_one();
    }

    /// Stops the monitor and waits for its task to finish.
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take()
            && let Err(e) = handle.await
        {
            tracing::warn!("[Inactivity] Monitor task failed: {}", e);
        }
    }
}

impl Drop for InactivityMonitor {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboard_core::config::EngineConfig;
    use onboard_core::journey::{JourneyController, JourneyType};
    use onboard_infrastructure::{LocalStorageSessionStore, MemoryStorage};
    use tokio::sync::Mutex;

    const TIMEOUT: Duration = Duration::from_secs(300);

    fn controller() -> SharedController {
        let store = Arc::new(LocalStorageSessionStore::new(
            Arc::new(MemoryStorage::new()),
            "test_",
        ));
        let mut controller = JourneyController::new(store, &EngineConfig::default());
        controller.select_journey_type(JourneyType::LoanOffer);
        controller.advance();
        Arc::new(Mutex::new(controller))
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_resets_journey() {
        let controller = controller();
        let _monitor = InactivityMonitor::spawn(controller.clone(), TIMEOUT);

        tokio::time::sleep(Duration::from_secs(299)).await;
        assert_eq!(controller.lock().await.position(), 1);

        tokio::time::sleep(Duration::from_secs(2)).await;
        let controller = controller.lock().await;
        assert_eq!(controller.position(), 0);
        assert_eq!(controller.journey_type(), Some(JourneyType::NewToBank));
    }

    #[tokio::test(start_paused = true)]
    async fn test_activity_rearms_timer() {
        let controller = controller();
        let monitor = InactivityMonitor::spawn(controller.clone(), TIMEOUT);

        tokio::time::sleep(Duration::from_secs(200)).await;
        monitor.touch(ActivitySignal::KeyPress);
        tokio::time::sleep(Duration::from_secs(200)).await;
        monitor.touch(ActivitySignal::Touch);
        tokio::time::sleep(Duration::from_secs(200)).await;
        assert_eq!(controller.lock().await.position(), 1);

        tokio::time::sleep(Duration::from_secs(150)).await;
        assert_eq!(controller.lock().await.position(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_monitor_never_fires() {
        let controller = controller();
        let monitor = InactivityMonitor::spawn(controller.clone(), TIMEOUT);
        monitor.stop().await;

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(controller.lock().await.position(), 1);
    }
}
