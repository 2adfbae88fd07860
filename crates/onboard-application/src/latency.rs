//! Cancellable simulated backend latency.
//!
//! Screens stand in for backend calls (OTP send/verify, KYC verification)
//! with fixed delays. Every delayed callback belongs to the scope of the
//! screen that scheduled it; the runtime cancels that scope when the screen
//! is left, so a late callback never acts on a journey that moved on.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use onboard_core::analytics::{AnalyticsEvent, AnalyticsSink};
use onboard_core::config::LatencyConfig;
use onboard_core::journey::JourneyController;

/// Controller handle shared between the runtime, delayed callbacks and the
/// inactivity monitor.
pub type SharedController = Arc<Mutex<JourneyController>>;

/// Lifetime of one screen activation.
#[derive(Clone)]
pub struct ScreenScope {
    token: CancellationToken,
    controller: SharedController,
    analytics: Arc<dyn AnalyticsSink>,
    latency: LatencyConfig,
}

impl ScreenScope {
    pub fn new(
        controller: SharedController,
        analytics: Arc<dyn AnalyticsSink>,
        latency: LatencyConfig,
    ) -> Self {
        Self {
            token: CancellationToken::new(),
            controller,
            analytics,
            latency,
        }
    }

    /// A fresh, uncancelled scope sharing this one's collaborators.
    pub fn renew(&self) -> Self {
        Self::new(
            self.controller.clone(),
            self.analytics.clone(),
            self.latency.clone(),
        )
    }

    pub fn latency(&self) -> &LatencyConfig {
        &self.latency
    }

    pub fn track(&self, event: AnalyticsEvent) {
        self.analytics.track(event);
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Runs `f` against the controller after `delay`, unless the scope is
    /// cancelled first. The task resolves to whether `f` ran.
    pub fn after<F>(&self, delay: Duration, f: F) -> JoinHandle<bool>
    where
        F: FnOnce(&mut JourneyController) + Send + 'static,
    {
        let token = self.token.clone();
        let controller = self.controller.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!("[Latency] Pending callback cancelled");
                    false
                }
                _ = tokio::time::sleep(delay) => {
                    let mut controller = controller.lock().await;
                    // The screen may have been left while we waited for the lock
                    if token.is_cancelled() {
                        return false;
                    }
                    f(&mut controller);
                    true
                }
            }
        })
    }
}
