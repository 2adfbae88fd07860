//! Journey runtime: hosts the active screen over a shared controller.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use onboard_core::analytics::AnalyticsSink;
use onboard_core::config::LatencyConfig;
use onboard_core::journey::{
    ActiveScreen, BottomBarContent, ErrorNotice, JourneyController, JourneyType,
};
use onboard_core::step::{Step, StepId};

use crate::latency::{ScreenScope, SharedController};
use crate::screens::{ScreenAction, ScreenRegistry};

/// What the journey currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub journey_type: Option<JourneyType>,
    pub step: Option<Step>,
    pub branched: bool,
    /// Zero-based position in the sequence.
    pub position: usize,
    pub total: usize,
    pub bottom_bar: Option<BottomBarContent>,
    /// When set, the terminal error screen replaces the step.
    pub error: Option<ErrorNotice>,
}

impl Frame {
    fn capture(controller: &JourneyController) -> Self {
        Self {
            journey_type: controller.journey_type(),
            step: controller.current_step(),
            branched: controller.branch().is_some(),
            position: controller.position(),
            total: controller.sequence().len(),
            bottom_bar: controller.bottom_bar().cloned(),
            error: controller.error().cloned(),
        }
    }
}

/// Identity of a screen activation.
type ActivationKey = (Option<StepId>, ActiveScreen);

fn activation_key(controller: &JourneyController) -> ActivationKey {
    (
        controller.current_step().map(|step| step.id),
        controller.active_screen(),
    )
}

/// Screen host.
///
/// Every change of the active screen cancels the previous activation's
/// scope (dropping its pending delayed callbacks) and enters the new screen
/// with a fresh scope.
pub struct JourneyRuntime {
    controller: SharedController,
    registry: ScreenRegistry,
    scope: ScreenScope,
    entered: Option<ActivationKey>,
}

impl JourneyRuntime {
    pub fn new(
        controller: JourneyController,
        registry: ScreenRegistry,
        analytics: Arc<dyn AnalyticsSink>,
        latency: LatencyConfig,
    ) -> Self {
        let controller = Arc::new(Mutex::new(controller));
        let scope = ScreenScope::new(controller.clone(), analytics, latency);
        Self {
            controller,
            registry,
            scope,
            entered: None,
        }
    }

    /// Handle to the shared controller (for the inactivity monitor).
    pub fn controller(&self) -> SharedController {
        self.controller.clone()
    }

    /// Enters the active screen if it changed since the last activation and
    /// returns the current frame.
    pub async fn render(&mut self) -> Frame {
        let shared = self.controller.clone();
        let mut controller = shared.lock().await;
        self.sync(&mut controller);
        Frame::capture(&controller)
    }

    /// Forwards `action` to the active screen and returns the new frame.
    ///
    /// While an error notice is shown only `ReturnToStart` is accepted.
    pub async fn dispatch(&mut self, action: ScreenAction) -> Frame {
        let shared = self.controller.clone();
        let mut controller = shared.lock().await;
        self.sync(&mut controller);

        if controller.error().is_some() {
            if action == ScreenAction::ReturnToStart {
                controller.reset_all();
                controller.clear_error();
            } else {
                tracing::debug!(action = ?action, "[Runtime] Ignoring action on error screen");
            }
        } else if let Some(step) = controller.current_step()
            && let Some(screen) = self.registry.get(step.id)
        {
            screen.on_action(&mut controller, &self.scope, action);
        }

        self.sync(&mut controller);
        Frame::capture(&controller)
    }

    fn sync(&mut self, controller: &mut JourneyController) {
        let key = activation_key(controller);
        if self.entered == Some(key) {
            return;
        }

        self.scope.cancel();
        self.scope = self.scope.renew();
        self.entered = Some(key);

        let Some(step) = controller.current_step() else {
            return;
        };
        tracing::debug!(step = %step.id, position = controller.position(), "[Runtime] Entering screen");
        if let Some(screen) = self.registry.get(step.id) {
            screen.on_enter(controller, &self.scope);
        }

        // Entering may itself move the journey (e.g. an immediate redirect)
        self.entered = Some(activation_key(controller));
    }
}

impl Drop for JourneyRuntime {
    fn drop(&mut self) {
        self.scope.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use onboard_core::analytics::NoopAnalytics;
    use onboard_core::config::EngineConfig;
    use onboard_infrastructure::{LocalStorageSessionStore, MemoryStorage};
    use std::time::Duration;

    fn runtime(journey_type: JourneyType) -> JourneyRuntime {
        let store = Arc::new(LocalStorageSessionStore::new(
            Arc::new(MemoryStorage::new()),
            "test_",
        ));
        let mut controller = JourneyController::new(store, &EngineConfig::default());
        controller.select_journey_type(journey_type);
        JourneyRuntime::new(
            controller,
            ScreenRegistry::builtin(),
            Arc::new(NoopAnalytics),
            LatencyConfig::default(),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_welcome_otp_flow_advances() {
        let mut runtime = runtime(JourneyType::ExistingExpress);
        let frame = runtime.render().await;
        assert_eq!(frame.step.unwrap().id, StepId::Welcome);
        assert_eq!(frame.bottom_bar.unwrap().label, "Request OTP");

        let frame = runtime.dispatch(ScreenAction::Primary).await;
        assert_eq!(frame.bottom_bar.unwrap().label, "Sending OTP...");

        tokio::time::sleep(Duration::from_millis(1600)).await;
        let frame = runtime.dispatch(ScreenAction::SubmitOtp("481230".into())).await;
        assert_eq!(frame.bottom_bar.unwrap().label, "Verifying...");

        tokio::time::sleep(Duration::from_millis(1600)).await;
        let frame = runtime.render().await;
        assert_eq!(frame.step.unwrap().id, StepId::AutoConversion);
        assert_eq!(frame.position, 1);
        assert_eq!(frame.bottom_bar.unwrap().label, "Convert account");
    }

    #[tokio::test(start_paused = true)]
    async fn test_leaving_screen_cancels_pending_callback() {
        let mut runtime = runtime(JourneyType::ExistingExpress);
        runtime.render().await;
        runtime.dispatch(ScreenAction::Primary).await;
        runtime.dispatch(ScreenAction::SendOtp).await;
        tokio::time::sleep(Duration::from_millis(1600)).await;

        runtime.dispatch(ScreenAction::SubmitOtp("481230".into())).await;
        // Leave before verification completes
        {
            let controller = runtime.controller();
            controller.lock().await.jump_to(StepId::PhysicalKyc);
        }
        runtime.render().await;

        tokio::time::sleep(Duration::from_secs(5)).await;
        let frame = runtime.render().await;
        assert_eq!(frame.step.unwrap().id, StepId::PhysicalKyc);
        assert_eq!(frame.position, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_physical_then_digital_kyc() {
        let mut runtime = runtime(JourneyType::NewToBank);
        {
            let controller = runtime.controller();
            controller.lock().await.advance();
        }
        let frame = runtime.render().await;
        assert_eq!(frame.step.unwrap().id, StepId::KycChoice);

        let frame = runtime
            .dispatch(ScreenAction::ChooseKyc(crate::screens::KycMethod::Physical))
            .await;
        assert_eq!(frame.total, 2);
        assert_eq!(frame.position, 1);
        assert!(!frame.bottom_bar.unwrap().enabled);

        let frame = runtime
            .dispatch(ScreenAction::ChooseKyc(crate::screens::KycMethod::Digital))
            .await;
        assert_eq!(frame.total, 7);
        assert_eq!(frame.step.unwrap().id, StepId::EkycHandler);
        assert_eq!(frame.bottom_bar.unwrap().label, "Send OTP");
    }

    #[tokio::test]
    async fn test_error_screen_only_returns_to_start() {
        let mut runtime = runtime(JourneyType::LoanOffer);
        {
            let controller = runtime.controller();
            let mut controller = controller.lock().await;
            controller.advance();
            controller.set_error(ErrorNotice::new("We couldn't open this journey link", "Invite not found."));
        }

        let frame = runtime.dispatch(ScreenAction::Primary).await;
        assert!(frame.error.is_some());
        assert_eq!(frame.position, 1);

        let frame = runtime.dispatch(ScreenAction::ReturnToStart).await;
        assert!(frame.error.is_none());
        assert_eq!(frame.journey_type, Some(JourneyType::NewToBank));
        assert_eq!(frame.position, 0);
    }
}
