//! KYC choice: digital (Aadhaar eKYC) or physical verification.
//!
//! Physical KYC ends the journey on this step. Choosing digital afterwards
//! restores the full flow.

use onboard_core::analytics::AnalyticsEvent;
use onboard_core::journey::{BottomBarContent, JourneyController, keys};
use onboard_core::step::StepId;

use super::{KycMethod, Screen, ScreenAction, default_action, field};
use crate::latency::ScreenScope;

pub struct KycChoiceScreen;

impl KycChoiceScreen {
    fn choose(&self, controller: &mut JourneyController, scope: &ScreenScope, method: KycMethod) {
        controller.update_form_data(field(keys::KYC_METHOD, method.to_string()));
        scope.track(AnalyticsEvent::new("kyc_method_selected").with("method", method.to_string()));

        match method {
            KycMethod::Physical => {
                controller.switch_to_physical_kyc_flow();
                scope.track(AnalyticsEvent::new("physical_kyc_journey_ended"));
                controller.set_bottom_bar_content(Some(
                    BottomBarContent::disabled("Visit a branch to complete KYC")
                        .with_hint("Switch to Digital KYC to continue online"),
                ));
            }
            // A physical choice may have truncated the journey
            KycMethod::Digital if !controller.sequence().contains(&StepId::EkycHandler) => {
                controller.switch_to_digital_kyc_flow();
            }
            KycMethod::Digital => controller.advance(),
        }
    }
}

impl Screen for KycChoiceScreen {
    fn on_enter(&self, controller: &mut JourneyController, scope: &ScreenScope) {
        scope.track(AnalyticsEvent::new("page_viewed").with("page", "kyc_choice"));
        controller.set_bottom_bar_content(Some(
            BottomBarContent::disabled("Continue").with_hint("Choose a KYC method"),
        ));
    }

    fn on_action(
        &self,
        controller: &mut JourneyController,
        scope: &ScreenScope,
        action: ScreenAction,
    ) {
        match action {
            ScreenAction::ChooseKyc(method) => self.choose(controller, scope, method),
            ScreenAction::Primary => {
                let chosen = controller
                    .form_data()
                    .get_str(keys::KYC_METHOD)
                    .and_then(|m| m.parse::<KycMethod>().ok());
                match chosen {
                    Some(KycMethod::Digital) => self.choose(controller, scope, KycMethod::Digital),
                    _ => tracing::debug!("[Screen] No digital KYC choice to continue with"),
                }
            }
            other => default_action(controller, other),
        }
    }
}
