//! Terminal screen.

use onboard_core::analytics::AnalyticsEvent;
use onboard_core::journey::{BottomBarContent, JourneyController};

use super::{Screen, ScreenAction, default_action};
use crate::latency::ScreenScope;

pub struct CompleteScreen;

impl Screen for CompleteScreen {
    fn on_enter(&self, controller: &mut JourneyController, scope: &ScreenScope) {
        scope.track(AnalyticsEvent::new("journey_completed"));
        controller.add_notification(
            "Application submitted",
            "Your salary account application is complete.",
        );
        controller.set_bottom_bar_content(Some(BottomBarContent::action("Back to home")));
    }

    fn on_action(
        &self,
        controller: &mut JourneyController,
        _scope: &ScreenScope,
        action: ScreenAction,
    ) {
        match action {
            // Nothing follows the final step
            ScreenAction::Primary | ScreenAction::ReturnToStart => controller.reset_all(),
            other => default_action(controller, other),
        }
    }
}
