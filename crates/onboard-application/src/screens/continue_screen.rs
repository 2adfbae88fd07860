//! Generic screen for steps without bespoke behavior.

use onboard_core::journey::{BottomBarContent, JourneyController};
use onboard_core::analytics::AnalyticsEvent;

use super::Screen;
use crate::latency::ScreenScope;

/// Shows a "Continue" action that advances the journey.
pub struct ContinueScreen;

impl Screen for ContinueScreen {
    fn on_enter(&self, controller: &mut JourneyController, scope: &ScreenScope) {
        if let Some(step) = controller.current_step() {
            scope.track(AnalyticsEvent::new("page_viewed").with("page", step.id.to_string()));
        }
        controller.set_bottom_bar_content(Some(BottomBarContent::action("Continue")));
    }
}
