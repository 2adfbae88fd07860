//! Express conversion of an existing account into a salary account.

use serde_json::Value;

use onboard_core::analytics::AnalyticsEvent;
use onboard_core::journey::{BottomBarContent, JourneyController};

use super::{Screen, ScreenAction, default_action, field, fields};
use crate::latency::ScreenScope;

pub struct AutoConversionScreen;

impl Screen for AutoConversionScreen {
    fn on_enter(&self, controller: &mut JourneyController, scope: &ScreenScope) {
        scope.track(AnalyticsEvent::new("page_viewed").with("page", "auto_conversion"));
        let bar = match controller.form_data().get_str(fields::AUTO_CONVERT_STATUS) {
            Some("success") => BottomBarContent::action("Continue"),
            _ => BottomBarContent::action("Convert account"),
        };
        controller.set_bottom_bar_content(Some(bar));
    }

    fn on_action(
        &self,
        controller: &mut JourneyController,
        scope: &ScreenScope,
        action: ScreenAction,
    ) {
        let status = controller
            .form_data()
            .get_str(fields::AUTO_CONVERT_STATUS)
            .unwrap_or("idle")
            .to_string();

        match (status.as_str(), action) {
            ("success", ScreenAction::Primary) => controller.advance(),
            ("converting", ScreenAction::Primary) => {}
            (_, ScreenAction::Primary) => {
                controller.update_form_data(
                    [
                        (fields::AUTO_CONVERT_STATUS, Value::from("converting")),
                        (fields::AUTO_CONVERT_CONSENT, Value::from("yes")),
                    ]
                    .into_iter()
                    .collect(),
                );
                controller.set_bottom_bar_content(Some(BottomBarContent::disabled("Converting...")));
                scope.track(AnalyticsEvent::new("auto_conversion_started"));

                scope.after(scope.latency().conversion(), |c| {
                    c.update_form_data(field(fields::AUTO_CONVERT_STATUS, "success"));
                    c.set_bottom_bar_content(Some(BottomBarContent::action("Continue")));
                });
            }
            (_, other) => default_action(controller, other),
        }
    }
}
