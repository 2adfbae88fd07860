//! Aadhaar eKYC with a mock OTP and simulated verification.

use onboard_core::analytics::AnalyticsEvent;
use onboard_core::journey::{BottomBarContent, JourneyController};

use super::{Screen, ScreenAction, default_action, field, fields, is_digits};
use crate::latency::ScreenScope;

pub struct EkycHandlerScreen;

impl EkycHandlerScreen {
    fn send_otp(&self, controller: &mut JourneyController, scope: &ScreenScope) {
        let aadhaar = controller
            .form_data()
            .get_str(fields::AADHAAR_NUMBER)
            .unwrap_or_default();
        if !is_digits(aadhaar, 12) {
            controller.set_bottom_bar_content(Some(
                BottomBarContent::disabled("Send OTP").with_hint("Enter your 12-digit Aadhaar number"),
            ));
            return;
        }
        if controller.form_data().get_bool("ekycUidaiConsent") != Some(true) {
            controller.set_bottom_bar_content(Some(
                BottomBarContent::disabled("Send OTP").with_hint("Accept the UIDAI consent"),
            ));
            return;
        }

        controller.update_form_data(field(fields::EKYC_STATUS, "sending"));
        controller.set_bottom_bar_content(Some(BottomBarContent::disabled("Sending OTP...")));

        scope.after(scope.latency().otp_send(), |c| {
            c.update_form_data(field(fields::EKYC_STATUS, "sent"));
            c.set_bottom_bar_content(Some(
                BottomBarContent::disabled("Verify").with_hint("Enter the OTP sent to your Aadhaar mobile"),
            ));
        });
    }

    fn verify(&self, controller: &mut JourneyController, scope: &ScreenScope, otp: &str) {
        if !is_digits(otp, 6) {
            return;
        }

        controller.update_form_data(field(fields::EKYC_STATUS, "verifying"));
        controller.set_bottom_bar_content(Some(BottomBarContent::disabled("Verifying...")));
        scope.track(AnalyticsEvent::new("ekyc_otp_verified"));

        scope.after(scope.latency().kyc_verify(), |c| {
            c.update_form_data(field(fields::EKYC_STATUS, "verified"));
            c.advance();
        });
    }
}

impl Screen for EkycHandlerScreen {
    fn on_enter(&self, controller: &mut JourneyController, scope: &ScreenScope) {
        scope.track(AnalyticsEvent::new("page_viewed").with("page", "ekyc_handler"));
        controller.update_form_data(field(fields::EKYC_STATUS, "idle"));
        controller.set_bottom_bar_content(Some(BottomBarContent::action("Send OTP")));
    }

    fn on_action(
        &self,
        controller: &mut JourneyController,
        scope: &ScreenScope,
        action: ScreenAction,
    ) {
        let status = controller
            .form_data()
            .get_str(fields::EKYC_STATUS)
            .unwrap_or("idle")
            .to_string();

        match (status.as_str(), action) {
            ("idle", ScreenAction::Primary | ScreenAction::SendOtp) => {
                self.send_otp(controller, scope)
            }
            ("sent", ScreenAction::SubmitOtp(otp)) => self.verify(controller, scope, &otp),
            (_, ScreenAction::Primary | ScreenAction::SendOtp | ScreenAction::SubmitOtp(_)) => {
                tracing::debug!(status = %status, "[Screen] eKYC action ignored");
            }
            (_, other) => default_action(controller, other),
        }
    }
}
