//! Welcome screen: mobile number, DOB and PAN, confirmed by a mock OTP.

use onboard_core::analytics::AnalyticsEvent;
use onboard_core::journey::{BottomBarContent, JourneyController, keys};

use super::{Screen, ScreenAction, default_action, field, fields, is_digits};
use crate::latency::ScreenScope;

/// OTP every mock send delivers.
pub const DEMO_OTP: &str = "481230";

pub struct WelcomeScreen;

impl WelcomeScreen {
    fn request_otp(&self, controller: &mut JourneyController, scope: &ScreenScope) {
        if let Some(problem) = validate(controller) {
            controller.set_bottom_bar_content(Some(
                BottomBarContent::action("Request OTP").with_hint(problem),
            ));
            return;
        }

        controller.update_form_data(field(fields::OTP_STATUS, "sending"));
        controller.set_bottom_bar_content(Some(BottomBarContent::disabled("Sending OTP...")));

        scope.after(scope.latency().otp_send(), |c| {
            c.update_form_data(field(fields::OTP_STATUS, "sent"));
            c.add_notification("HDFC Bank", format!("Your OTP is: {}", DEMO_OTP));
            c.set_bottom_bar_content(Some(
                BottomBarContent::disabled("Verify & Continue").with_hint("Enter the 6-digit OTP"),
            ));
        });
    }

    fn verify_otp(&self, controller: &mut JourneyController, scope: &ScreenScope, otp: &str) {
        if !is_digits(otp, 6) {
            controller.set_bottom_bar_content(Some(
                BottomBarContent::disabled("Verify & Continue").with_hint("Enter the 6-digit OTP"),
            ));
            return;
        }

        controller.update_form_data(field(fields::OTP_STATUS, "verifying"));
        controller.set_bottom_bar_content(Some(BottomBarContent::disabled("Verifying...")));
        scope.track(AnalyticsEvent::new("otp_verified"));

        scope.after(scope.latency().otp_verify(), |c| {
            c.update_form_data(field(fields::OTP_STATUS, "verified"));
            c.advance();
        });
    }
}

/// First problem with the entered identity details, if any.
fn validate(controller: &JourneyController) -> Option<&'static str> {
    let form = controller.form_data();

    let mobile = form.get_str(keys::MOBILE_NUMBER).unwrap_or_default();
    let mobile_ok = is_digits(mobile, 10) && mobile.starts_with(['6', '7', '8', '9']);
    if !mobile_ok {
        return Some("Please enter a valid 10-digit mobile number starting with 6-9");
    }

    if form.get_str("dob").is_none_or(str::is_empty) {
        return Some("Please provide your date of birth");
    }

    let pan = form.get_str("pan").unwrap_or_default().as_bytes();
    let pan_ok = pan.len() == 10
        && pan[..5].iter().all(u8::is_ascii_uppercase)
        && pan[5..9].iter().all(u8::is_ascii_digit)
        && pan[9].is_ascii_uppercase();
    if !pan_ok {
        return Some("Please enter a valid PAN number (e.g. ABCDE1234F)");
    }

    None
}

impl Screen for WelcomeScreen {
    fn on_enter(&self, controller: &mut JourneyController, scope: &ScreenScope) {
        scope.track(AnalyticsEvent::new("page_viewed").with("page", "welcome"));
        controller.update_form_data(field(fields::OTP_STATUS, "idle"));
        controller.set_bottom_bar_content(Some(BottomBarContent::action("Request OTP")));
    }

    fn on_action(
        &self,
        controller: &mut JourneyController,
        scope: &ScreenScope,
        action: ScreenAction,
    ) {
        let status = controller
            .form_data()
            .get_str(fields::OTP_STATUS)
            .unwrap_or("idle")
            .to_string();

        match (status.as_str(), action) {
            ("idle", ScreenAction::Primary | ScreenAction::SendOtp) => {
                self.request_otp(controller, scope)
            }
            ("sent", ScreenAction::SubmitOtp(otp)) => self.verify_otp(controller, scope, &otp),
            ("sent", ScreenAction::Primary) => {
                controller.set_bottom_bar_content(Some(
                    BottomBarContent::disabled("Verify & Continue")
                        .with_hint("Enter the 6-digit OTP"),
                ));
            }
            // A request is in flight
            ("sending" | "verifying", ScreenAction::Primary | ScreenAction::SendOtp) => {}
            (_, other @ (ScreenAction::Update(_) | ScreenAction::Back | ScreenAction::ReturnToStart)) => {
                default_action(controller, other)
            }
            (status, other) => {
                tracing::debug!(status, action = ?other, "[Screen] Welcome action ignored");
            }
        }
    }
}
