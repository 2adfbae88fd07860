//! Screens: the step-specific behavior hosted by the journey runtime.
//!
//! A screen is entered once per activation and then receives user actions.
//! It talks to the journey only through the controller it is handed and
//! through the scope of its activation.

mod auto_conversion;
mod complete;
mod continue_screen;
mod ekyc;
mod kyc_choice;
mod registry;
mod welcome;

pub use auto_conversion::AutoConversionScreen;
pub use complete::CompleteScreen;
pub use continue_screen::ContinueScreen;
pub use ekyc::EkycHandlerScreen;
pub use kyc_choice::KycChoiceScreen;
pub use registry::ScreenRegistry;
pub use welcome::WelcomeScreen;

use onboard_core::journey::{FormData, JourneyController};

use crate::latency::ScreenScope;

/// Form-data keys owned by the built-in screens.
pub mod fields {
    pub const OTP_STATUS: &str = "otpStatus";
    pub const EKYC_STATUS: &str = "ekycStatus";
    pub const AADHAAR_NUMBER: &str = "aadhaarNumber";
    pub const AUTO_CONVERT_STATUS: &str = "autoConvertStatus";
    pub const AUTO_CONVERT_CONSENT: &str = "autoConvertConsent";
}

/// KYC path chosen on the KYC choice screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
pub enum KycMethod {
    #[strum(to_string = "ekyc", serialize = "digital")]
    Digital,
    #[strum(to_string = "physicalKyc", serialize = "physical")]
    Physical,
}

/// User input delivered to the active screen.
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenAction {
    /// The bottom bar's primary action.
    Primary,
    Back,
    SendOtp,
    SubmitOtp(String),
    ChooseKyc(KycMethod),
    /// Field edits; merged into the form data.
    Update(FormData),
    /// "Return to start" from the terminal screens.
    ReturnToStart,
}

/// Step-specific behavior.
pub trait Screen: Send + Sync {
    /// Called once each time the screen becomes active.
    fn on_enter(&self, controller: &mut JourneyController, scope: &ScreenScope);

    /// Handles a user action while the screen is active.
    fn on_action(
        &self,
        controller: &mut JourneyController,
        scope: &ScreenScope,
        action: ScreenAction,
    ) {
        let _ = scope;
        default_action(controller, action);
    }
}

/// Behavior shared by every screen for actions it does not handle itself.
pub fn default_action(controller: &mut JourneyController, action: ScreenAction) {
    match action {
        ScreenAction::Primary => controller.advance(),
        ScreenAction::Back => controller.retreat(),
        ScreenAction::Update(partial) => controller.update_form_data(partial),
        ScreenAction::ReturnToStart => controller.reset_all(),
        other => tracing::debug!(action = ?other, "[Screen] Action not handled by this screen"),
    }
}

/// True for a string of exactly `len` ASCII digits.
pub(crate) fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

/// Single-field form-data update.
pub(crate) fn field(key: &str, value: impl Into<serde_json::Value>) -> FormData {
    let mut partial = FormData::new();
    partial.set(key, value);
    partial
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kyc_method_names() {
        assert_eq!(KycMethod::Digital.to_string(), "ekyc");
        assert_eq!("physical".parse::<KycMethod>().unwrap(), KycMethod::Physical);
        assert_eq!("physicalKyc".parse::<KycMethod>().unwrap(), KycMethod::Physical);
    }

    #[test]
    fn test_is_digits() {
        assert!(is_digits("123456", 6));
        assert!(!is_digits("12345a", 6));
        assert!(!is_digits("1234567", 6));
    }
}
