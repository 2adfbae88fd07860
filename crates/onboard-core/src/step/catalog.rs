//! Step definitions.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Stable identifier of a catalog step.
///
/// The wire form (serde and `Display`/`FromStr`) is the camelCase id used in
/// persisted sequences and routing, e.g. `StepId::KycChoice` <-> `"kycChoice"`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum StepId {
    JourneySelection,
    Welcome,
    KycChoice,
    EkycHandler,
    PhysicalKyc,
    ProfileDetails,
    AutoConversion,
    IncomeDetails,
    NomineeDetails,
    ReviewApplication,
    KycDetails,
    VideoKyc,
    AccountConversion,
    ProfessionalDetailsExpress,
    Complete,
    LoanOffer,
}

impl StepId {
    /// Human-readable label shown in steppers and sidebars.
    pub fn title(self) -> &'static str {
        match self {
            StepId::JourneySelection => "Select Journey",
            StepId::Welcome => "Verification",
            StepId::KycChoice => "Select KYC",
            StepId::EkycHandler => "e-KYC Verification",
            StepId::PhysicalKyc => "Physical KYC",
            StepId::ProfileDetails => "Your Profile",
            StepId::AutoConversion => "Account Conversion",
            StepId::IncomeDetails => "Income & Account",
            StepId::NomineeDetails => "Nominee Details",
            StepId::ReviewApplication => "Final Verification",
            StepId::KycDetails => "VKYC Consent",
            StepId::VideoKyc => "Video KYC",
            StepId::AccountConversion => "Verify Details",
            StepId::ProfessionalDetailsExpress => "Your Profile",
            StepId::Complete => "Submitted",
            StepId::LoanOffer => "Loan Offer",
        }
    }

    /// Returns the catalog entry for this id.
    pub fn step(self) -> Step {
        Step {
            id: self,
            title: self.title(),
        }
    }
}

/// A single screen/state of a journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Step {
    pub id: StepId,
    pub title: &'static str,
}

/// Static registry of all known steps.
pub struct StepCatalog;

impl StepCatalog {
    /// Resolves a wire id to its step.
    ///
    /// Absence means the caller referenced a step that does not exist; callers
    /// treat that as a routing bug (log and ignore), never as a crash.
    pub fn resolve(step_id: &str) -> Option<Step> {
        step_id.parse::<StepId>().ok().map(StepId::step)
    }

    /// Returns true if the wire id names a catalog step.
    pub fn contains(step_id: &str) -> bool {
        Self::resolve(step_id).is_some()
    }

    /// All catalog steps in declaration order.
    pub fn all() -> Vec<Step> {
        StepId::iter().map(StepId::step).collect()
    }
}
