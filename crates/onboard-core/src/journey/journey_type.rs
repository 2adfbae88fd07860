//! Journey types and the sequencer that maps them to ordered steps.

use serde::{Deserialize, Serialize};

use crate::step::{Step, StepId};

/// Top-level product variant a journey is classified as.
///
/// The wire names (`ntb`, `etb-nk`, `etb`, `journey2`) are what invites and
/// persisted state carry; the descriptive names are accepted as aliases.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum JourneyType {
    /// New to bank: full digital onboarding.
    #[default]
    #[serde(rename = "ntb", alias = "new-to-bank")]
    #[strum(to_string = "ntb", serialize = "new-to-bank")]
    NewToBank,
    /// Existing customer whose KYC is not on file.
    #[serde(rename = "etb-nk", alias = "existing-no-kyc")]
    #[strum(to_string = "etb-nk", serialize = "existing-no-kyc")]
    ExistingNoKyc,
    /// Existing, already verified customer: express conversion only.
    #[serde(rename = "etb", alias = "existing-express")]
    #[strum(to_string = "etb", serialize = "existing-express")]
    ExistingExpress,
    /// Pre-approved loan offer upsell.
    #[serde(rename = "journey2", alias = "loan-offer-upsell")]
    #[strum(to_string = "journey2", serialize = "loan-offer-upsell")]
    LoanOffer,
}

impl JourneyType {
    /// Ordered step ids for this journey type.
    pub fn step_ids(self) -> &'static [StepId] {
        step_ids_for(self)
    }

    /// Short description used by listings.
    pub fn label(self) -> &'static str {
        match self {
            JourneyType::NewToBank => "New to Bank",
            JourneyType::ExistingNoKyc => "Existing to Bank (no KYC)",
            JourneyType::ExistingExpress => "Existing to Bank (express)",
            JourneyType::LoanOffer => "Loan Offer",
        }
    }
}

const NEW_TO_BANK: &[StepId] = &[
    StepId::Welcome,
    StepId::KycChoice,
    StepId::EkycHandler,
    StepId::ProfileDetails,
    StepId::VideoKyc,
    StepId::ReviewApplication,
    StepId::Complete,
];

// No personal details, nominee or video KYC; digital vs physical KYC still applies.
const EXISTING_NO_KYC: &[StepId] = &[
    StepId::Welcome,
    StepId::KycChoice,
    StepId::EkycHandler,
    StepId::ReviewApplication,
    StepId::Complete,
];

// KYC already complete: consent to convert, then done.
const EXISTING_EXPRESS: &[StepId] = &[StepId::Welcome, StepId::AutoConversion, StepId::Complete];

const LOAN_OFFER: &[StepId] = &[
    StepId::Welcome,
    StepId::LoanOffer,
    StepId::ReviewApplication,
    StepId::Complete,
];

/// Prefix a journey is truncated to when the customer opts for physical KYC.
pub const PHYSICAL_KYC_PREFIX: &[StepId] = &[StepId::Welcome, StepId::KycChoice];

/// Returns the ordered step ids for a journey type.
///
/// This is the single source of truth for which screens exist in what order
/// for whom.
pub fn step_ids_for(journey_type: JourneyType) -> &'static [StepId] {
    match journey_type {
        JourneyType::NewToBank => NEW_TO_BANK,
        JourneyType::ExistingNoKyc => EXISTING_NO_KYC,
        JourneyType::ExistingExpress => EXISTING_EXPRESS,
        JourneyType::LoanOffer => LOAN_OFFER,
    }
}

/// Returns the ordered steps for a journey type.
pub fn sequence_for(journey_type: JourneyType) -> Vec<Step> {
    step_ids_for(journey_type)
        .iter()
        .map(|id| id.step())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::StepCatalog;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_sequence_is_non_empty_and_resolves() {
        for journey_type in JourneyType::iter() {
            let sequence = sequence_for(journey_type);
            assert!(!sequence.is_empty(), "{journey_type} has no steps");
            for step in sequence {
                assert!(StepCatalog::contains(&step.id.to_string()));
            }
        }
    }

    #[test]
    fn test_every_sequence_starts_at_welcome_and_ends_complete() {
        for journey_type in JourneyType::iter() {
            let ids = step_ids_for(journey_type);
            assert_eq!(ids.first(), Some(&StepId::Welcome));
            assert_eq!(ids.last(), Some(&StepId::Complete));
        }
    }

    #[test]
    fn test_express_journey_skips_kyc() {
        assert_eq!(
            step_ids_for(JourneyType::ExistingExpress),
            &[StepId::Welcome, StepId::AutoConversion, StepId::Complete]
        );
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(JourneyType::LoanOffer.to_string(), "journey2");
        assert_eq!("etb-nk".parse::<JourneyType>().unwrap(), JourneyType::ExistingNoKyc);
        assert_eq!(
            "existing-express".parse::<JourneyType>().unwrap(),
            JourneyType::ExistingExpress
        );
        assert!("unknown".parse::<JourneyType>().is_err());

        let json = serde_json::to_string(&JourneyType::NewToBank).unwrap();
        assert_eq!(json, "\"ntb\"");
        let parsed: JourneyType = serde_json::from_str("\"loan-offer-upsell\"").unwrap();
        assert_eq!(parsed, JourneyType::LoanOffer);
    }
}
