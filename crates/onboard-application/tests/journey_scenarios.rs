use std::sync::Arc;

use onboard_application::{BootRequest, BootSource, Bootstrapper};
use onboard_core::analytics::NoopAnalytics;
use onboard_core::config::EngineConfig;
use onboard_core::invite::{Employee, InvitePayload, TOKEN_PREFIX};
use onboard_core::journey::{FormData, JourneyController, JourneyType, step_ids_for};
use onboard_core::step::StepId;
use onboard_infrastructure::{
    Base64InviteCodec, InMemoryInviteStore, JsonFileStorage, KeyValueStorage,
    LocalStorageSessionStore, create_invite_token, parse_invite_token,
};
use tempfile::TempDir;

const PREFIX: &str = "hdfcJourney_";

fn file_store(dir: &TempDir) -> (Arc<JsonFileStorage>, Arc<LocalStorageSessionStore>) {
    let storage = Arc::new(JsonFileStorage::new(dir.path().join("journey-state.json")));
    let store = Arc::new(LocalStorageSessionStore::new(storage.clone(), PREFIX));
    (storage, store)
}

fn bootstrapper(store: Arc<LocalStorageSessionStore>) -> Bootstrapper {
    Bootstrapper::new(
        store,
        Arc::new(InMemoryInviteStore::new()),
        Arc::new(Base64InviteCodec),
        Arc::new(NoopAnalytics),
        EngineConfig::default(),
    )
}

#[test]
fn test_express_journey_reaches_complete() {
    let temp_dir = TempDir::new().unwrap();
    let (_, store) = file_store(&temp_dir);
    let mut controller = JourneyController::new(store, &EngineConfig::default());

    controller.select_journey_type(JourneyType::ExistingExpress);
    assert_eq!(
        controller.sequence(),
        &[StepId::Welcome, StepId::AutoConversion, StepId::Complete]
    );

    controller.advance();
    controller.advance();
    assert_eq!(controller.position(), 2);
    assert_eq!(controller.current_step().unwrap().id, StepId::Complete);
    assert!(controller.is_last_step());
}

#[test]
fn test_physical_kyc_truncation_and_restore() {
    let temp_dir = TempDir::new().unwrap();
    let (_, store) = file_store(&temp_dir);
    let mut controller = JourneyController::new(store, &EngineConfig::default());
    controller.select_journey_type(JourneyType::NewToBank);
    controller.jump_to(StepId::KycChoice);

    controller
        .truncate_to(vec![StepId::Welcome, StepId::KycChoice])
        .unwrap();
    controller.advance();
    assert_eq!(controller.position(), 1);
    assert_eq!(controller.sequence().len(), 2);

    controller.restore_full_sequence();
    assert_eq!(controller.sequence(), step_ids_for(JourneyType::NewToBank));
    assert_eq!(controller.current_step().unwrap().id, StepId::EkycHandler);
}

#[test]
fn test_loan_offer_token_round_trip() {
    let employee = Employee {
        id: "EMP-20419".to_string(),
        name: "Meera Iyer".to_string(),
        email: "meera.iyer@example.com".to_string(),
        phone: None,
    };
    let payload = InvitePayload::new("inv-loan-1", JourneyType::LoanOffer, employee, FormData::new());

    let token = create_invite_token(&payload).unwrap();
    assert!(token.starts_with(TOKEN_PREFIX));

    let decoded = parse_invite_token(&token).expect("token should decode");
    assert_eq!(decoded.journey_type, JourneyType::LoanOffer);
    assert_eq!(decoded.employee.id, "EMP-20419");
}

#[tokio::test]
async fn test_resume_survives_restart() {
    let temp_dir = TempDir::new().unwrap();

    // First run: progress to the profile step
    {
        let (_, store) = file_store(&temp_dir);
        let mut controller = JourneyController::new(store, &EngineConfig::default());
        controller.select_journey_type(JourneyType::NewToBank);
        controller.advance();
        controller.advance();
        controller.advance();
        assert_eq!(controller.current_step().unwrap().id, StepId::ProfileDetails);
    }

    // Second run against the same file
    let (_, store) = file_store(&temp_dir);
    let outcome = bootstrapper(store)
        .boot(BootRequest {
            route_param: None,
            resume: true,
        })
        .await;
    assert_eq!(outcome.source, BootSource::Persisted);

    let mut controller = outcome.controller;
    assert_eq!(controller.position(), 0);
    assert!(controller.is_resume_pending());

    controller.advance();
    assert_eq!(controller.current_step().unwrap().id, StepId::ProfileDetails);

    // The resume jump is one-time
    controller.advance();
    assert_eq!(controller.current_step().unwrap().id, StepId::VideoKyc);
}

#[tokio::test]
async fn test_legacy_step_records_are_migrated() {
    let temp_dir = TempDir::new().unwrap();
    let (storage, store) = file_store(&temp_dir);

    // Bare array of step records, including a retired step
    let legacy = r#"[
        {"id": "welcome", "title": "Verification"},
        {"id": "kycChoice", "title": "Select KYC"},
        {"id": "kycDetails", "title": "VKYC Consent"},
        {"id": "ekycHandler", "title": "e-KYC Verification"},
        {"id": "complete", "title": "Submitted"}
    ]"#;
    storage.set_item("hdfcJourney_journeyType", "etb-nk").unwrap();
    storage.set_item("hdfcJourney_journeySteps", legacy).unwrap();
    storage.set_item("hdfcJourney_stepIndex", "3").unwrap();

    let outcome = bootstrapper(store).boot(BootRequest::default()).await;
    assert_eq!(outcome.source, BootSource::Persisted);

    let controller = outcome.controller;
    assert_eq!(
        controller.sequence(),
        &[
            StepId::Welcome,
            StepId::KycChoice,
            StepId::EkycHandler,
            StepId::Complete
        ]
    );
    assert_eq!(controller.current_step().unwrap().id, StepId::EkycHandler);

    // The migrated form was written back
    let stored = storage.get_item("hdfcJourney_journeySteps").unwrap().unwrap();
    assert!(!stored.contains("kycDetails"));
    assert_eq!(
        storage.get_item("hdfcJourney_stepIndex").unwrap().as_deref(),
        Some("2")
    );
}

#[tokio::test]
async fn test_corrupt_state_file_recovers_after_reset() {
    let temp_dir = TempDir::new().unwrap();
    let state_path = temp_dir.path().join("journey-state.json");
    std::fs::write(&state_path, "{garbage").unwrap();

    // First boot sees the unreadable file and resets
    let (_, store) = file_store(&temp_dir);
    let outcome = bootstrapper(store).boot(BootRequest::default()).await;
    assert_eq!(outcome.source, BootSource::Reset);
    assert_ne!(std::fs::read_to_string(&state_path).unwrap(), "{garbage");

    let mut controller = outcome.controller;
    controller.select_journey_type(JourneyType::LoanOffer);
    controller.advance();

    // Second boot restores what the first one wrote
    let (_, store) = file_store(&temp_dir);
    let outcome = bootstrapper(store).boot(BootRequest::default()).await;
    assert_eq!(outcome.source, BootSource::Persisted);
    assert_eq!(outcome.controller.journey_type(), Some(JourneyType::LoanOffer));
    assert_eq!(outcome.controller.position(), 1);
}
