//! Persisted step-sequence DTOs and migrations.
//!
//! ## Version History
//! - **1.0.0**: Array of `{id, title}` records. Early builds stored this as a
//!   bare JSON array with no version field.
//! - **1.1.0**: Ids only. The retired linear steps `kycDetails` and
//!   `nomineeDetails` are dropped on migration.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use version_migrate::{FromDomain, IntoDomain, Versioned};

use onboard_core::step::{StepCatalog, StepId};

/// Entity name the sequence is registered under.
pub const JOURNEY_STEPS_ENTITY: &str = "journey_steps";

/// Step ids that used to be part of linear sequences and no longer are.
const RETIRED_STEP_IDS: [&str; 2] = ["kycDetails", "nomineeDetails"];

/// Step sequence as the engine sees it after loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StoredSequence {
    pub steps: Vec<StepId>,
}

impl StoredSequence {
    pub fn new(steps: Vec<StepId>) -> Self {
        Self { steps }
    }
}

// ============================================================================
// DTOs
// ============================================================================

/// A step record as written by 1.0.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecordV1_0 {
    pub id: String,
    #[serde(default)]
    pub title: String,
}

/// Journey steps V1.0.0: full step records.
#[derive(Debug, Clone, Serialize, Deserialize, Versioned, Default)]
#[versioned(version = "1.0.0")]
pub struct JourneyStepsV1_0 {
    pub steps: Vec<StepRecordV1_0>,
}

/// Journey steps V1.1.0: ids only.
#[derive(Debug, Clone, Serialize, Deserialize, Versioned, Default)]
#[versioned(version = "1.1.0")]
pub struct JourneyStepsV1_1 {
    pub steps: Vec<String>,
}

/// Type alias for the latest JourneySteps version.
pub type JourneyStepsDTO = JourneyStepsV1_1;

// ============================================================================
// Migration implementations
// ============================================================================

/// Migration from JourneyStepsV1_0 to JourneyStepsV1_1.
/// Keeps ids, drops titles and the retired linear steps.
impl version_migrate::MigratesTo<JourneyStepsV1_1> for JourneyStepsV1_0 {
    fn migrate(self) -> JourneyStepsV1_1 {
        JourneyStepsV1_1 {
            steps: self
                .steps
                .into_iter()
                .map(|record| record.id)
                .filter(|id| !RETIRED_STEP_IDS.contains(&id.as_str()))
                .collect(),
        }
    }
}

// ============================================================================
// Domain model conversions
// ============================================================================

/// Ids that no longer resolve in the step catalog are dropped.
impl IntoDomain<StoredSequence> for JourneyStepsV1_1 {
    fn into_domain(self) -> StoredSequence {
        let steps = self
            .steps
            .iter()
            .filter_map(|id| match StepCatalog::resolve(id) {
                Some(step) => Some(step.id),
                None => {
                    tracing::warn!(step_id = %id, "[Persistence] Dropping unknown stored step");
                    None
                }
            })
            .collect();
        StoredSequence { steps }
    }
}

impl FromDomain<StoredSequence> for JourneyStepsV1_1 {
    fn from_domain(sequence: StoredSequence) -> Self {
        JourneyStepsV1_1 {
            steps: sequence.steps.iter().map(|id| id.to_string()).collect(),
        }
    }
}

// ============================================================================
// Legacy format
// ============================================================================

/// Wraps the unversioned bare-array form into a flat 1.0.0 document.
///
/// Anything else is returned unchanged.
pub fn normalize_legacy_steps(value: Value) -> Value {
    match value {
        Value::Array(records) => serde_json::json!({
            "version": "1.0.0",
            "steps": records,
        }),
        other => other,
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates and configures a Migrator instance for persisted step sequences.
///
/// # Migration Path
///
/// - V1.0 → V1.1: Drops titles and retired steps
/// - V1.1 → StoredSequence: Resolves ids against the step catalog
///
/// # Example
///
/// ```ignore
/// let migrator = create_journey_steps_migrator();
/// let sequence: StoredSequence = migrator.load_flat_from(JOURNEY_STEPS_ENTITY, json_value)?;
/// ```
pub fn create_journey_steps_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();

    // Register migration path: V1.0 -> V1.1 -> StoredSequence
    let steps_path = version_migrate::Migrator::define(JOURNEY_STEPS_ENTITY)
        .from::<JourneyStepsV1_0>()
        .step::<JourneyStepsV1_1>()
        .into_with_save::<StoredSequence>();

    migrator
        .register(steps_path)
        .expect("Failed to register journey_steps migration path");

    migrator
}
