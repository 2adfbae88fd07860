//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs represent the versioned schema of persisted journey data.
//! They are private to the infrastructure layer and handle the evolution
//! of the storage format over time.
//!
//! ### JourneySteps Version History
//! - **1.0.0**: `{id, title}` records (legacy builds: unversioned bare array)
//! - **1.1.0**: Ids only; retired `kycDetails` / `nomineeDetails` removed

mod journey_steps;

// Re-export journey_steps DTOs and migrator
pub use journey_steps::{
    JOURNEY_STEPS_ENTITY, JourneyStepsDTO, JourneyStepsV1_0, JourneyStepsV1_1, StepRecordV1_0,
    StoredSequence, create_journey_steps_migrator, normalize_legacy_steps,
};
