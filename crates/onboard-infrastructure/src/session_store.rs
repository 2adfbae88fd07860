//! Key-prefixed session store over a [`KeyValueStorage`].
//!
//! Each field of the journey lives under its own key (`<prefix>journeyType`,
//! `<prefix>journeySteps`, `<prefix>stepIndex`, `<prefix>branchStepId`,
//! `<prefix>formData`). The step sequence is a versioned document; every
//! load migrates it and re-validates the position against the result.

use std::sync::Arc;

use serde_json::Value;

use onboard_core::journey::{FormData, JourneyType, PersistedSession, SessionPatch, SessionStore};
use onboard_core::step::StepId;
use onboard_core::{JourneyError, Result};

use crate::dto::{
    JOURNEY_STEPS_ENTITY, StoredSequence, create_journey_steps_migrator, normalize_legacy_steps,
};
use crate::storage::KeyValueStorage;

pub const JOURNEY_TYPE_KEY: &str = "journeyType";
pub const JOURNEY_STEPS_KEY: &str = "journeySteps";
pub const STEP_INDEX_KEY: &str = "stepIndex";
pub const BRANCH_STEP_KEY: &str = "branchStepId";
pub const FORM_DATA_KEY: &str = "formData";

/// Session store mirroring journey state into flat, prefixed keys.
pub struct LocalStorageSessionStore {
    storage: Arc<dyn KeyValueStorage>,
    prefix: String,
    migrator: version_migrate::Migrator,
}

impl LocalStorageSessionStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>, prefix: impl Into<String>) -> Self {
        Self {
            storage,
            prefix: prefix.into(),
            migrator: create_journey_steps_migrator(),
        }
    }

    fn key(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }

    fn get(&self, name: &str) -> Result<Option<String>> {
        self.storage.get_item(&self.key(name))
    }

    fn set(&self, name: &str, value: &str) -> Result<()> {
        self.storage.set_item(&self.key(name), value)
    }

    fn serialize_sequence(&self, steps: &[StepId]) -> Result<String> {
        Ok(self
            .migrator
            .save_domain_flat(JOURNEY_STEPS_ENTITY, StoredSequence::new(steps.to_vec()))?)
    }

    /// Parses and migrates the stored sequence.
    ///
    /// Returns the surviving steps, the stored ids in their original order
    /// and the raw document.
    fn load_sequence(&self, raw: &str) -> Result<(Vec<StepId>, Vec<String>, Value)> {
        let original: Value = serde_json::from_str(raw)?;
        let normalized = normalize_legacy_steps(original.clone());
        let stored_ids = stored_step_ids(&normalized);

        let sequence: StoredSequence = self
            .migrator
            .load_flat_from(JOURNEY_STEPS_ENTITY, normalized)?;

        Ok((sequence.steps, stored_ids, original))
    }
}

/// Ids in a normalized journeySteps document, whatever the record shape.
fn stored_step_ids(document: &Value) -> Vec<String> {
    document
        .get("steps")
        .and_then(Value::as_array)
        .map(|steps| {
            steps
                .iter()
                .filter_map(|step| match step {
                    Value::String(id) => Some(id.clone()),
                    Value::Object(record) => {
                        record.get("id").and_then(Value::as_str).map(str::to_string)
                    }
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Maps a position in the stored ids onto the migrated sequence: the index of
/// the first surviving step at or after `position`.
fn remap_position(stored_ids: &[String], surviving: &[StepId], position: usize) -> Option<usize> {
    let mut survivors_before = 0;
    for (index, id) in stored_ids.iter().enumerate() {
        if index >= position {
            break;
        }
        if surviving
            .get(survivors_before)
            .is_some_and(|step| step.as_ref() == id)
        {
            survivors_before += 1;
        }
    }
    (survivors_before < surviving.len()).then_some(survivors_before)
}

impl SessionStore for LocalStorageSessionStore {
    fn save(&self, patch: SessionPatch<'_>) -> Result<()> {
        if let Some(journey_type) = patch.journey_type {
            self.set(JOURNEY_TYPE_KEY, &journey_type.to_string())?;
        }
        if let Some(sequence) = patch.sequence {
            let serialized = self.serialize_sequence(sequence)?;
            self.set(JOURNEY_STEPS_KEY, &serialized)?;
        }
        if let Some(position) = patch.position {
            self.set(STEP_INDEX_KEY, &position.to_string())?;
        }
        match patch.branch {
            Some(Some(step)) => self.set(BRANCH_STEP_KEY, step.as_ref())?,
            Some(None) => self.storage.remove_item(&self.key(BRANCH_STEP_KEY))?,
            None => {}
        }
        if let Some(form_data) = patch.form_data {
            self.set(FORM_DATA_KEY, &serde_json::to_string(form_data)?)?;
        }
        Ok(())
    }

    fn load_all(&self) -> Result<Option<PersistedSession>> {
        let (Some(raw_steps), Some(raw_index)) =
            (self.get(JOURNEY_STEPS_KEY)?, self.get(STEP_INDEX_KEY)?)
        else {
            return Ok(None);
        };

        let journey_type = match self.get(JOURNEY_TYPE_KEY)? {
            Some(raw) => Some(raw.parse::<JourneyType>().map_err(|_| {
                JourneyError::invalid_state(format!("unknown journey type '{}'", raw))
            })?),
            None => None,
        };

        let stored_position = raw_index.trim().parse::<usize>().map_err(|_| {
            JourneyError::invalid_state(format!("unparsable step index '{}'", raw_index))
        })?;

        let (sequence, stored_ids, original) = self.load_sequence(&raw_steps)?;
        if sequence.is_empty() {
            return Err(JourneyError::invalid_state("stored sequence is empty"));
        }

        let position = remap_position(&stored_ids, &sequence, stored_position).ok_or_else(|| {
            JourneyError::invalid_state(format!(
                "step index {} has no surviving step",
                stored_position
            ))
        })?;

        let branch = match self.get(BRANCH_STEP_KEY)? {
            Some(raw) => match raw.parse::<StepId>() {
                Ok(step) if !sequence.contains(&step) => Some(step),
                _ => {
                    tracing::debug!(branch = %raw, "[Persistence] Ignoring stored branch");
                    None
                }
            },
            None => None,
        };

        let form_data = match self.get(FORM_DATA_KEY)? {
            Some(raw) => serde_json::from_str::<FormData>(&raw)?,
            None => FormData::new(),
        };

        // Write the migrated form back so the next load is a plain read
        let latest = self.serialize_sequence(&sequence)?;
        if serde_json::from_str::<Value>(&latest)? != original {
            tracing::info!(
                steps = sequence.len(),
                "[Persistence] Migrated stored step sequence"
            );
            self.set(JOURNEY_STEPS_KEY, &latest)?;
        }
        if position != stored_position {
            self.set(STEP_INDEX_KEY, &position.to_string())?;
        }

        Ok(Some(PersistedSession {
            journey_type,
            sequence,
            position,
            branch,
            form_data,
        }))
    }

    fn clear(&self) -> Result<()> {
        self.storage.remove_prefixed(&self.prefix)?;
        tracing::debug!(prefix = %self.prefix, "[Persistence] Cleared stored session");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use onboard_core::journey::step_ids_for;
    use serde_json::json;

    const PREFIX: &str = "hdfcJourney_";

    fn store() -> (LocalStorageSessionStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        (LocalStorageSessionStore::new(storage.clone(), PREFIX), storage)
    }

    fn session() -> PersistedSession {
        PersistedSession {
            journey_type: Some(JourneyType::NewToBank),
            sequence: step_ids_for(JourneyType::NewToBank).to_vec(),
            position: 3,
            branch: Some(StepId::PhysicalKyc),
            form_data: [("pan", json!("ABCDE1234F"))].into_iter().collect(),
        }
    }

    #[test]
    fn test_absent_state_loads_none() {
        let (store, storage) = store();
        assert!(store.load_all().unwrap().is_none());

        // Sequence without an index is still absent
        storage
            .set_item("hdfcJourney_journeySteps", r#"{"version":"1.1.0","steps":["welcome"]}"#)
            .unwrap();
        assert!(store.load_all().unwrap().is_none());
    }

    #[test]
    fn test_full_save_then_load() {
        let (store, storage) = store();
        let session = session();
        store.save(SessionPatch::full(&session)).unwrap();

        assert_eq!(store.load_all().unwrap(), Some(session));
        assert_eq!(
            storage.get_item("hdfcJourney_journeyType").unwrap().as_deref(),
            Some("ntb")
        );
        assert_eq!(
            storage.get_item("hdfcJourney_stepIndex").unwrap().as_deref(),
            Some("3")
        );
        assert_eq!(
            storage.get_item("hdfcJourney_branchStepId").unwrap().as_deref(),
            Some("physicalKyc")
        );
    }

    #[test]
    fn test_branch_none_removes_key() {
        let (store, storage) = store();
        store.save(SessionPatch::full(&session())).unwrap();
        store.save(SessionPatch::new().branch(None)).unwrap();
        assert!(storage.get_item("hdfcJourney_branchStepId").unwrap().is_none());
    }

    #[test]
    fn test_legacy_sequence_is_migrated_and_remapped() {
        let (store, storage) = store();
        let legacy = json!([
            {"id": "welcome", "title": "Welcome"},
            {"id": "kycChoice", "title": "KYC Choice"},
            {"id": "kycDetails", "title": "KYC Details"},
            {"id": "nomineeDetails", "title": "Nominee Details"},
            {"id": "reviewApplication", "title": "Review Application"},
            {"id": "complete", "title": "Complete"}
        ]);
        storage
            .set_item("hdfcJourney_journeySteps", &legacy.to_string())
            .unwrap();
        storage.set_item("hdfcJourney_stepIndex", "2").unwrap();
        storage.set_item("hdfcJourney_journeyType", "etb-nk").unwrap();

        let loaded = store.load_all().unwrap().unwrap();
        assert_eq!(
            loaded.sequence,
            vec![
                StepId::Welcome,
                StepId::KycChoice,
                StepId::ReviewApplication,
                StepId::Complete
            ]
        );
        // Index 2 pointed at kycDetails; the next survivor is reviewApplication
        assert_eq!(loaded.position, 2);
        assert_eq!(loaded.journey_type, Some(JourneyType::ExistingNoKyc));

        let rewritten = storage.get_item("hdfcJourney_journeySteps").unwrap().unwrap();
        assert!(rewritten.contains("\"version\":\"1.1.0\""));
    }

    #[test]
    fn test_position_past_all_survivors_is_invalid() {
        let (store, storage) = store();
        storage
            .set_item(
                "hdfcJourney_journeySteps",
                r#"{"version":"1.1.0","steps":["welcome","retiredStep"]}"#,
            )
            .unwrap();
        storage.set_item("hdfcJourney_stepIndex", "1").unwrap();

        assert!(store.load_all().unwrap_err().is_invalid_state());
    }

    #[test]
    fn test_malformed_state_is_invalid() {
        let (store, storage) = store();
        storage.set_item("hdfcJourney_journeySteps", "{oops").unwrap();
        storage.set_item("hdfcJourney_stepIndex", "0").unwrap();
        assert!(store.load_all().is_err());

        storage
            .set_item("hdfcJourney_journeySteps", r#"{"version":"1.1.0","steps":[]}"#)
            .unwrap();
        assert!(store.load_all().unwrap_err().is_invalid_state());

        storage
            .set_item("hdfcJourney_journeySteps", r#"{"version":"1.1.0","steps":["welcome"]}"#)
            .unwrap();
        storage.set_item("hdfcJourney_stepIndex", "first").unwrap();
        assert!(store.load_all().unwrap_err().is_invalid_state());

        storage.set_item("hdfcJourney_stepIndex", "0").unwrap();
        storage.set_item("hdfcJourney_journeyType", "premium").unwrap();
        assert!(store.load_all().unwrap_err().is_invalid_state());
    }

    #[test]
    fn test_branch_in_sequence_is_ignored() {
        let (store, storage) = store();
        let mut session = session();
        session.branch = None;
        store.save(SessionPatch::full(&session)).unwrap();
        storage.set_item("hdfcJourney_branchStepId", "kycChoice").unwrap();

        assert_eq!(store.load_all().unwrap().unwrap().branch, None);
    }

    #[test]
    fn test_clear_only_touches_prefixed_keys() {
        let (store, storage) = store();
        store.save(SessionPatch::full(&session())).unwrap();
        storage.set_item("anonymous_user_id", "user_1").unwrap();

        store.clear().unwrap();

        assert!(store.load_all().unwrap().is_none());
        assert_eq!(storage.keys().unwrap(), vec!["anonymous_user_id".to_string()]);
    }

    #[test]
    fn test_remap_position() {
        let stored: Vec<String> = ["welcome", "gone", "complete"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let surviving = [StepId::Welcome, StepId::Complete];
        assert_eq!(remap_position(&stored, &surviving, 0), Some(0));
        assert_eq!(remap_position(&stored, &surviving, 1), Some(1));
        assert_eq!(remap_position(&stored, &surviving, 2), Some(1));
        assert_eq!(remap_position(&stored, &surviving, 3), None);
    }
}
