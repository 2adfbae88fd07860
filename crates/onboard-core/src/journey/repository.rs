//! Session persistence trait.

use crate::error::Result;
use crate::journey::form_data::FormData;
use crate::journey::journey_type::JourneyType;
use crate::step::StepId;

/// The serialized projection of a journey: what survives a reload.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedSession {
    pub journey_type: Option<JourneyType>,
    pub sequence: Vec<StepId>,
    pub position: usize,
    pub branch: Option<StepId>,
    pub form_data: FormData,
}

/// A partial state write. Only the fields that are `Some` are written.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionPatch<'a> {
    pub journey_type: Option<JourneyType>,
    pub sequence: Option<&'a [StepId]>,
    pub position: Option<usize>,
    /// `Some(None)` removes the stored branch.
    pub branch: Option<Option<StepId>>,
    pub form_data: Option<&'a FormData>,
}

impl<'a> SessionPatch<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn journey_type(mut self, journey_type: JourneyType) -> Self {
        self.journey_type = Some(journey_type);
        self
    }

    pub fn sequence(mut self, sequence: &'a [StepId]) -> Self {
        self.sequence = Some(sequence);
        self
    }

    pub fn position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    pub fn branch(mut self, branch: Option<StepId>) -> Self {
        self.branch = Some(branch);
        self
    }

    pub fn form_data(mut self, form_data: &'a FormData) -> Self {
        self.form_data = Some(form_data);
        self
    }

    /// A patch writing every field of `session`.
    pub fn full(session: &'a PersistedSession) -> Self {
        let mut patch = Self {
            journey_type: session.journey_type,
            ..Self::default()
        };
        patch.sequence = Some(&session.sequence);
        patch.position = Some(session.position);
        patch.branch = Some(session.branch);
        patch.form_data = Some(&session.form_data);
        patch
    }

    pub fn is_empty(&self) -> bool {
        self.journey_type.is_none()
            && self.sequence.is_none()
            && self.position.is_none()
            && self.branch.is_none()
            && self.form_data.is_none()
    }
}

/// Store for the journey session.
///
/// Writes are synchronous and per field; they are not transactional across
/// fields, so loaders must re-validate what they read.
pub trait SessionStore: Send + Sync {
    /// Writes the fields present in `patch`.
    fn save(&self, patch: SessionPatch<'_>) -> Result<()>;

    /// Loads the stored session.
    ///
    /// - `Ok(None)`: nothing (usable) is stored
    /// - `Ok(Some(_))`: a valid, migrated session
    /// - `Err(_)`: stored state is malformed or violates an invariant
    fn load_all(&self) -> Result<Option<PersistedSession>>;

    /// Removes every stored field.
    fn clear(&self) -> Result<()>;
}
