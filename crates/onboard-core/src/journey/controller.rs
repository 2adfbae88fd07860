//! The journey controller: the state machine behind the onboarding wizard.
//!
//! The controller's state is the tuple (journey type, step sequence, active
//! screen, form data) plus two transient slots (bottom bar, error notice).
//! There is no named-state enum; transitions are the public operations
//! below. Every operation runs to completion synchronously and mirrors the
//! fields it changed into the [`SessionStore`], which only the controller
//! writes to.
//!
//! Persistence is best-effort: a failed write is logged and the in-memory
//! state stays authoritative for the running session.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::{JourneyError, Result};
use crate::journey::form_data::{FormData, keys};
use crate::journey::journey_type::{JourneyType, PHYSICAL_KYC_PREFIX, step_ids_for};
use crate::journey::repository::{PersistedSession, SessionPatch, SessionStore};
use crate::journey::screen::{ActiveScreen, BottomBarContent, ErrorNotice, Notification};
use crate::step::{Step, StepCatalog, StepId};

/// Stateful controller for one onboarding journey.
pub struct JourneyController {
    store: Arc<dyn SessionStore>,
    default_journey: JourneyType,
    restore_anchor: StepId,

    journey_type: Option<JourneyType>,
    sequence: Vec<StepId>,
    screen: ActiveScreen,
    form_data: FormData,

    bottom_bar: Option<BottomBarContent>,
    /// Stored position to jump to on the first `advance()` after a resume.
    resume_target: Option<usize>,
    error: Option<ErrorNotice>,
    notifications: Vec<Notification>,
}

impl JourneyController {
    /// Creates a cold-started controller: default journey, position 0,
    /// demo form data. Nothing is written until the first transition.
    pub fn new(store: Arc<dyn SessionStore>, config: &EngineConfig) -> Self {
        let default_journey = config.default_journey;
        Self {
            store,
            default_journey,
            restore_anchor: config.restore_anchor,
            journey_type: Some(default_journey),
            sequence: step_ids_for(default_journey).to_vec(),
            screen: ActiveScreen::InSequence(0),
            form_data: FormData::demo_defaults(),
            bottom_bar: None,
            resume_target: None,
            error: None,
            notifications: vec![Notification::new(
                "Welcome",
                "Start your premium salary account journey now.",
            )],
        }
    }

    /// Restores a controller from a persisted session.
    ///
    /// With `resume` set and a stored position past the first step, the
    /// journey is presented at position 0 and the stored position becomes the
    /// one-time target of the next [`advance`](Self::advance).
    pub fn restore(
        store: Arc<dyn SessionStore>,
        config: &EngineConfig,
        session: PersistedSession,
        resume: bool,
    ) -> Result<Self> {
        if session.sequence.is_empty() {
            return Err(JourneyError::invalid_state(
                "persisted sequence is empty",
            ));
        }

        let last = session.sequence.len() - 1;
        let position = session.position.min(last);
        if position != session.position {
            tracing::warn!(
                "[Journey] Clamped stored position {} to {}",
                session.position,
                position
            );
        }

        let mut controller = Self::new(store, config);
        controller.journey_type = session.journey_type;
        controller.sequence = session.sequence;
        controller.form_data = session.form_data;

        if resume && position > 0 {
            controller.screen = ActiveScreen::InSequence(0);
            controller.resume_target = Some(position);
        } else {
            controller.screen = match session.branch {
                Some(step) if !controller.sequence.contains(&step) => {
                    ActiveScreen::Branched { step, position }
                }
                _ => ActiveScreen::InSequence(position),
            };
        }

        tracing::info!(
            journey_type = ?controller.journey_type,
            position = controller.position(),
            resume_target = ?controller.resume_target,
            "[Journey] Restored persisted session"
        );
        Ok(controller)
    }

    // ============================================================================
    // Read access
    // ============================================================================

    pub fn journey_type(&self) -> Option<JourneyType> {
        self.journey_type
    }

    pub fn sequence(&self) -> &[StepId] {
        &self.sequence
    }

    /// The sequence resolved to catalog steps.
    pub fn steps(&self) -> Vec<Step> {
        self.sequence.iter().map(|id| id.step()).collect()
    }

    /// Current position in the linear sequence.
    pub fn position(&self) -> usize {
        self.screen.position()
    }

    pub fn active_screen(&self) -> ActiveScreen {
        self.screen
    }

    pub fn branch(&self) -> Option<StepId> {
        self.screen.branch()
    }

    /// The step being shown: the branch if one is active, else the sequence
    /// member at the current position.
    pub fn current_step(&self) -> Option<Step> {
        match self.screen {
            ActiveScreen::Branched { step, .. } => Some(step.step()),
            ActiveScreen::InSequence(position) => self.sequence.get(position).map(|id| id.step()),
        }
    }

    pub fn is_last_step(&self) -> bool {
        !self.screen.is_branched() && self.position() + 1 >= self.sequence.len()
    }

    pub fn form_data(&self) -> &FormData {
        &self.form_data
    }

    pub fn bottom_bar(&self) -> Option<&BottomBarContent> {
        self.bottom_bar.as_ref()
    }

    pub fn error(&self) -> Option<&ErrorNotice> {
        self.error.as_ref()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn is_resume_pending(&self) -> bool {
        self.resume_target.is_some()
    }

    /// Snapshot of the persistable state.
    pub fn snapshot(&self) -> PersistedSession {
        PersistedSession {
            journey_type: self.journey_type,
            sequence: self.sequence.clone(),
            position: self.position(),
            branch: self.branch(),
            form_data: self.form_data.clone(),
        }
    }

    // ============================================================================
    // Journey selection
    // ============================================================================

    /// Selects a journey type and starts it from the first step.
    ///
    /// Re-selecting the active type is a no-op.
    pub fn select_journey_type(&mut self, journey_type: JourneyType) {
        if self.journey_type == Some(journey_type) {
            tracing::debug!(%journey_type, "[Journey] Journey type already active");
            return;
        }

        self.load_journey(journey_type);
        tracing::info!(%journey_type, "[Journey] Journey type selected");
    }

    /// Starts a journey unconditionally, merging `prefilled` into the form data.
    pub fn start_journey(&mut self, journey_type: JourneyType, prefilled: FormData) {
        self.load_journey(journey_type);
        self.error = None;
        if !prefilled.is_empty() {
            self.update_form_data(prefilled);
        }
        tracing::info!(%journey_type, "[Journey] Journey started");
    }

    fn load_journey(&mut self, journey_type: JourneyType) {
        self.journey_type = Some(journey_type);
        self.sequence = step_ids_for(journey_type).to_vec();
        self.screen = ActiveScreen::InSequence(0);
        self.bottom_bar = None;
        self.resume_target = None;

        let patch = SessionPatch::new()
            .journey_type(journey_type)
            .sequence(&self.sequence)
            .position(0)
            .branch(None);
        self.persist(patch);
    }

    // ============================================================================
    // Navigation
    // ============================================================================

    /// Moves one step forward; a no-op on the last step.
    ///
    /// Leaves any active branch. On the first advance after a resume from
    /// position 0, jumps straight to the stored position instead.
    pub fn advance(&mut self) {
        let from = self.position();
        self.bottom_bar = None;

        if let Some(target) = self.resume_target.take()
            && from == 0
            && target > 0
            && target < self.sequence.len()
        {
            tracing::info!(target, "[Journey] Resuming at stored position");
            self.move_to(target);
            return;
        }

        if from + 1 < self.sequence.len() {
            self.move_to(from + 1);
        } else {
            tracing::debug!(position = from, "[Journey] Already at final step");
            self.move_to(from);
        }
    }

    /// Moves one step back; a no-op on the first step.
    pub fn retreat(&mut self) {
        let from = self.position();
        self.bottom_bar = None;
        self.move_to(from.saturating_sub(1));
    }

    /// Jumps to a step by wire id.
    ///
    /// Unknown ids are a routing error: logged and returned, state untouched.
    pub fn jump_to_step(&mut self, step_id: &str) -> Result<()> {
        match StepCatalog::resolve(step_id) {
            Some(step) => {
                self.jump_to(step.id);
                Ok(())
            }
            None => {
                tracing::error!(step_id, "[Journey] Step not found");
                Err(JourneyError::not_found("step", step_id))
            }
        }
    }

    /// Jumps to a step.
    ///
    /// A member of the current sequence becomes the current position (forward
    /// jumps included). Any other step is entered as a branch without moving
    /// the position.
    pub fn jump_to(&mut self, step: StepId) {
        self.bottom_bar = None;

        match self.sequence.iter().position(|id| *id == step) {
            Some(index) => self.move_to(index),
            None => {
                let position = self.position();
                self.screen = ActiveScreen::Branched { step, position };
                self.persist(SessionPatch::new().branch(Some(step)));
                tracing::debug!(%step, position, "[Journey] Entered branch");
            }
        }
    }

    /// Sets the in-sequence position and leaves any branch.
    fn move_to(&mut self, position: usize) {
        let previous = self.screen;
        self.screen = ActiveScreen::InSequence(position);

        let mut patch = SessionPatch::new().branch(None);
        if previous.position() != position {
            // Any other move supersedes a pending resume jump
            self.resume_target = None;
            patch = patch.position(position);
        }
        self.persist(patch);
    }

    // ============================================================================
    // Flow mutation
    // ============================================================================

    /// Replaces the sequence with `steps` and moves to its last step.
    ///
    /// Used when a side path ends the journey early.
    pub fn truncate_to(&mut self, steps: Vec<StepId>) -> Result<()> {
        if steps.is_empty() {
            return Err(JourneyError::invalid_state(
                "cannot truncate a journey to an empty sequence",
            ));
        }

        let position = steps.len() - 1;
        self.sequence = steps;
        self.screen = ActiveScreen::InSequence(position);
        self.bottom_bar = None;
        self.resume_target = None;

        let patch = SessionPatch::new()
            .sequence(&self.sequence)
            .position(position)
            .branch(None);
        self.persist(patch);

        tracing::info!(
            steps = self.sequence.len(),
            "[Journey] Sequence truncated"
        );
        Ok(())
    }

    /// Restores the full sequence of the current journey type, positioned
    /// one past the configured anchor step.
    pub fn restore_full_sequence(&mut self) {
        self.restore_full_sequence_after(self.restore_anchor);
    }

    /// Restores the full sequence of the current journey type, positioned
    /// one past `anchor` (or at 0 when the anchor is not part of it).
    pub fn restore_full_sequence_after(&mut self, anchor: StepId) {
        let Some(journey_type) = self.journey_type else {
            tracing::warn!("[Journey] No journey type selected; nothing to restore");
            return;
        };

        self.sequence = step_ids_for(journey_type).to_vec();
        let last = self.sequence.len().saturating_sub(1);
        let position = self
            .sequence
            .iter()
            .position(|id| *id == anchor)
            .map(|index| (index + 1).min(last))
            .unwrap_or(0);
        self.screen = ActiveScreen::InSequence(position);
        self.bottom_bar = None;
        self.resume_target = None;

        let patch = SessionPatch::new()
            .sequence(&self.sequence)
            .position(position)
            .branch(None);
        self.persist(patch);

        tracing::info!(%journey_type, position, "[Journey] Full sequence restored");
    }

    /// Physical KYC ends the journey on the KYC choice step.
    pub fn switch_to_physical_kyc_flow(&mut self) {
        if self.journey_type.is_none() {
            return;
        }
        if let Err(e) = self.truncate_to(PHYSICAL_KYC_PREFIX.to_vec()) {
            tracing::error!("[Journey] Failed to switch to physical KYC: {}", e);
        }
    }

    /// Undoes a physical KYC truncation and continues after the KYC choice.
    pub fn switch_to_digital_kyc_flow(&mut self) {
        if self.journey_type.is_none() {
            return;
        }
        self.restore_full_sequence_after(StepId::KycChoice);
    }

    // ============================================================================
    // Shared slots
    // ============================================================================

    /// Shallow-merges `partial` into the form data and persists the full bag.
    pub fn update_form_data(&mut self, partial: FormData) {
        self.form_data.merge(partial);
        self.persist(SessionPatch::new().form_data(&self.form_data));
    }

    /// Records whether the customer wants to register a nominee.
    pub fn set_nominee_enabled(&mut self, enabled: bool) {
        let mut partial = FormData::new();
        partial.set(keys::WANTS_NOMINEE, enabled);
        self.update_form_data(partial);
    }

    /// Sets (or clears) the primary action of the active screen.
    pub fn set_bottom_bar_content(&mut self, content: Option<BottomBarContent>) {
        self.bottom_bar = content;
    }

    pub fn set_error(&mut self, error: ErrorNotice) {
        tracing::warn!(title = %error.title, "[Journey] Error notice raised");
        self.error = Some(error);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn add_notification(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.notifications.insert(0, Notification::new(title, body));
    }

    pub fn clear_notifications(&mut self) {
        self.notifications.clear();
    }

    // ============================================================================
    // Reset
    // ============================================================================

    /// Wipes all persisted keys and returns to a cold-started default journey.
    pub fn reset_all(&mut self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!("[Persistence] Failed to clear stored session: {}", e);
        }

        self.journey_type = Some(self.default_journey);
        self.sequence = step_ids_for(self.default_journey).to_vec();
        self.screen = ActiveScreen::InSequence(0);
        self.form_data = FormData::demo_defaults();
        self.bottom_bar = None;
        self.resume_target = None;
        self.error = None;

        tracing::info!(journey_type = %self.default_journey, "[Journey] Journey reset");
    }

    fn persist(&self, patch: SessionPatch<'_>) {
        if patch.is_empty() {
            return;
        }
        if let Err(e) = self.store.save(patch) {
            tracing::warn!("[Persistence] Failed to persist journey state: {}", e);
        }
    }
}
