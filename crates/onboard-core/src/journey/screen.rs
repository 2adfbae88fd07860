//! What the journey is currently showing, and the slots screens write into.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::step::StepId;

/// The screen the journey is on.
///
/// A journey is either on a member of its linear sequence, or on a branch:
/// a step reached sideways that is not part of the sequence. The branch
/// keeps the sequence position it was entered from, so leaving it resumes
/// linear navigation from exactly there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveScreen {
    InSequence(usize),
    Branched { step: StepId, position: usize },
}

impl ActiveScreen {
    /// Position in the linear sequence (the pre-branch one while branched).
    pub fn position(&self) -> usize {
        match *self {
            ActiveScreen::InSequence(position) => position,
            ActiveScreen::Branched { position, .. } => position,
        }
    }

    /// Step shown as a branch, if any.
    pub fn branch(&self) -> Option<StepId> {
        match *self {
            ActiveScreen::InSequence(_) => None,
            ActiveScreen::Branched { step, .. } => Some(step),
        }
    }

    pub fn is_branched(&self) -> bool {
        matches!(self, ActiveScreen::Branched { .. })
    }
}

/// Descriptor of the primary action shown in the bottom bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BottomBarContent {
    pub label: String,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl BottomBarContent {
    /// An enabled action with the given label.
    pub fn action(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            enabled: true,
            hint: None,
        }
    }

    /// A disabled action with the given label.
    pub fn disabled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            enabled: false,
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// An engine-detected anomaly shown on the terminal error screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorNotice {
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
}

impl ErrorNotice {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            module: None,
        }
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }
}

/// An in-app notification (not persisted).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            body: body.into(),
            created_at: Utc::now(),
        }
    }
}
