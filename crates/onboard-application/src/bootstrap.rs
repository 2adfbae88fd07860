//! Resume bootstrapper: decides how a journey starts.
//!
//! Precedence, first match wins:
//! 1. The route parameter is an invite token: start the token's journey.
//! 2. The route parameter is a legacy invite id: look it up and start it.
//! 3. A valid persisted session exists: restore it.
//! 4. Otherwise cold start.
//!
//! Invalid persisted state forces `reset_all()`. A failed invite lookup
//! cold-starts with the error notice shown.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use onboard_core::analytics::{AnalyticsEvent, AnalyticsSink};
use onboard_core::config::EngineConfig;
use onboard_core::invite::{InviteLookup, InviteStatus, InviteTokenCodec};
use onboard_core::journey::{ErrorNotice, JourneyController, SessionStore};
use onboard_infrastructure::{
    Base64InviteCodec, ConfigService, InMemoryInviteStore, JsonFileStorage, KeyValueStorage,
    LocalStorageSessionStore, OnboardPaths, TracingAnalyticsSink,
};

/// Title of the error notice shown when an invite link cannot be opened.
pub const INVITE_FAILED_TITLE: &str = "We couldn't open this journey link";

/// What the journey was opened with.
#[derive(Debug, Clone, Default)]
pub struct BootRequest {
    /// Route segment: an invite token or a legacy invite id.
    pub route_param: Option<String>,
    /// Resume marker: jump to the stored position on the first advance.
    pub resume: bool,
}

/// How the controller was initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum BootSource {
    Token,
    LegacyInvite,
    Persisted,
    ColdStart,
    Reset,
    InviteFailed,
}

pub struct BootOutcome {
    pub controller: JourneyController,
    pub source: BootSource,
}

/// Builds the journey controller for an incoming request.
pub struct Bootstrapper {
    store: Arc<dyn SessionStore>,
    invites: Arc<dyn InviteLookup>,
    codec: Arc<dyn InviteTokenCodec>,
    analytics: Arc<dyn AnalyticsSink>,
    config: EngineConfig,
}

impl Bootstrapper {
    pub fn new(
        store: Arc<dyn SessionStore>,
        invites: Arc<dyn InviteLookup>,
        codec: Arc<dyn InviteTokenCodec>,
        analytics: Arc<dyn AnalyticsSink>,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            invites,
            codec,
            analytics,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> Arc<dyn SessionStore> {
        self.store.clone()
    }

    pub fn analytics(&self) -> Arc<dyn AnalyticsSink> {
        self.analytics.clone()
    }

    pub async fn boot(&self, request: BootRequest) -> BootOutcome {
        let outcome = match request.route_param.as_deref() {
            Some(param) if !param.is_empty() => self.boot_from_invite(param).await,
            _ => self.boot_from_store(request.resume),
        };

        tracing::info!(
            source = %outcome.source,
            journey_type = ?outcome.controller.journey_type(),
            position = outcome.controller.position(),
            "[Bootstrap] Journey ready"
        );
        self.analytics.track(
            AnalyticsEvent::new("journey_opened").with("source", outcome.source.to_string()),
        );
        outcome
    }

    async fn boot_from_invite(&self, param: &str) -> BootOutcome {
        if let Some(payload) = self.codec.decode(param) {
            tracing::info!(invite_id = %payload.id, "[Bootstrap] Starting journey from invite token");
            let mut controller = self.cold_controller();
            controller.start_journey(payload.journey_type, payload.seed_form_data());
            return BootOutcome {
                controller,
                source: BootSource::Token,
            };
        }

        match self.invites.find_invite(param).await {
            Ok(invite) => {
                tracing::info!(invite_id = %invite.id, "[Bootstrap] Starting journey from legacy invite");
                let mut controller = self.cold_controller();
                controller.start_journey(invite.journey_type, invite.seed_form_data());

                // Best-effort: the journey starts regardless
                if let Err(e) = self
                    .invites
                    .update_status(&invite.id, InviteStatus::Started)
                    .await
                {
                    tracing::warn!("[Bootstrap] Failed to mark invite as started: {}", e);
                }

                BootOutcome {
                    controller,
                    source: BootSource::LegacyInvite,
                }
            }
            Err(e) => {
                tracing::warn!(invite_id = param, "[Bootstrap] Invite lookup failed: {}", e);
                let message = if e.is_not_found() {
                    "Invite not found.".to_string()
                } else {
                    format!("Unable to load invite details: {}", e)
                };

                let mut controller = self.cold_controller();
                controller
                    .set_error(ErrorNotice::new(INVITE_FAILED_TITLE, message).with_module("invite"));
                BootOutcome {
                    controller,
                    source: BootSource::InviteFailed,
                }
            }
        }
    }

    fn boot_from_store(&self, resume: bool) -> BootOutcome {
        let loaded = self.store.load_all().and_then(|session| match session {
            Some(session) => {
                JourneyController::restore(self.store.clone(), &self.config, session, resume)
                    .map(Some)
            }
            None => Ok(None),
        });

        match loaded {
            Ok(Some(controller)) => BootOutcome {
                controller,
                source: BootSource::Persisted,
            },
            Ok(None) => {
                tracing::info!("[Bootstrap] No stored journey; cold start");
                BootOutcome {
                    controller: self.cold_controller(),
                    source: BootSource::ColdStart,
                }
            }
            Err(e) => {
                tracing::warn!("[Bootstrap] Stored journey is invalid, resetting: {}", e);
                let mut controller = self.cold_controller();
                controller.reset_all();
                BootOutcome {
                    controller,
                    source: BootSource::Reset,
                }
            }
        }
    }

    fn cold_controller(&self) -> JourneyController {
        JourneyController::new(self.store.clone(), &self.config)
    }
}

/// Composition root for a file-backed journey.
///
/// Loads the configuration (explicit path or the platform `config.toml`)
/// and wires the JSON-file session store, the token codec, the in-memory
/// invite store and the tracing analytics sink.
pub fn file_backed(
    config_path: Option<PathBuf>,
    state_dir: Option<PathBuf>,
) -> Result<Bootstrapper> {
    let config_service = match config_path {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new(),
    };
    let config = config_service
        .get_config()
        .context("Failed to load engine configuration")?;

    let state_file = OnboardPaths::new(state_dir)
        .state_file()
        .context("Failed to resolve journey state file")?;
    tracing::debug!(path = %state_file.display(), "[Bootstrap] Using journey state file");

    let storage: Arc<dyn KeyValueStorage> = Arc::new(JsonFileStorage::new(state_file));
    let store = Arc::new(LocalStorageSessionStore::new(
        storage.clone(),
        config.storage_prefix.clone(),
    ));

    Ok(Bootstrapper::new(
        store,
        Arc::new(InMemoryInviteStore::new()),
        Arc::new(Base64InviteCodec),
        Arc::new(TracingAnalyticsSink::new(storage)),
        config,
    ))
}
