//! Engine configuration model.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::journey::JourneyType;
use crate::step::StepId;

/// Prefix every persisted key is namespaced under.
pub const DEFAULT_STORAGE_PREFIX: &str = "hdfcJourney_";

/// Default inactivity timeout (5 minutes).
pub const DEFAULT_INACTIVITY_TIMEOUT_SECS: u64 = 5 * 60;

/// Root configuration of the engine.
///
/// Every field has a default so a partial (or missing) `config.toml` works.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Namespace prefix for persisted keys.
    pub storage_prefix: String,
    /// Seconds without user activity before the session is wiped.
    pub inactivity_timeout_secs: u64,
    /// Journey used by cold start and reset.
    pub default_journey: JourneyType,
    /// Step after which `restore_full_sequence` repositions.
    pub restore_anchor: StepId,
    /// Simulated backend delays.
    pub latency: LatencyConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            inactivity_timeout_secs: DEFAULT_INACTIVITY_TIMEOUT_SECS,
            default_journey: JourneyType::default(),
            restore_anchor: StepId::KycChoice,
            latency: LatencyConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn inactivity_timeout(&self) -> Duration {
        Duration::from_secs(self.inactivity_timeout_secs)
    }
}

/// Durations (milliseconds) standing in for backend round trips.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LatencyConfig {
    pub otp_send_ms: u64,
    pub otp_verify_ms: u64,
    pub kyc_verify_ms: u64,
    pub conversion_ms: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            otp_send_ms: 1500,
            otp_verify_ms: 1500,
            kyc_verify_ms: 2000,
            conversion_ms: 1200,
        }
    }
}

impl LatencyConfig {
    /// All delays zero; useful for tests and scripted runs.
    pub fn instant() -> Self {
        Self {
            otp_send_ms: 0,
            otp_verify_ms: 0,
            kyc_verify_ms: 0,
            conversion_ms: 0,
        }
    }

    pub fn otp_send(&self) -> Duration {
        Duration::from_millis(self.otp_send_ms)
    }

    pub fn otp_verify(&self) -> Duration {
        Duration::from_millis(self.otp_verify_ms)
    }

    pub fn kyc_verify(&self) -> Duration {
        Duration::from_millis(self.kyc_verify_ms)
    }

    pub fn conversion(&self) -> Duration {
        Duration::from_millis(self.conversion_ms)
    }
}
