//! Analytics sink that records events as structured tracing events.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use onboard_core::analytics::{AnalyticsEvent, AnalyticsSink};
use onboard_core::Result;

use crate::storage::KeyValueStorage;

/// Storage key of the persistent anonymous user id.
pub const ANONYMOUS_ID_KEY: &str = "anonymous_user_id";

/// Emits every event on the `onboard::analytics` tracing target.
pub struct TracingAnalyticsSink {
    storage: Arc<dyn KeyValueStorage>,
}

impl TracingAnalyticsSink {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Returns the anonymous id, creating and storing one on first use.
    pub fn anonymous_id(&self) -> Result<String> {
        if let Some(id) = self.storage.get_item(ANONYMOUS_ID_KEY)? {
            return Ok(id);
        }
        let id = format!("user_{}", Uuid::new_v4().simple());
        self.storage.set_item(ANONYMOUS_ID_KEY, &id)?;
        Ok(id)
    }
}

impl AnalyticsSink for TracingAnalyticsSink {
    fn track(&self, event: AnalyticsEvent) {
        let anonymous_id = match self.anonymous_id() {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!("[Analytics] Failed to resolve anonymous id: {}", e);
                "user_unknown".to_string()
            }
        };

        let mut properties = event.properties;
        properties.insert("anonymousId".to_string(), anonymous_id.into());
        properties.insert("timestamp".to_string(), Utc::now().to_rfc3339().into());

        match serde_json::to_string(&properties) {
            Ok(properties) => {
                tracing::info!(target: "onboard::analytics", event = %event.event, %properties)
            }
            Err(e) => tracing::warn!("[Analytics] Failed to serialize event: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_anonymous_id_is_stable() {
        let storage = Arc::new(MemoryStorage::new());
        let sink = TracingAnalyticsSink::new(storage.clone());

        let first = sink.anonymous_id().unwrap();
        assert!(first.starts_with("user_"));
        assert_eq!(sink.anonymous_id().unwrap(), first);

        sink.track(AnalyticsEvent::new("page_viewed").with("step", "welcome"));
        assert_eq!(
            storage.get_item(ANONYMOUS_ID_KEY).unwrap().as_deref(),
            Some(first.as_str())
        );
    }
}
