//! In-memory invite store for id-based (legacy) invite links.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use onboard_core::invite::{
    Employee, InviteLookup, InviteRecord, InviteStatus, InviteTokenCodec,
};
use onboard_core::journey::{FormData, JourneyType};
use onboard_core::{JourneyError, Result};

use crate::invite_token::Base64InviteCodec;

/// Invite store living for the lifetime of the process.
///
/// Ids that are self-contained tokens are answered from the token itself.
#[derive(Debug, Default)]
pub struct InMemoryInviteStore {
    invites: Mutex<HashMap<String, InviteRecord>>,
    codec: Base64InviteCodec,
}

impl InMemoryInviteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a `sent` invite. The employee needs an id, name and email.
    pub async fn create(
        &self,
        journey_type: JourneyType,
        employee: Employee,
        prefilled_data: FormData,
    ) -> Result<InviteRecord> {
        if !employee.is_complete() {
            return Err(JourneyError::invalid_state(
                "invite employee requires id, name and email",
            ));
        }

        let now = Utc::now();
        let record = InviteRecord {
            id: Uuid::new_v4().to_string(),
            employee,
            journey_type,
            prefilled_data,
            status: InviteStatus::Sent,
            created_at: now,
            last_updated_at: now,
        };

        self.invites
            .lock()
            .await
            .insert(record.id.clone(), record.clone());
        tracing::info!(invite_id = %record.id, %journey_type, "[Invite] Invite created");
        Ok(record)
    }
}

#[async_trait]
impl InviteLookup for InMemoryInviteStore {
    async fn find_invite(&self, invite_id: &str) -> Result<InviteRecord> {
        if let Some(payload) = self.codec.decode(invite_id) {
            return Ok(InviteRecord::from_payload(payload));
        }

        let mut invites = self.invites.lock().await;
        let record = invites
            .get_mut(invite_id)
            .ok_or_else(|| JourneyError::not_found("invite", invite_id))?;

        if record.status == InviteStatus::Sent {
            record.status = InviteStatus::Opened;
            record.last_updated_at = Utc::now();
        }
        Ok(record.clone())
    }

    async fn update_status(&self, invite_id: &str, status: InviteStatus) -> Result<()> {
        // Tokens have no stored record to update
        if self.codec.decode(invite_id).is_some() {
            return Ok(());
        }

        let mut invites = self.invites.lock().await;
        let record = invites
            .get_mut(invite_id)
            .ok_or_else(|| JourneyError::not_found("invite", invite_id))?;
        record.status = status;
        record.last_updated_at = Utc::now();

        tracing::debug!(invite_id, %status, "[Invite] Invite status updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invite_token::create_invite_token;
    use onboard_core::invite::InvitePayload;

    fn employee() -> Employee {
        Employee {
            id: "E-42".to_string(),
            name: "Meera Iyer".to_string(),
            email: "meera@example.com".to_string(),
            phone: None,
        }
    }

    #[tokio::test]
    async fn test_create_then_find_marks_opened() {
        let store = InMemoryInviteStore::new();
        let created = store
            .create(JourneyType::NewToBank, employee(), FormData::new())
            .await
            .unwrap();
        assert_eq!(created.status, InviteStatus::Sent);

        let found = store.find_invite(&created.id).await.unwrap();
        assert_eq!(found.status, InviteStatus::Opened);

        store
            .update_status(&created.id, InviteStatus::Started)
            .await
            .unwrap();
        // Opening again does not regress the status
        let found = store.find_invite(&created.id).await.unwrap();
        assert_eq!(found.status, InviteStatus::Started);
    }

    #[tokio::test]
    async fn test_create_requires_employee_fields() {
        let store = InMemoryInviteStore::new();
        let mut employee = employee();
        employee.name.clear();

        let err = store
            .create(JourneyType::NewToBank, employee, FormData::new())
            .await
            .unwrap_err();
        assert!(err.is_invalid_state());
    }

    #[tokio::test]
    async fn test_unknown_invite_is_not_found() {
        let store = InMemoryInviteStore::new();
        assert!(store.find_invite("missing").await.unwrap_err().is_not_found());
        assert!(
            store
                .update_status("missing", InviteStatus::Started)
                .await
                .unwrap_err()
                .is_not_found()
        );
    }

    #[tokio::test]
    async fn test_token_ids_resolve_without_state() {
        let store = InMemoryInviteStore::new();
        let payload = InvitePayload::new("tok-1", JourneyType::LoanOffer, employee(), FormData::new());
        let token = create_invite_token(&payload).unwrap();

        let record = store.find_invite(&token).await.unwrap();
        assert_eq!(record.id, "tok-1");
        assert_eq!(record.status, InviteStatus::Opened);
        store.update_status(&token, InviteStatus::Started).await.unwrap();
    }
}
