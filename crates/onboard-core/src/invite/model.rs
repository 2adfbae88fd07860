//! Invite data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::journey::{FormData, JourneyType, keys};

/// The only token payload schema the engine understands.
pub const TOKEN_PAYLOAD_VERSION: u32 = 1;

/// The employee an invite was issued to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Employee {
    /// Checks the fields every invite requires.
    pub fn is_complete(&self) -> bool {
        !self.id.trim().is_empty() && !self.name.trim().is_empty() && !self.email.trim().is_empty()
    }
}

/// The payload embedded in a self-contained invite token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitePayload {
    #[serde(rename = "v")]
    pub version: u32,
    pub id: String,
    pub journey_type: JourneyType,
    pub employee: Employee,
    #[serde(default)]
    pub prefilled_data: FormData,
    /// RFC 3339 issue time.
    pub issued_at: String,
}

impl InvitePayload {
    pub fn new(
        id: impl Into<String>,
        journey_type: JourneyType,
        employee: Employee,
        prefilled_data: FormData,
    ) -> Self {
        Self {
            version: TOKEN_PAYLOAD_VERSION,
            id: id.into(),
            journey_type,
            employee,
            prefilled_data,
            issued_at: Utc::now().to_rfc3339(),
        }
    }

    /// Form data a journey opened from this token starts with.
    pub fn seed_form_data(&self) -> FormData {
        seed_form_data(&self.id, &self.employee, &self.prefilled_data)
    }
}

/// Lifecycle of a stored invite.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InviteStatus {
    Sent,
    Opened,
    Started,
    Completed,
}

/// An invite as known to an invite store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRecord {
    pub id: String,
    pub employee: Employee,
    pub journey_type: JourneyType,
    #[serde(default)]
    pub prefilled_data: FormData,
    pub status: InviteStatus,
    pub created_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
}

impl InviteRecord {
    /// Builds the `opened` record a token stands for. Tokens have no server
    /// side state, so the record is synthesized on every lookup.
    pub fn from_payload(payload: InvitePayload) -> Self {
        let now = Utc::now();
        let created_at = DateTime::parse_from_rfc3339(&payload.issued_at)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or(now);
        Self {
            id: payload.id,
            employee: payload.employee,
            journey_type: payload.journey_type,
            prefilled_data: payload.prefilled_data,
            status: InviteStatus::Opened,
            created_at,
            last_updated_at: now,
        }
    }

    /// Form data a journey opened from this invite starts with.
    pub fn seed_form_data(&self) -> FormData {
        seed_form_data(&self.id, &self.employee, &self.prefilled_data)
    }
}

fn seed_form_data(invite_id: &str, employee: &Employee, prefilled: &FormData) -> FormData {
    let mut seed = FormData::new();
    seed.set(keys::INVITE_ID, invite_id);
    seed.set(keys::EMPLOYEE_ID, employee.id.as_str());
    seed.set(keys::NAME, employee.name.as_str());
    seed.set(keys::EMAIL, employee.email.as_str());
    if let Some(phone) = &employee.phone {
        seed.set(keys::MOBILE_NUMBER, phone.as_str());
    }
    // Prefilled fields win over the employee record
    seed.merge(prefilled.clone());
    seed
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn employee() -> Employee {
        Employee {
            id: "E-1001".to_string(),
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: None,
        }
    }

    #[test]
    fn test_payload_wire_shape() {
        let payload = InvitePayload::new("inv-1", JourneyType::ExistingNoKyc, employee(), FormData::new());
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["v"], json!(1));
        assert_eq!(value["journeyType"], json!("etb-nk"));
        assert!(value["employee"].get("phone").is_none());
        assert!(value["issuedAt"].is_string());
    }

    #[test]
    fn test_seed_form_data_prefers_prefilled() {
        let mut employee = employee();
        employee.phone = Some("9000000001".to_string());
        let prefilled: FormData = [("name", json!("Asha R.")), ("pan", json!("XYZAB9876C"))]
            .into_iter()
            .collect();
        let payload = InvitePayload::new("inv-2", JourneyType::NewToBank, employee, prefilled);

        let seed = payload.seed_form_data();
        assert_eq!(seed.get_str("inviteId"), Some("inv-2"));
        assert_eq!(seed.get_str("employeeId"), Some("E-1001"));
        assert_eq!(seed.get_str("mobileNumber"), Some("9000000001"));
        assert_eq!(seed.get_str("name"), Some("Asha R."));
        assert_eq!(seed.get_str("pan"), Some("XYZAB9876C"));
    }

    #[test]
    fn test_record_from_payload_is_opened() {
        let payload = InvitePayload::new("inv-3", JourneyType::LoanOffer, employee(), FormData::new());
        let record = InviteRecord::from_payload(payload);
        assert_eq!(record.status, InviteStatus::Opened);
        assert_eq!(record.journey_type, JourneyType::LoanOffer);
    }

    #[test]
    fn test_employee_completeness() {
        let mut employee = employee();
        assert!(employee.is_complete());
        employee.email = " ".to_string();
        assert!(!employee.is_complete());
    }

    #[test]
    fn test_status_names() {
        assert_eq!(InviteStatus::Started.to_string(), "started");
        assert_eq!("opened".parse::<InviteStatus>().unwrap(), InviteStatus::Opened);
    }
}
