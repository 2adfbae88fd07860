//! The shared, schema-less form-data bag.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Well-known form-data keys the engine itself touches.
pub mod keys {
    pub const WANTS_NOMINEE: &str = "wantsNominee";
    pub const KYC_METHOD: &str = "kycMethod";
    pub const INVITE_ID: &str = "inviteId";
    pub const EMPLOYEE_ID: &str = "employeeId";
    pub const NAME: &str = "name";
    pub const EMAIL: &str = "email";
    pub const MOBILE_NUMBER: &str = "mobileNumber";
}

/// Key -> value accumulator shared by every step.
///
/// No schema is enforced; each screen owns the interpretation of its keys.
/// Updates are shallow merges: a key present in the update replaces the
/// stored value wholesale, other keys are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(Map<String, Value>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Demo values a fresh session is seeded with.
    pub fn demo_defaults() -> Self {
        let seed = json!({
            "mobileNumber": "9934090013",
            "dob": "1990-05-15",
            "pan": "ABCDE1234F",
            "email": "sachin.bansal72@gmail.com",
            "fatherName": "S. K. Bansal",
            "motherName": "Anita Bansal",
            "maritalStatus": "married",
            "currentAddress": "123, Green Park, New Delhi, 110016",
            "incomeRange": "10-15L",
            "communicationAddress": "123, Green Park, New Delhi, 110016",
            "sameAsCurrentAddress": true,
            "wantsNominee": false,
            "nomineeName": "Priya Bansal",
            "nomineeRelation": "spouse",
            "nomineeDob": "",
            "nomineeAddress": "",
            "isPep": false,
            "isIndianNational": true,
            "isTaxResidentIndiaOnly": true,
            "ekycUidaiConsent": false,
            "vkycConsent": false,
            "vkycPresentInIndia": false,
            "autoConvertConsent": null,
            "autoConvertStatus": "idle",
        });
        match seed {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    /// Shallow-merges `partial` into this bag.
    pub fn merge(&mut self, partial: FormData) {
        for (key, value) in partial.0 {
            self.0.insert(key, value);
        }
    }

    /// Sets a single key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key).and_then(Value::as_bool)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for FormData {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
