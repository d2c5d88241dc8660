use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A local login session. The catalog demo has no identity provider, so the
/// session is whatever the login flow stored; only `email` is required and
/// any extra fields are carried through untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub email: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Session {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// The profile active for the current session. Exactly one at a time;
/// overwritten on switch, removed on logout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SelectedProfile {
    pub name: String,
    pub theme: String,
    pub selected_time: DateTime<Utc>,
}

impl SelectedProfile {
    pub fn new(name: impl Into<String>, theme: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            theme: theme.into(),
            selected_time: Utc::now(),
        }
    }
}
