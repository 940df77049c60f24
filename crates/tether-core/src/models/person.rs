//! Person entity: read model and write payloads.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    pub first: String,
    pub last: String,
}

/// A person as the backend returns it.
///
/// `id` is the bare record key, without the `person:` table prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub title: String,
    pub name: Name,
    pub marketing: bool,
}

/// Payload for `create_person`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonForCreate {
    pub title: String,
    pub name: Name,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketing: Option<bool>,
}

/// Payload for `update_person`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonForUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Name>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marketing: Option<bool>,
}

impl PersonForUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.name.is_none() && self.marketing.is_none()
    }
}
