//! Person record and the request shapes that create or patch it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{PersonStoreError, Result};

/// A stored person. `id` and both timestamps are owned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create input. Unknown fields (a client supplied `id`, timestamps) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl NewPerson {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Required-field presence check. This is the only schema validation done.
    pub fn validate(&self) -> Result<()> {
        if self.first_name.is_empty() || self.last_name.is_empty() {
            return Err(PersonStoreError::BadRequest(
                "first_name and last_name required".into(),
            ));
        }
        Ok(())
    }
}

/// Partial update. Absent or empty fields leave the stored value as is,
/// so a field can never be cleared through a patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonPatch {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl PersonPatch {
    pub(crate) fn apply(self, target: &mut Person) {
        if let Some(v) = non_empty(self.first_name) {
            target.first_name = v;
        }
        if let Some(v) = non_empty(self.last_name) {
            target.last_name = v;
        }
        if let Some(v) = non_empty(self.email) {
            target.email = Some(v);
        }
    }
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.is_empty())
}
