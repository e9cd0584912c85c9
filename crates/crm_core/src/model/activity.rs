//! Activity domain model.

use super::contact::Contact;
use super::id::{ActivityId, ContactId};
use super::validation::{require_text, ValidationError};
use super::{Timestamp, UNKNOWN_COMPANY, UNKNOWN_CONTACT};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Kind of logged interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Call,
    Email,
    Meeting,
    #[default]
    Note,
}

impl ActivityType {
    pub const ALL: [ActivityType; 4] = [
        ActivityType::Call,
        ActivityType::Email,
        ActivityType::Meeting,
        ActivityType::Note,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Email => "email",
            Self::Meeting => "meeting",
            Self::Note => "note",
        }
    }
}

impl Display for ActivityType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == raw.trim())
            .ok_or_else(|| ValidationError::UnknownVariant {
                kind: "activity type",
                raw: raw.to_string(),
            })
    }
}

/// Canonical activity record held by the entity store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    pub contact_id: ContactId,
    /// Serialized as `type` to match external schema naming.
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub content: String,
    pub timestamp: Timestamp,
}

impl Activity {
    pub(crate) fn from_new(id: ActivityId, input: NewActivity, now: Timestamp) -> Self {
        Self {
            id,
            contact_id: input.contact_id,
            kind: input.kind.unwrap_or_default(),
            content: input.content,
            timestamp: input.timestamp.unwrap_or(now),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("content", &self.content)
    }
}

/// Create input for an activity.
///
/// `kind` defaults to `note`; `timestamp` defaults to creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewActivity {
    pub contact_id: ContactId,
    #[serde(default, rename = "type")]
    pub kind: Option<ActivityType>,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
}

impl NewActivity {
    pub fn new(contact_id: ContactId, kind: ActivityType, content: impl Into<String>) -> Self {
        Self {
            contact_id,
            kind: Some(kind),
            content: content.into(),
            timestamp: None,
        }
    }

    pub fn at(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Shallow-merge patch for an activity. No timestamp is refreshed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActivityPatch {
    pub contact_id: Option<ContactId>,
    #[serde(rename = "type")]
    pub kind: Option<ActivityType>,
    pub content: Option<String>,
    pub timestamp: Option<Timestamp>,
}

impl ActivityPatch {
    pub(crate) fn merged(&self, current: &Activity) -> Activity {
        let mut next = current.clone();
        if let Some(contact_id) = self.contact_id {
            next.contact_id = contact_id;
        }
        if let Some(kind) = self.kind {
            next.kind = kind;
        }
        if let Some(content) = &self.content {
            next.content = content.clone();
        }
        if let Some(timestamp) = self.timestamp {
            next.timestamp = timestamp;
        }
        next
    }
}

/// Activity joined with display fields of its contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityView {
    #[serde(flatten)]
    pub activity: Activity,
    pub contact_name: String,
    pub contact_company: String,
}

impl ActivityView {
    pub fn join(activity: Activity, contact: Option<&Contact>) -> Self {
        let (contact_name, contact_company) = match contact {
            Some(contact) => (contact.name.clone(), contact.company.clone()),
            None => (UNKNOWN_CONTACT.to_string(), UNKNOWN_COMPANY.to_string()),
        };
        Self {
            activity,
            contact_name,
            contact_company,
        }
    }
}

/// Sorts activities newest first; equal timestamps keep store order.
pub fn sort_newest_first(activities: &mut [ActivityView]) {
    activities.sort_by(|a, b| b.activity.timestamp.cmp(&a.activity.timestamp));
}
