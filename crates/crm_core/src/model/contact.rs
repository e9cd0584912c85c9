//! Contact domain model.
//!
//! # Responsibility
//! - Define the canonical contact record and its create/patch inputs.
//! - Normalize tag lists before they reach the store.
//!
//! # Invariants
//! - `tags` keep insertion order, hold no duplicates and no blank entries.
//! - `name` and `email` are never blank on a stored record.
//! - `last_activity` is refreshed on every update.

use super::activity::Activity;
use super::deal::Deal;
use super::id::ContactId;
use super::validation::{require_email, require_text, ValidationError};
use super::Timestamp;
use serde::{Deserialize, Serialize};

/// Canonical contact record held by the entity store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub company: String,
    /// Display order is insertion order; membership ignores order.
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: Timestamp,
    pub last_activity: Timestamp,
}

impl Contact {
    /// Builds a stored record from validated create input.
    pub(crate) fn from_new(id: ContactId, input: NewContact, now: Timestamp) -> Self {
        Self {
            id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            company: input.company,
            tags: normalize_tags(&input.tags),
            created_at: now,
            last_activity: now,
        }
    }

    /// Returns whether `tag` is attached to this contact (exact match).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|value| value == tag)
    }

    /// Checks record-level invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_email(&self.email)
    }
}

/// Create input for a contact. Ids and timestamps are store-assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub tags: Vec<String>,
}

impl NewContact {
    /// Creates input with the required fields set.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Shallow-merge patch for a contact. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    /// Replaces the whole tag list when set.
    pub tags: Option<Vec<String>>,
}

impl ContactPatch {
    /// Returns a copy of `current` with this patch applied.
    ///
    /// `last_activity` is set to `now` regardless of which fields changed.
    pub(crate) fn merged(&self, current: &Contact, now: Timestamp) -> Contact {
        let mut next = current.clone();
        if let Some(name) = &self.name {
            next.name = name.clone();
        }
        if let Some(email) = &self.email {
            next.email = email.clone();
        }
        if let Some(phone) = &self.phone {
            next.phone = phone.clone();
        }
        if let Some(company) = &self.company {
            next.company = company.clone();
        }
        if let Some(tags) = &self.tags {
            next.tags = normalize_tags(tags);
        }
        next.last_activity = now;
        next
    }
}

/// Contact joined with its deals and activity history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetail {
    #[serde(flatten)]
    pub contact: Contact,
    pub deals: Vec<Deal>,
    /// Newest first.
    pub activities: Vec<Activity>,
}

/// Trims tags, drops blanks and removes duplicates keeping first occurrence.
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let trimmed = tag.as_ref().trim();
        if trimmed.is_empty() || normalized.iter().any(|seen| seen == trimmed) {
            continue;
        }
        normalized.push(trimmed.to_string());
    }
    normalized
}
