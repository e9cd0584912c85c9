//! Deal domain model and pipeline stages.
//!
//! # Invariants
//! - `value` is finite and non-negative.
//! - Any stage may follow any other; every stage write refreshes `updated_at`.

use super::contact::Contact;
use super::id::{ContactId, DealId};
use super::validation::{require_deal_value, require_text, ValidationError};
use super::{Timestamp, UNKNOWN_COMPANY, UNKNOWN_CONTACT};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Sales pipeline stage of a deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DealStage {
    #[default]
    Lead,
    Qualified,
    Proposal,
    Negotiation,
    ClosedWon,
    /// Terminal stage without a board column.
    ClosedLost,
}

impl DealStage {
    /// Every stage, in pipeline order.
    pub const ALL: [DealStage; 6] = [
        DealStage::Lead,
        DealStage::Qualified,
        DealStage::Proposal,
        DealStage::Negotiation,
        DealStage::ClosedWon,
        DealStage::ClosedLost,
    ];

    /// Stages rendered as board columns.
    pub const BOARD: [DealStage; 5] = [
        DealStage::Lead,
        DealStage::Qualified,
        DealStage::Proposal,
        DealStage::Negotiation,
        DealStage::ClosedWon,
    ];

    /// Wire identifier, e.g. `closed-won`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lead => "lead",
            Self::Qualified => "qualified",
            Self::Proposal => "proposal",
            Self::Negotiation => "negotiation",
            Self::ClosedWon => "closed-won",
            Self::ClosedLost => "closed-lost",
        }
    }

    /// Human-readable column title.
    pub fn label(self) -> &'static str {
        match self {
            Self::Lead => "Lead",
            Self::Qualified => "Qualified",
            Self::Proposal => "Proposal",
            Self::Negotiation => "Negotiation",
            Self::ClosedWon => "Closed Won",
            Self::ClosedLost => "Closed Lost",
        }
    }

    /// Whether deals in this stage count toward the open pipeline value.
    pub fn counts_toward_total(self) -> bool {
        self != Self::ClosedLost
    }
}

impl Display for DealStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DealStage {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == raw.trim())
            .ok_or_else(|| ValidationError::UnknownVariant {
                kind: "deal stage",
                raw: raw.to_string(),
            })
    }
}

/// Canonical deal record held by the entity store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: DealId,
    /// Not enforced to reference an existing contact.
    pub contact_id: ContactId,
    pub title: String,
    pub value: f64,
    #[serde(default)]
    pub stage: DealStage,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Deal {
    pub(crate) fn from_new(id: DealId, input: NewDeal, now: Timestamp) -> Self {
        Self {
            id,
            contact_id: input.contact_id,
            title: input.title,
            value: input.value,
            stage: input.stage.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_deal_value(self.value)
    }
}

/// Create input for a deal. Stage defaults to `lead`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDeal {
    pub contact_id: ContactId,
    pub title: String,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub stage: Option<DealStage>,
}

impl NewDeal {
    pub fn new(contact_id: ContactId, title: impl Into<String>, value: f64) -> Self {
        Self {
            contact_id,
            title: title.into(),
            value,
            stage: None,
        }
    }

    pub fn stage(mut self, stage: DealStage) -> Self {
        self.stage = Some(stage);
        self
    }
}

/// Shallow-merge patch for a deal. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DealPatch {
    pub contact_id: Option<ContactId>,
    pub title: Option<String>,
    pub value: Option<f64>,
    pub stage: Option<DealStage>,
}

impl DealPatch {
    pub(crate) fn merged(&self, current: &Deal, now: Timestamp) -> Deal {
        let mut next = current.clone();
        if let Some(contact_id) = self.contact_id {
            next.contact_id = contact_id;
        }
        if let Some(title) = &self.title {
            next.title = title.clone();
        }
        if let Some(value) = self.value {
            next.value = value;
        }
        if let Some(stage) = self.stage {
            next.stage = stage;
        }
        next.updated_at = now;
        next
    }
}

/// Deal joined with display fields of its contact.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealView {
    #[serde(flatten)]
    pub deal: Deal,
    pub contact_name: String,
    pub contact_company: String,
}

impl DealView {
    /// Joins `deal` with `contact`, falling back to placeholders when absent.
    pub fn join(deal: Deal, contact: Option<&Contact>) -> Self {
        let (contact_name, contact_company) = match contact {
            Some(contact) => (contact.name.clone(), contact.company.clone()),
            None => (UNKNOWN_CONTACT.to_string(), UNKNOWN_COMPANY.to_string()),
        };
        Self {
            deal,
            contact_name,
            contact_company,
        }
    }
}
