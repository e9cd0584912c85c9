//! Static seed data embedded in the crate.
//!
//! # Invariants
//! - Fixtures are parsed once per store construction and never reloaded.
//! - Ids must be unique per record set; duplicates are rejected.
//! - Records must satisfy the same invariants the services enforce.

use crate::model::activity::Activity;
use crate::model::contact::Contact;
use crate::model::deal::Deal;
use crate::model::validation::ValidationError;
use serde::de::DeserializeOwned;
use std::error::Error;
use std::fmt::{Display, Formatter};

const CONTACTS_JSON: &str = include_str!("../../fixtures/contacts.json");
const DEALS_JSON: &str = include_str!("../../fixtures/deals.json");
const ACTIVITIES_JSON: &str = include_str!("../../fixtures/activities.json");

/// Fixture decode or consistency failure.
#[derive(Debug)]
pub enum FixtureError {
    /// JSON for one record set failed to decode.
    Decode {
        set: &'static str,
        source: serde_json::Error,
    },
    /// Two records in one set share an id.
    DuplicateId { set: &'static str, id: u64 },
    /// A record breaks a model invariant.
    Invalid {
        set: &'static str,
        id: u64,
        source: ValidationError,
    },
}

impl Display for FixtureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode { set, source } => write!(f, "invalid {set} fixture: {source}"),
            Self::DuplicateId { set, id } => write!(f, "duplicate id {id} in {set} fixture"),
            Self::Invalid { set, id, source } => {
                write!(f, "invalid record {id} in {set} fixture: {source}")
            }
        }
    }
}

impl Error for FixtureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Decode { source, .. } => Some(source),
            Self::DuplicateId { .. } => None,
            Self::Invalid { source, .. } => Some(source),
        }
    }
}

/// Three record sets used to seed an entity store.
#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    pub contacts: Vec<Contact>,
    pub deals: Vec<Deal>,
    pub activities: Vec<Activity>,
}

impl Fixtures {
    /// Parses the seed data bundled with the crate.
    pub fn bundled() -> Result<Self, FixtureError> {
        Self::from_json(CONTACTS_JSON, DEALS_JSON, ACTIVITIES_JSON)
    }

    /// Parses caller-provided JSON arrays for each record set.
    pub fn from_json(contacts: &str, deals: &str, activities: &str) -> Result<Self, FixtureError> {
        Ok(Self {
            contacts: decode("contacts", contacts)?,
            deals: decode("deals", deals)?,
            activities: decode("activities", activities)?,
        })
    }
}

fn decode<T: DeserializeOwned>(set: &'static str, json: &str) -> Result<Vec<T>, FixtureError> {
    serde_json::from_str(json).map_err(|source| FixtureError::Decode { set, source })
}
