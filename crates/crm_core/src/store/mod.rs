//! In-memory entity store.
//!
//! # Responsibility
//! - Own the canonical contact, deal and activity collections.
//! - Supply store-assigned timestamps through an injected [`Clock`].
//!
//! # Invariants
//! - The store is explicitly constructed and shared via `Arc`; there is no
//!   process-wide instance.
//! - Only collection services mutate the store, always while holding the
//!   single state lock, so one operation (including a cascading delete) is
//!   never observed half-applied.

pub mod collection;
pub mod fixtures;

use crate::clock::{Clock, SystemClock};
use crate::model::activity::Activity;
use crate::model::contact::Contact;
use crate::model::deal::Deal;
use crate::model::Timestamp;
use collection::{Collection, Record};
use fixtures::{FixtureError, Fixtures};
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// The three collections guarded together.
#[derive(Debug, Default)]
pub(crate) struct StoreState {
    pub(crate) contacts: Collection<Contact>,
    pub(crate) deals: Collection<Deal>,
    pub(crate) activities: Collection<Activity>,
}

/// Record counts per collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreCounts {
    pub contacts: usize,
    pub deals: usize,
    pub activities: usize,
}

/// Shared in-memory source of truth for all CRM records.
pub struct EntityStore {
    state: Mutex<StoreState>,
    clock: Arc<dyn Clock>,
}

impl EntityStore {
    /// Creates an empty store using wall-clock time.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store with a caller-provided clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            clock,
        }
    }

    /// Creates a store seeded from the bundled fixtures.
    pub fn seeded(clock: Arc<dyn Clock>) -> Result<Self, FixtureError> {
        Self::from_fixtures(Fixtures::bundled()?, clock)
    }

    /// Creates a store seeded from caller-provided record sets.
    ///
    /// Contact tags are normalized on the way in.
    ///
    /// # Errors
    /// - Returns [`FixtureError::Invalid`] for a zero id or a record the
    ///   services would reject.
    /// - Returns [`FixtureError::DuplicateId`] when a set repeats an id.
    pub fn from_fixtures(fixtures: Fixtures, clock: Arc<dyn Clock>) -> Result<Self, FixtureError> {
        let state = StoreState {
            contacts: seed("contacts", fixtures.contacts)?,
            deals: seed("deals", fixtures.deals)?,
            activities: seed("activities", fixtures.activities)?,
        };
        info!(
            "event=store_seed module=store status=ok contacts={} deals={} activities={}",
            state.contacts.len(),
            state.deals.len(),
            state.activities.len()
        );

        Ok(Self {
            state: Mutex::new(state),
            clock,
        })
    }

    /// Returns current record counts.
    pub async fn counts(&self) -> StoreCounts {
        let state = self.state.lock().await;
        StoreCounts {
            contacts: state.contacts.len(),
            deals: state.deals.len(),
            activities: state.activities.len(),
        }
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().await
    }

    pub(crate) fn now_ms(&self) -> Timestamp {
        self.clock.now_ms()
    }
}

fn seed<T: Record>(set: &'static str, records: Vec<T>) -> Result<Collection<T>, FixtureError> {
    let records = records
        .into_iter()
        .map(|record| {
            let id: u64 = record.id().into();
            record.checked().map_err(|source| {
                warn!(
                    "event=store_seed module=store status=invalid set={set} id={id} error={source}"
                );
                FixtureError::Invalid { set, id, source }
            })
        })
        .collect::<Result<Vec<T>, FixtureError>>()?;
    Collection::from_records(records).map_err(|id| FixtureError::DuplicateId {
        set,
        id: id.into(),
    })
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{FixtureError, Fixtures};
    use super::{EntityStore, StoreCounts};
    use crate::clock::ManualClock;
    use crate::model::id::ActivityId;
    use crate::model::validation::ValidationError;
    use std::sync::Arc;

    #[tokio::test]
    async fn seeded_store_holds_every_fixture_record() {
        let fixtures = Fixtures::bundled().unwrap();
        let expected = StoreCounts {
            contacts: fixtures.contacts.len(),
            deals: fixtures.deals.len(),
            activities: fixtures.activities.len(),
        };
        let store = EntityStore::seeded(Arc::new(ManualClock::new(0))).unwrap();
        assert_eq!(store.counts().await, expected);
    }

    #[test]
    fn duplicate_fixture_ids_are_rejected() {
        let mut fixtures = Fixtures::bundled().unwrap();
        let first = fixtures.contacts[0].clone();
        fixtures.contacts.push(first);

        let err = EntityStore::from_fixtures(fixtures, Arc::new(ManualClock::new(0)))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            FixtureError::DuplicateId {
                set: "contacts",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn seeded_contact_tags_are_normalized() {
        let mut fixtures = Fixtures::bundled().unwrap();
        fixtures.contacts[0].tags = vec!["vip".to_string(), "vip".to_string(), " ".to_string()];
        let id = fixtures.contacts[0].id;

        let store = EntityStore::from_fixtures(fixtures, Arc::new(ManualClock::new(0))).unwrap();
        let state = store.lock().await;
        assert_eq!(state.contacts.get(id).unwrap().tags, vec!["vip".to_string()]);
    }

    #[test]
    fn fixture_records_breaking_invariants_are_rejected() {
        let mut fixtures = Fixtures::bundled().unwrap();
        fixtures.deals[0].value = -10.0;
        let id = fixtures.deals[0].id.get();

        let err = EntityStore::from_fixtures(fixtures, Arc::new(ManualClock::new(0)))
            .err()
            .unwrap();
        match err {
            FixtureError::Invalid { set, id: bad, source } => {
                assert_eq!(set, "deals");
                assert_eq!(bad, id);
                assert_eq!(source, ValidationError::InvalidValue(-10.0));
            }
            other => panic!("unexpected error: {other}"),
        }

        let mut fixtures = Fixtures::bundled().unwrap();
        fixtures.contacts[1].email = "nobody".to_string();
        let err = EntityStore::from_fixtures(fixtures, Arc::new(ManualClock::new(0)))
            .err()
            .unwrap();
        assert!(matches!(err, FixtureError::Invalid { set: "contacts", .. }));
    }

    #[test]
    fn zero_fixture_id_is_rejected() {
        let mut fixtures = Fixtures::bundled().unwrap();
        fixtures.activities[0].id = ActivityId(0);

        let err = EntityStore::from_fixtures(fixtures, Arc::new(ManualClock::new(0)))
            .err()
            .unwrap();
        assert!(matches!(
            err,
            FixtureError::Invalid {
                set: "activities",
                id: 0,
                source: ValidationError::InvalidId { .. },
            }
        ));
    }
}
