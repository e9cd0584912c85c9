//! Ordered in-memory collection shared by all record types.

use crate::model::activity::Activity;
use crate::model::contact::Contact;
use crate::model::deal::Deal;
use crate::model::contact::normalize_tags;
use crate::model::id::{ActivityId, ContactId, DealId};
use crate::model::validation::ValidationError;
use std::fmt::Display;

/// Record with a store-assigned integer id.
pub trait Record: Clone {
    type Id: Copy + Eq + Display + From<u64> + Into<u64>;

    /// Entity name used in errors and log events.
    const ENTITY: &'static str;

    fn id(&self) -> Self::Id;

    /// Normalizes a record loaded from outside the services and checks its
    /// invariants.
    fn checked(self) -> Result<Self, ValidationError>;
}

impl Record for Contact {
    type Id = ContactId;
    const ENTITY: &'static str = ContactId::ENTITY;

    fn id(&self) -> ContactId {
        self.id
    }

    fn checked(mut self) -> Result<Self, ValidationError> {
        check_id::<Self>(self.id.get())?;
        self.tags = normalize_tags(&self.tags);
        self.validate()?;
        Ok(self)
    }
}

impl Record for Deal {
    type Id = DealId;
    const ENTITY: &'static str = DealId::ENTITY;

    fn id(&self) -> DealId {
        self.id
    }

    fn checked(self) -> Result<Self, ValidationError> {
        check_id::<Self>(self.id.get())?;
        self.validate()?;
        Ok(self)
    }
}

impl Record for Activity {
    type Id = ActivityId;
    const ENTITY: &'static str = ActivityId::ENTITY;

    fn id(&self) -> ActivityId {
        self.id
    }

    fn checked(self) -> Result<Self, ValidationError> {
        check_id::<Self>(self.id.get())?;
        self.validate()?;
        Ok(self)
    }
}

fn check_id<T: Record>(id: u64) -> Result<(), ValidationError> {
    if id == 0 {
        return Err(ValidationError::InvalidId {
            entity: T::ENTITY,
            raw: id.to_string(),
        });
    }
    Ok(())
}

/// Records in insertion order.
///
/// # Invariants
/// - Ids are unique within one collection.
/// - `next_id` is `max(existing) + 1`, or `1` when empty; `None` once the
///   id space is used up.
#[derive(Debug, Clone)]
pub struct Collection<T: Record> {
    items: Vec<T>,
}

impl<T: Record> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Record> Collection<T> {
    /// Builds a collection, returning the first duplicated id on conflict.
    pub fn from_records(items: Vec<T>) -> Result<Self, T::Id> {
        for (index, item) in items.iter().enumerate() {
            if items[..index].iter().any(|prior| prior.id() == item.id()) {
                return Err(item.id());
            }
        }
        Ok(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn next_id(&self) -> Option<T::Id> {
        let max = self
            .items
            .iter()
            .map(|item| -> u64 { item.id().into() })
            .max()
            .unwrap_or(0);
        max.checked_add(1).map(T::Id::from)
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Replaces the record carrying the same id. Returns `false` when absent.
    pub fn replace(&mut self, item: T) -> bool {
        match self.items.iter_mut().find(|slot| slot.id() == item.id()) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: T::Id) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    /// Removes every record matching `predicate`; returns how many were removed.
    pub fn remove_where(&mut self, predicate: impl Fn(&T) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !predicate(item));
        before - self.items.len()
    }
}
