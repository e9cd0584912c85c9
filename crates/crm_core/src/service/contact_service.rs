//! Contact use-case service.
//!
//! # Responsibility
//! - Provide contact CRUD, directory search and tag filtering.
//! - Own the contact delete cascade to deals and activities.
//!
//! # Invariants
//! - Contact delete removes the contact and all records referencing it in
//!   one critical section.
//! - `update` refreshes `last_activity` even when the patch is empty.

use super::{simulate_latency, ServiceError, ServiceResult};
use crate::config::{LatencyConfig, OpClass};
use crate::model::activity::Activity;
use crate::model::contact::{Contact, ContactDetail, ContactPatch, NewContact};
use crate::model::id::ContactId;
use crate::search::contact_query::{matches_any_tag, matches_query, ContactListQuery};
use crate::store::EntityStore;
use log::{info, warn};
use std::sync::Arc;

/// Records removed by a cascading contact delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactDeletion {
    pub contact_id: ContactId,
    pub deals_removed: usize,
    pub activities_removed: usize,
}

/// Contact service facade over the shared store.
#[derive(Clone)]
pub struct ContactService {
    store: Arc<EntityStore>,
    latency: LatencyConfig,
}

impl ContactService {
    pub fn new(store: Arc<EntityStore>, latency: LatencyConfig) -> Self {
        Self { store, latency }
    }

    /// Lists all contacts in store order.
    pub async fn get_all(&self) -> Vec<Contact> {
        simulate_latency(&self.latency, OpClass::Read).await;
        let state = self.store.lock().await;
        state.contacts.iter().cloned().collect()
    }

    /// Gets one contact; `None` when absent.
    pub async fn get_by_id(&self, id: ContactId) -> Option<Contact> {
        simulate_latency(&self.latency, OpClass::Read).await;
        let state = self.store.lock().await;
        state.contacts.get(id).cloned()
    }

    /// Gets one contact with its deals and newest-first activity history.
    pub async fn get_detail(&self, id: ContactId) -> Option<ContactDetail> {
        simulate_latency(&self.latency, OpClass::Read).await;
        let state = self.store.lock().await;
        let contact = state.contacts.get(id)?.clone();
        let deals = state
            .deals
            .iter()
            .filter(|deal| deal.contact_id == id)
            .cloned()
            .collect();
        let mut activities: Vec<Activity> = state
            .activities
            .iter()
            .filter(|activity| activity.contact_id == id)
            .cloned()
            .collect();
        activities.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Some(ContactDetail {
            contact,
            deals,
            activities,
        })
    }

    /// Creates a contact with store-assigned id and timestamps.
    ///
    /// # Errors
    /// - `Invalid` when `name` or `email` is rejected.
    /// - `IdsExhausted` when the highest contact id is `u64::MAX`.
    pub async fn create(&self, input: NewContact) -> ServiceResult<Contact> {
        simulate_latency(&self.latency, OpClass::Write).await;
        let mut state = self.store.lock().await;
        let id = state
            .contacts
            .next_id()
            .ok_or_else(|| ServiceError::ids_exhausted(ContactId::ENTITY))?;
        let contact = Contact::from_new(id, input, self.store.now_ms());
        contact.validate()?;

        state.contacts.push(contact.clone());
        info!("event=contact_create module=service status=ok contact_id={id}");
        Ok(contact)
    }

    /// Shallow-merges `patch` over an existing contact.
    ///
    /// # Errors
    /// - `NotFound` when `id` is absent.
    /// - `Invalid` when the merged record is rejected.
    pub async fn update(&self, id: ContactId, patch: &ContactPatch) -> ServiceResult<Contact> {
        simulate_latency(&self.latency, OpClass::Write).await;
        let mut state = self.store.lock().await;
        let Some(current) = state.contacts.get(id) else {
            warn!("event=contact_update module=service status=not_found contact_id={id}");
            return Err(ServiceError::not_found(ContactId::ENTITY, id));
        };
        let next = patch.merged(current, self.store.now_ms());
        next.validate()?;

        state.contacts.replace(next.clone());
        info!("event=contact_update module=service status=ok contact_id={id}");
        Ok(next)
    }

    /// Deletes a contact and every deal and activity referencing it.
    ///
    /// # Errors
    /// - `NotFound` when `id` is absent; nothing is removed.
    pub async fn delete(&self, id: ContactId) -> ServiceResult<ContactDeletion> {
        simulate_latency(&self.latency, OpClass::Write).await;
        let mut state = self.store.lock().await;
        if state.contacts.remove(id).is_none() {
            warn!("event=contact_delete module=service status=not_found contact_id={id}");
            return Err(ServiceError::not_found(ContactId::ENTITY, id));
        }
        let deals_removed = state.deals.remove_where(|deal| deal.contact_id == id);
        let activities_removed = state
            .activities
            .remove_where(|activity| activity.contact_id == id);

        info!(
            "event=contact_delete module=service status=ok contact_id={id} deals_removed={deals_removed} activities_removed={activities_removed}"
        );
        Ok(ContactDeletion {
            contact_id: id,
            deals_removed,
            activities_removed,
        })
    }

    /// Case-insensitive search over name, email, company and tags.
    pub async fn search(&self, query: &str) -> Vec<Contact> {
        simulate_latency(&self.latency, OpClass::Query).await;
        let state = self.store.lock().await;
        state
            .contacts
            .iter()
            .filter(|contact| matches_query(contact, query))
            .cloned()
            .collect()
    }

    /// Contacts carrying any of `tags`; all contacts when `tags` is empty.
    pub async fn filter_by_tags<S: AsRef<str>>(&self, tags: &[S]) -> Vec<Contact> {
        simulate_latency(&self.latency, OpClass::Query).await;
        let state = self.store.lock().await;
        state
            .contacts
            .iter()
            .filter(|contact| matches_any_tag(contact, tags))
            .cloned()
            .collect()
    }

    /// Directory listing with combined search, tag filter and sort.
    pub async fn list(&self, query: &ContactListQuery) -> Vec<Contact> {
        simulate_latency(&self.latency, OpClass::Query).await;
        let mut contacts: Vec<Contact> = {
            let state = self.store.lock().await;
            state.contacts.iter().cloned().collect()
        };
        query.apply(&mut contacts);
        contacts
    }
}
