//! Activity use-case service.
//!
//! # Invariants
//! - Every list result is sorted newest first by `timestamp`.
//! - Updates never refresh `timestamp` implicitly.

use super::{simulate_latency, ServiceError, ServiceResult};
use crate::config::{LatencyConfig, OpClass};
use crate::model::activity::{
    sort_newest_first, Activity, ActivityPatch, ActivityType, ActivityView, NewActivity,
};
use crate::model::id::{ActivityId, ContactId};
use crate::store::{EntityStore, StoreState};
use log::{info, warn};
use std::sync::Arc;

/// Activity service facade over the shared store.
#[derive(Clone)]
pub struct ActivityService {
    store: Arc<EntityStore>,
    latency: LatencyConfig,
}

impl ActivityService {
    pub fn new(store: Arc<EntityStore>, latency: LatencyConfig) -> Self {
        Self { store, latency }
    }

    /// Activity feed, newest first.
    pub async fn get_all(&self) -> Vec<ActivityView> {
        simulate_latency(&self.latency, OpClass::Read).await;
        let state = self.store.lock().await;
        feed_where(&state, |_| true)
    }

    pub async fn get_by_id(&self, id: ActivityId) -> Option<ActivityView> {
        simulate_latency(&self.latency, OpClass::Read).await;
        let state = self.store.lock().await;
        state
            .activities
            .get(id)
            .cloned()
            .map(|activity| join(&state, activity))
    }

    /// History for one contact, newest first.
    pub async fn get_by_contact_id(&self, contact_id: ContactId) -> Vec<ActivityView> {
        simulate_latency(&self.latency, OpClass::Query).await;
        let state = self.store.lock().await;
        feed_where(&state, |activity| activity.contact_id == contact_id)
    }

    pub async fn get_by_type(&self, kind: ActivityType) -> Vec<ActivityView> {
        simulate_latency(&self.latency, OpClass::Query).await;
        let state = self.store.lock().await;
        feed_where(&state, |activity| activity.kind == kind)
    }

    /// Logs an activity; `type` defaults to `note`, `timestamp` to now.
    ///
    /// # Errors
    /// - `Invalid` when `content` is blank.
    pub async fn create(&self, input: NewActivity) -> ServiceResult<ActivityView> {
        simulate_latency(&self.latency, OpClass::Write).await;
        let mut state = self.store.lock().await;
        let id = state
            .activities
            .next_id()
            .ok_or_else(|| ServiceError::ids_exhausted(ActivityId::ENTITY))?;
        let activity = Activity::from_new(id, input, self.store.now_ms());
        activity.validate()?;

        state.activities.push(activity.clone());
        info!(
            "event=activity_create module=service status=ok activity_id={id} type={}",
            activity.kind
        );
        Ok(join(&state, activity))
    }

    pub async fn update(&self, id: ActivityId, patch: &ActivityPatch) -> ServiceResult<ActivityView> {
        simulate_latency(&self.latency, OpClass::Write).await;
        let mut state = self.store.lock().await;
        let Some(current) = state.activities.get(id) else {
            warn!("event=activity_update module=service status=not_found activity_id={id}");
            return Err(ServiceError::not_found(ActivityId::ENTITY, id));
        };
        let next = patch.merged(current);
        next.validate()?;

        state.activities.replace(next.clone());
        info!("event=activity_update module=service status=ok activity_id={id}");
        Ok(join(&state, next))
    }

    pub async fn delete(&self, id: ActivityId) -> ServiceResult<()> {
        simulate_latency(&self.latency, OpClass::Write).await;
        let mut state = self.store.lock().await;
        if state.activities.remove(id).is_none() {
            warn!("event=activity_delete module=service status=not_found activity_id={id}");
            return Err(ServiceError::not_found(ActivityId::ENTITY, id));
        }
        info!("event=activity_delete module=service status=ok activity_id={id}");
        Ok(())
    }
}

fn join(state: &StoreState, activity: Activity) -> ActivityView {
    let contact = state.contacts.get(activity.contact_id);
    ActivityView::join(activity, contact)
}

fn feed_where(state: &StoreState, predicate: impl Fn(&Activity) -> bool) -> Vec<ActivityView> {
    let mut feed: Vec<ActivityView> = state
        .activities
        .iter()
        .filter(|activity| predicate(activity))
        .cloned()
        .map(|activity| join(state, activity))
        .collect();
    sort_newest_first(&mut feed);
    feed
}
