//! Deal use-case service.
//!
//! # Responsibility
//! - Provide deal CRUD, stage moves and pipeline value queries.
//! - Join contact display fields into every returned deal.
//!
//! # Invariants
//! - `update_stage` always writes and refreshes `updated_at`.
//! - `change_stage` skips the write when the stage is already current.
//! - `get_total_value` excludes `closed-lost` and includes `closed-won`.

use super::{simulate_latency, ServiceError, ServiceResult};
use crate::config::{LatencyConfig, OpClass};
use crate::model::deal::{Deal, DealPatch, DealStage, DealView, NewDeal};
use crate::model::id::{ContactId, DealId};
use crate::store::{EntityStore, StoreState};
use log::{info, warn};
use std::sync::Arc;

/// Result of a guarded stage move.
#[derive(Debug, Clone, PartialEq)]
pub struct StageChange {
    pub deal: DealView,
    pub previous_stage: DealStage,
    /// `false` when the deal already was in the target stage.
    pub changed: bool,
}

/// Deal service facade over the shared store.
#[derive(Clone)]
pub struct DealService {
    store: Arc<EntityStore>,
    latency: LatencyConfig,
}

impl DealService {
    pub fn new(store: Arc<EntityStore>, latency: LatencyConfig) -> Self {
        Self { store, latency }
    }

    /// Lists all deals in store order.
    pub async fn get_all(&self) -> Vec<DealView> {
        simulate_latency(&self.latency, OpClass::Read).await;
        let state = self.store.lock().await;
        join_where(&state, |_| true)
    }

    pub async fn get_by_id(&self, id: DealId) -> Option<DealView> {
        simulate_latency(&self.latency, OpClass::Read).await;
        let state = self.store.lock().await;
        state.deals.get(id).cloned().map(|deal| join(&state, deal))
    }

    /// Creates a deal; stage defaults to `lead`.
    ///
    /// # Errors
    /// - `Invalid` for a blank title or a negative/non-finite value.
    pub async fn create(&self, input: NewDeal) -> ServiceResult<DealView> {
        simulate_latency(&self.latency, OpClass::Write).await;
        let mut state = self.store.lock().await;
        let id = state
            .deals
            .next_id()
            .ok_or_else(|| ServiceError::ids_exhausted(DealId::ENTITY))?;
        let deal = Deal::from_new(id, input, self.store.now_ms());
        deal.validate()?;

        state.deals.push(deal.clone());
        info!(
            "event=deal_create module=service status=ok deal_id={id} stage={}",
            deal.stage
        );
        Ok(join(&state, deal))
    }

    /// Shallow-merges `patch` over an existing deal and refreshes `updated_at`.
    pub async fn update(&self, id: DealId, patch: &DealPatch) -> ServiceResult<DealView> {
        simulate_latency(&self.latency, OpClass::Write).await;
        let mut state = self.store.lock().await;
        let Some(current) = state.deals.get(id) else {
            warn!("event=deal_update module=service status=not_found deal_id={id}");
            return Err(ServiceError::not_found(DealId::ENTITY, id));
        };
        let next = patch.merged(current, self.store.now_ms());
        next.validate()?;

        state.deals.replace(next.clone());
        info!("event=deal_update module=service status=ok deal_id={id}");
        Ok(join(&state, next))
    }

    /// Moves a deal to `stage` unconditionally.
    pub async fn update_stage(&self, id: DealId, stage: DealStage) -> ServiceResult<DealView> {
        simulate_latency(&self.latency, OpClass::Stage).await;
        let mut state = self.store.lock().await;
        let change = write_stage(&mut state, id, stage, self.store.now_ms(), true)?;
        Ok(change.deal)
    }

    /// Moves a deal to `stage` unless it already is there.
    ///
    /// The same-stage check and the write happen under one lock, so a
    /// redundant move never refreshes `updated_at`.
    pub async fn change_stage(&self, id: DealId, stage: DealStage) -> ServiceResult<StageChange> {
        simulate_latency(&self.latency, OpClass::Stage).await;
        let mut state = self.store.lock().await;
        write_stage(&mut state, id, stage, self.store.now_ms(), false)
    }

    /// Guarded stage move that also returns every deal as of the move.
    pub(crate) async fn change_stage_listing(
        &self,
        id: DealId,
        stage: DealStage,
    ) -> ServiceResult<(StageChange, Vec<DealView>)> {
        simulate_latency(&self.latency, OpClass::Stage).await;
        let mut state = self.store.lock().await;
        let change = write_stage(&mut state, id, stage, self.store.now_ms(), false)?;
        Ok((change, join_where(&state, |_| true)))
    }

    pub async fn delete(&self, id: DealId) -> ServiceResult<()> {
        simulate_latency(&self.latency, OpClass::Write).await;
        let mut state = self.store.lock().await;
        if state.deals.remove(id).is_none() {
            warn!("event=deal_delete module=service status=not_found deal_id={id}");
            return Err(ServiceError::not_found(DealId::ENTITY, id));
        }
        info!("event=deal_delete module=service status=ok deal_id={id}");
        Ok(())
    }

    pub async fn get_by_stage(&self, stage: DealStage) -> Vec<DealView> {
        simulate_latency(&self.latency, OpClass::Query).await;
        let state = self.store.lock().await;
        join_where(&state, |deal| deal.stage == stage)
    }

    pub async fn get_by_contact_id(&self, contact_id: ContactId) -> Vec<DealView> {
        simulate_latency(&self.latency, OpClass::Query).await;
        let state = self.store.lock().await;
        join_where(&state, |deal| deal.contact_id == contact_id)
    }

    /// Sum of deal values over every stage except `closed-lost`.
    pub async fn get_total_value(&self) -> f64 {
        simulate_latency(&self.latency, OpClass::Query).await;
        let state = self.store.lock().await;
        state
            .deals
            .iter()
            .filter(|deal| deal.stage.counts_toward_total())
            .map(|deal| deal.value)
            .sum()
    }
}

fn write_stage(
    state: &mut StoreState,
    id: DealId,
    stage: DealStage,
    now: i64,
    force: bool,
) -> ServiceResult<StageChange> {
    let Some(current) = state.deals.get(id).cloned() else {
        warn!("event=deal_stage module=service status=not_found deal_id={id} to={stage}");
        return Err(ServiceError::not_found(DealId::ENTITY, id));
    };
    let previous_stage = current.stage;

    if !force && previous_stage == stage {
        info!("event=deal_stage module=service status=skipped deal_id={id} stage={stage}");
        return Ok(StageChange {
            deal: join(state, current),
            previous_stage,
            changed: false,
        });
    }

    let mut next = current;
    next.stage = stage;
    next.updated_at = now;
    state.deals.replace(next.clone());
    info!(
        "event=deal_stage module=service status=ok deal_id={id} from={previous_stage} to={stage}"
    );
    Ok(StageChange {
        deal: join(state, next),
        previous_stage,
        changed: true,
    })
}

fn join(state: &StoreState, deal: Deal) -> DealView {
    let contact = state.contacts.get(deal.contact_id);
    DealView::join(deal, contact)
}

fn join_where(state: &StoreState, predicate: impl Fn(&Deal) -> bool) -> Vec<DealView> {
    state
        .deals
        .iter()
        .filter(|deal| predicate(deal))
        .cloned()
        .map(|deal| join(state, deal))
        .collect()
}
