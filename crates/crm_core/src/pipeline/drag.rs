//! Board view model driven by drag-and-drop.
//!
//! # Responsibility
//! - Hold the deals a board has loaded plus the deal being dragged.
//! - Apply a drop optimistically, then commit or roll back with the
//!   engine's answer.
//!
//! # Invariants
//! - A drop with nothing dragged, or onto the deal's current column, is
//!   cancelled without calling the engine.
//! - Every drop clears the drag, whatever its outcome.
//! - A failed transition restores the deal exactly as it was before the drop.

use super::board::{build_board, BoardView};
use super::engine::StageTransitionEngine;
use crate::model::deal::{DealStage, DealView};
use crate::model::id::DealId;
use crate::service::{ServiceError, ServiceResult};
use log::warn;

/// What a drop did to local state.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// Nothing dragged, unknown deal, or same column.
    Cancelled,
    /// Server accepted the move; local deal replaced with its result.
    Moved(DealView),
    /// Server rejected the move; local deal rolled back.
    Failed(ServiceError),
}

/// Optimistic move awaiting the engine's answer.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMove {
    pub deal_id: DealId,
    pub target: DealStage,
    original: DealView,
}

/// Local board state for one pipeline page.
#[derive(Debug, Clone)]
pub struct PipelineBoard {
    deals: Vec<DealView>,
    stages: Vec<DealStage>,
    dragged: Option<DealId>,
}

impl PipelineBoard {
    pub fn from_deals(deals: Vec<DealView>, stages: Vec<DealStage>) -> Self {
        Self {
            deals,
            stages,
            dragged: None,
        }
    }

    /// Loads every deal through `engine` using its column layout.
    pub async fn load(engine: &StageTransitionEngine) -> Self {
        Self::from_deals(engine.load_deals().await, engine.stages().to_vec())
    }

    pub fn deals(&self) -> &[DealView] {
        &self.deals
    }

    pub fn dragged(&self) -> Option<DealId> {
        self.dragged
    }

    /// Columns derived from local state.
    pub fn columns(&self) -> BoardView {
        build_board(&self.deals, &self.stages)
    }

    /// Marks `deal_id` as dragged. Returns `false` for unknown deals.
    pub fn start_drag(&mut self, deal_id: DealId) -> bool {
        if self.position(deal_id).is_none() {
            return false;
        }
        self.dragged = Some(deal_id);
        true
    }

    pub fn cancel_drag(&mut self) {
        self.dragged = None;
    }

    /// Clears the drag and, when it is a real move, applies it locally.
    pub fn begin_drop(&mut self, target: DealStage) -> Option<PendingMove> {
        let deal_id = self.dragged.take()?;
        let index = self.position(deal_id)?;
        let local = &mut self.deals[index];
        if local.deal.stage == target {
            return None;
        }

        let original = local.clone();
        local.deal.stage = target;
        Some(PendingMove {
            deal_id,
            target,
            original,
        })
    }

    /// Commits or rolls back a pending move.
    pub fn settle(&mut self, pending: PendingMove, result: ServiceResult<DealView>) -> DropOutcome {
        match result {
            Ok(updated) => {
                self.put(updated.clone());
                DropOutcome::Moved(updated)
            }
            Err(err) => {
                warn!(
                    "event=board_drop module=pipeline status=rolled_back deal_id={} to={} error={}",
                    pending.deal_id, pending.target, err
                );
                self.put(pending.original);
                DropOutcome::Failed(err)
            }
        }
    }

    /// Drops the dragged deal on `target` and waits for the engine.
    pub async fn drop_on(
        &mut self,
        target: DealStage,
        engine: &StageTransitionEngine,
    ) -> DropOutcome {
        let Some(pending) = self.begin_drop(target) else {
            return DropOutcome::Cancelled;
        };
        let result = engine
            .transition(pending.deal_id, pending.target)
            .await
            .map(|transition| transition.deal);
        self.settle(pending, result)
    }

    fn position(&self, deal_id: DealId) -> Option<usize> {
        self.deals.iter().position(|view| view.deal.id == deal_id)
    }

    fn put(&mut self, view: DealView) {
        match self.position(view.deal.id) {
            Some(index) => self.deals[index] = view,
            None => self.deals.push(view),
        }
    }
}
