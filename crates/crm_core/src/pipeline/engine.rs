//! Deal stage transition engine.
//!
//! # Responsibility
//! - Apply stage moves requested by the board.
//! - Recompute the full board after every transition.
//!
//! # Invariants
//! - Any stage is reachable from any other in one transition.
//! - A move to the current stage performs no write and keeps `updated_at`.
//! - A missing deal fails with `NotFound` and mutates nothing.
//! - The returned board is read in the same critical section as the move.

use super::board::{build_board, BoardView};
use crate::model::deal::{DealStage, DealView};
use crate::model::id::DealId;
use crate::service::{DealService, ServiceResult};

/// Outcome of one transition request.
#[derive(Debug, Clone, PartialEq)]
pub struct StageTransition {
    pub deal: DealView,
    pub previous_stage: DealStage,
    /// `false` when the request targeted the current stage.
    pub changed: bool,
    /// Board recomputed from the whole deal collection.
    pub board: BoardView,
}

/// Stage transition engine over a deal service.
#[derive(Clone)]
pub struct StageTransitionEngine {
    deals: DealService,
    stages: Vec<DealStage>,
}

impl StageTransitionEngine {
    /// Creates an engine rendering the default board columns.
    pub fn new(deals: DealService) -> Self {
        Self::with_stages(deals, DealStage::BOARD.to_vec())
    }

    /// Creates an engine rendering `stages` in the given order.
    pub fn with_stages(deals: DealService, stages: Vec<DealStage>) -> Self {
        Self { deals, stages }
    }

    pub fn stages(&self) -> &[DealStage] {
        &self.stages
    }

    /// Moves `deal_id` to `target` and returns the updated deal and board.
    pub async fn transition(
        &self,
        deal_id: DealId,
        target: DealStage,
    ) -> ServiceResult<StageTransition> {
        let (change, deals) = self.deals.change_stage_listing(deal_id, target).await?;
        let board = build_board(&deals, &self.stages);
        Ok(StageTransition {
            deal: change.deal,
            previous_stage: change.previous_stage,
            changed: change.changed,
            board,
        })
    }

    /// Current board without a transition.
    pub async fn board(&self) -> BoardView {
        let deals = self.deals.get_all().await;
        build_board(&deals, &self.stages)
    }

    /// All deals, as loaded by a board view model.
    pub(crate) async fn load_deals(&self) -> Vec<DealView> {
        self.deals.get_all().await
    }
}
