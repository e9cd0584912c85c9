//! Per-stage board aggregates.
//!
//! Derived on every read from the full deal list; nothing here is stored.

use crate::model::deal::{DealStage, DealView};
use serde::Serialize;

/// One board column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageColumn {
    pub stage: DealStage,
    pub label: &'static str,
    pub deals: Vec<DealView>,
    pub count: usize,
    pub total_value: f64,
}

/// Columns in the requested stage order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoardView {
    pub columns: Vec<StageColumn>,
}

impl BoardView {
    pub fn column(&self, stage: DealStage) -> Option<&StageColumn> {
        self.columns.iter().find(|column| column.stage == stage)
    }

    /// Sum of column totals.
    pub fn total_value(&self) -> f64 {
        self.columns.iter().map(|column| column.total_value).sum()
    }

    pub fn deal_count(&self) -> usize {
        self.columns.iter().map(|column| column.count).sum()
    }
}

/// Groups `deals` into one column per entry of `stages`.
///
/// Deals whose stage is not listed are left out of every column.
pub fn build_board(deals: &[DealView], stages: &[DealStage]) -> BoardView {
    let columns = stages
        .iter()
        .map(|&stage| {
            let in_stage: Vec<DealView> = deals
                .iter()
                .filter(|view| view.deal.stage == stage)
                .cloned()
                .collect();
            let total_value: f64 = in_stage.iter().map(|view| view.deal.value).sum();
            StageColumn {
                stage,
                label: stage.label(),
                count: in_stage.len(),
                deals: in_stage,
                total_value,
            }
        })
        .collect();

    BoardView { columns }
}
