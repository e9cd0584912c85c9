//! Sales pipeline: stage transitions, board aggregates and the board view model.
//!
//! # Responsibility
//! - Validate and apply deal stage moves.
//! - Derive per-stage counts and value sums from the full deal collection.
//! - Provide the view model a kanban board drives with drag-and-drop.

pub mod board;
pub mod drag;
pub mod engine;

pub use board::{build_board, BoardView, StageColumn};
pub use drag::{DropOutcome, PendingMove, PipelineBoard};
pub use engine::{StageTransition, StageTransitionEngine};
