//! Core domain logic for the pipeline CRM.
//! This crate is the single source of truth for business invariants.

pub mod clock;
pub mod config;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod search;
pub mod service;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CrmConfig, LatencyConfig, OpClass};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::activity::{Activity, ActivityPatch, ActivityType, ActivityView, NewActivity};
pub use model::contact::{Contact, ContactDetail, ContactPatch, NewContact};
pub use model::deal::{Deal, DealPatch, DealStage, DealView, NewDeal};
pub use model::id::{ActivityId, ContactId, DealId};
pub use model::validation::ValidationError;
pub use model::Timestamp;
pub use pipeline::{
    build_board, BoardView, DropOutcome, PipelineBoard, StageColumn, StageTransition,
    StageTransitionEngine,
};
pub use search::contact_query::{
    parse_tags, ContactListQuery, ContactSort, ContactSortKey, SortOrder,
};
pub use service::{
    ActivityService, ContactDeletion, ContactService, CrmServices, DealService, ServiceError,
    ServiceResult, StageChange,
};
pub use store::fixtures::{FixtureError, Fixtures};
pub use store::{EntityStore, StoreCounts};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
