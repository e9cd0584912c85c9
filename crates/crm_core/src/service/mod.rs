//! Collection services over the shared entity store.
//!
//! # Responsibility
//! - Expose async CRUD and query use-cases per record type.
//! - Join denormalized contact fields into read results.
//! - Keep callers decoupled from store locking and id assignment.
//!
//! # Invariants
//! - Every operation awaits its simulated latency before touching the store.
//! - Failed operations (`NotFound`, `Invalid`) perform zero mutation.
//! - Returned records are owned copies.

pub mod activity_service;
pub mod contact_service;
pub mod deal_service;

use crate::config::{LatencyConfig, OpClass};
use crate::model::validation::ValidationError;
use crate::store::EntityStore;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub use activity_service::ActivityService;
pub use contact_service::{ContactDeletion, ContactService};
pub use deal_service::{DealService, StageChange};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure of one requested service operation.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// Update/delete target does not exist.
    NotFound { entity: &'static str, id: u64 },
    /// Input was rejected before any mutation.
    Invalid(ValidationError),
    /// Every id of the collection is taken; nothing was created.
    IdsExhausted { entity: &'static str },
}

impl ServiceError {
    pub(crate) fn not_found(entity: &'static str, id: impl Into<u64>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub(crate) fn ids_exhausted(entity: &'static str) -> Self {
        warn!("event=id_assign module=service status=exhausted entity={entity}");
        Self::IdsExhausted { entity }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Invalid(err) => write!(f, "{err}"),
            Self::IdsExhausted { entity } => write!(f, "no {entity} ids left to assign"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound { .. } | Self::IdsExhausted { .. } => None,
            Self::Invalid(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Invalid(value)
    }
}

/// Suspends for the configured latency of `op`.
///
/// A zero latency still yields once, so back-to-back calls interleave the
/// same way they do with a real delay.
pub(crate) async fn simulate_latency(latency: &LatencyConfig, op: OpClass) {
    let delay = latency.duration(op);
    if delay.is_zero() {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(delay).await;
    }
}

/// All three collection services bound to one store.
#[derive(Clone)]
pub struct CrmServices {
    pub contacts: ContactService,
    pub deals: DealService,
    pub activities: ActivityService,
}

impl CrmServices {
    pub fn new(store: Arc<EntityStore>, latency: LatencyConfig) -> Self {
        Self {
            contacts: ContactService::new(Arc::clone(&store), latency),
            deals: DealService::new(Arc::clone(&store), latency),
            activities: ActivityService::new(store, latency),
        }
    }
}
