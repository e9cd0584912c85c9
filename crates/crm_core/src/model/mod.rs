//! Domain model for contacts, deals and activities.
//!
//! # Responsibility
//! - Define canonical records owned by the entity store.
//! - Define create/patch inputs and their validation rules.
//! - Define denormalized read views returned to callers.
//!
//! # Invariants
//! - Every record is identified by a typed, store-assigned integer id.
//! - Denormalized fields (`contact_name`, `contact_company`) are never stored.

pub mod activity;
pub mod contact;
pub mod deal;
pub mod id;
pub mod validation;

/// Unix epoch milliseconds.
pub type Timestamp = i64;

/// Fallback display name for dangling contact references.
pub const UNKNOWN_CONTACT: &str = "Unknown Contact";
/// Fallback company for dangling contact references.
pub const UNKNOWN_COMPANY: &str = "Unknown Company";
