//! Client-side style filtering and sorting for the contact directory.
//!
//! # Responsibility
//! - Provide pure predicates and comparators over contact records.
//! - Keep query semantics identical for service calls and local view models.

pub mod contact_query;
