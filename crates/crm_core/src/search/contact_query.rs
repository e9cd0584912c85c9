//! Contact search, tag filter and sort helpers.
//!
//! # Invariants
//! - Text search is a case-insensitive substring match over name, email,
//!   company and tags; a blank query matches everything.
//! - Tag filtering is an exact, any-of match; an empty filter matches
//!   everything.
//! - Sorting is stable, so equal keys keep store order.

use crate::model::contact::{normalize_tags, Contact};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Field used to order the contact directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContactSortKey {
    #[default]
    Name,
    Email,
    Company,
    LastActivity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactSort {
    pub key: ContactSortKey,
    pub order: SortOrder,
}

impl ContactSort {
    pub fn new(key: ContactSortKey, order: SortOrder) -> Self {
        Self { key, order }
    }
}

/// Combined directory query: text search, tag filter, then sort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactListQuery {
    pub text: Option<String>,
    pub tags: Vec<String>,
    pub sort: Option<ContactSort>,
}

impl ContactListQuery {
    /// Applies this query to `contacts` in place.
    pub fn apply(&self, contacts: &mut Vec<Contact>) {
        if let Some(text) = self.text.as_deref() {
            contacts.retain(|contact| matches_query(contact, text));
        }
        contacts.retain(|contact| matches_any_tag(contact, &self.tags));
        if let Some(sort) = self.sort {
            sort_contacts(contacts, sort);
        }
    }
}

/// Case-insensitive substring match over name, email, company and tags.
pub fn matches_query(contact: &Contact, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    [&contact.name, &contact.email, &contact.company]
        .into_iter()
        .chain(contact.tags.iter())
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Exact any-of tag match. An empty filter matches every contact.
pub fn matches_any_tag<S: AsRef<str>>(contact: &Contact, tags: &[S]) -> bool {
    tags.is_empty() || tags.iter().any(|tag| contact.has_tag(tag.as_ref()))
}

/// Stable sort; string keys compare case-insensitively.
pub fn sort_contacts(contacts: &mut [Contact], sort: ContactSort) {
    contacts.sort_by(|a, b| {
        let ordering = compare_by_key(a, b, sort.key);
        match sort.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

fn compare_by_key(a: &Contact, b: &Contact, key: ContactSortKey) -> Ordering {
    match key {
        ContactSortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        ContactSortKey::Email => a.email.to_lowercase().cmp(&b.email.to_lowercase()),
        ContactSortKey::Company => a.company.to_lowercase().cmp(&b.company.to_lowercase()),
        ContactSortKey::LastActivity => a.last_activity.cmp(&b.last_activity),
    }
}

/// Splits comma-separated form input into a normalized tag list.
pub fn parse_tags(input: &str) -> Vec<String> {
    let parts: Vec<&str> = input.split(',').collect();
    normalize_tags(&parts)
}
