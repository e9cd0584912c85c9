//! Typed record identifiers.
//!
//! # Invariants
//! - Ids are positive integers assigned by the store as `max + 1`.
//! - Parsing from text never coerces: non-numeric or zero input is rejected.

use super::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $entity:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Entity name used in errors and log events.
            pub const ENTITY: &'static str = $entity;

            /// Returns the raw integer value.
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                match raw.trim().parse::<u64>() {
                    Ok(value) if value > 0 => Ok(Self(value)),
                    _ => Err(ValidationError::InvalidId {
                        entity: $entity,
                        raw: raw.to_string(),
                    }),
                }
            }
        }
    };
}

entity_id!(
    /// Store-assigned contact identifier.
    ContactId,
    "contact"
);
entity_id!(
    /// Store-assigned deal identifier.
    DealId,
    "deal"
);
entity_id!(
    /// Store-assigned activity identifier.
    ActivityId,
    "activity"
);

#[cfg(test)]
mod tests {
    use super::{ContactId, DealId};
    use crate::model::validation::ValidationError;

    #[test]
    fn parse_accepts_positive_integers() {
        assert_eq!(" 42 ".parse::<DealId>(), Ok(DealId(42)));
    }

    #[test]
    fn parse_rejects_instead_of_coercing() {
        for raw in ["", "abc", "12abc", "-3", "0", "1.5"] {
            let err = raw.parse::<ContactId>().unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidId { entity: "contact", .. }),
                "`{raw}` should be rejected"
            );
        }
    }
}
