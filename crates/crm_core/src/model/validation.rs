//! Field validation shared by create and update paths.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Rejected input for a domain record or identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Required text field is empty after trim.
    BlankField(&'static str),
    /// Email does not look like `local@domain.tld`.
    InvalidEmail(String),
    /// Deal value is negative, NaN or infinite.
    InvalidValue(f64),
    /// Identifier text is not a positive integer.
    InvalidId { entity: &'static str, raw: String },
    /// Enum text does not name a known variant.
    UnknownVariant { kind: &'static str, raw: String },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "`{field}` must not be blank"),
            Self::InvalidEmail(value) => write!(f, "invalid email address: `{value}`"),
            Self::InvalidValue(value) => {
                write!(f, "deal value must be finite and non-negative, got {value}")
            }
            Self::InvalidId { entity, raw } => write!(f, "invalid {entity} id: `{raw}`"),
            Self::UnknownVariant { kind, raw } => write!(f, "unknown {kind}: `{raw}`"),
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}

pub(crate) fn require_email(value: &str) -> Result<(), ValidationError> {
    require_text("email", value)?;
    if !EMAIL_RE.is_match(value.trim()) {
        return Err(ValidationError::InvalidEmail(value.to_string()));
    }
    Ok(())
}

pub(crate) fn require_deal_value(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidValue(value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{require_deal_value, require_email, require_text, ValidationError};

    #[test]
    fn blank_text_is_rejected() {
        assert_eq!(
            require_text("name", "  \t"),
            Err(ValidationError::BlankField("name"))
        );
        assert!(require_text("name", "Ada").is_ok());
    }

    #[test]
    fn email_shape_is_checked() {
        assert!(require_email("sarah@techcorp.com").is_ok());
        assert!(matches!(
            require_email("not-an-email"),
            Err(ValidationError::InvalidEmail(_))
        ));
        assert_eq!(
            require_email(""),
            Err(ValidationError::BlankField("email"))
        );
    }

    #[test]
    fn deal_value_must_be_finite_and_non_negative() {
        assert!(require_deal_value(0.0).is_ok());
        assert!(require_deal_value(-1.0).is_err());
        assert!(require_deal_value(f64::NAN).is_err());
        assert!(require_deal_value(f64::INFINITY).is_err());
    }
}
