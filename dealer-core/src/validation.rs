//! Ordered, first-violation validation on top of `validator`.
//!
//! `validator` reports every violation in an unordered map. Callers of this
//! API expect a single message for the first rule broken, in field order, the
//! way a schema validator aborting early would report it. Presence is checked
//! here rather than with `#[validate(required)]` so that the same input type
//! can serve both full and partial payloads.

use std::str::FromStr;

use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::error::DomainError;

/// Whether an update must carry the full schema or only the changed fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateMode {
    #[default]
    Full,
    Partial,
}

impl FromStr for UpdateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(UpdateMode::Full),
            "partial" => Ok(UpdateMode::Partial),
            other => Err(format!("unknown update mode {other:?}, expected full or partial")),
        }
    }
}

/// A request payload whose fields are all optional at the type level.
pub trait Schema: Validate {
    /// Field names in reporting order.
    const FIELDS: &'static [&'static str];
    /// Fields that must be present in a full payload.
    const REQUIRED: &'static [&'static str];

    fn is_present(&self, field: &str) -> bool;
}

/// Validates a full payload: required fields present, every present field valid.
pub fn validate_full<T: Schema>(input: &T) -> Result<(), DomainError> {
    first_violation(input, true)
}

/// Validates only the supplied fields; at least one must be supplied.
pub fn validate_partial<T: Schema>(input: &T) -> Result<(), DomainError> {
    if !T::FIELDS.iter().any(|field| input.is_present(field)) {
        return Err(DomainError::validation(
            "at least one field must be provided",
        ));
    }
    first_violation(input, false)
}

pub fn validate_update<T: Schema>(input: &T, mode: UpdateMode) -> Result<(), DomainError> {
    match mode {
        UpdateMode::Full => validate_full(input),
        UpdateMode::Partial => validate_partial(input),
    }
}

fn first_violation<T: Schema>(input: &T, require: bool) -> Result<(), DomainError> {
    let errors = input.validate().err();
    let field_errors = errors
        .as_ref()
        .map(ValidationErrors::field_errors)
        .unwrap_or_default();

    for field in T::FIELDS {
        if require && T::REQUIRED.contains(field) && !input.is_present(field) {
            return Err(DomainError::validation(format!("{field} is required")));
        }
        if let Some(violation) = field_errors.get(*field).and_then(|errs| errs.first()) {
            let message = violation
                .message
                .as_ref()
                .map(|msg| msg.to_string())
                .unwrap_or_else(|| format!("{field} is invalid"));
            return Err(DomainError::validation(message));
        }
    }
    Ok(())
}
