//! Client-side form checks run before any upstream call.
//!
//! Forms derive [`validator::Validate`]. This module holds the rule functions
//! they share and flattens a [`ValidationErrors`] tree into the one message
//! per field the 422 body carries.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::entities::Amount;

/// Exactly ten ASCII digits.
pub static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("valid phone regex"));

/// Key under which struct-level checks are reported by `validator`.
const SCHEMA_KEY: &str = "__all__";

/// Rejects empty and whitespace-only input.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Requires price text the catalog can read a number out of.
pub fn price_text(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(with_message(ValidationError::new("required"), "Price is required"));
    }
    if Amount::new(value).value().is_none() {
        return Err(with_message(ValidationError::new("amount"), "Price must be a number"));
    }
    Ok(())
}

fn with_message(mut error: ValidationError, message: &'static str) -> ValidationError {
    error.message = Some(message.into());
    error
}

/// A struct-level error reported against `field`.
pub fn field_error(field: &'static str, message: &'static str) -> ValidationError {
    with_message(ValidationError::new(field), message)
}

/// Field name to message, in field order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn add(&mut self, field: String, error: &ValidationError) {
        // First failure per field is the one shown next to it.
        self.0.entry(field).or_insert_with(|| match &error.message {
            Some(message) => message.to_string(),
            None => format!("{} is invalid", error.code),
        });
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut fields = FieldErrors::default();
        for (field, kind) in errors.errors() {
            let ValidationErrorsKind::Field(list) = kind else {
                continue;
            };
            for error in list {
                // Struct-level checks name their field in the error code.
                let key = if *field == SCHEMA_KEY {
                    error.code.to_string()
                } else {
                    field.to_string()
                };
                fields.add(key, error);
            }
        }
        fields
    }
}
