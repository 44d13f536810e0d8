//! Enumeration schema validation.
//!
//! This module provides [`EnumSchema`] for validating a string drawn from
//! a fixed, ordered option list. Options may be declared as a plain list
//! (label equals value) or as (value, label) pairs; both normalize to the
//! same ordered representation, which the structure compiler surfaces to
//! select widgets.

use serde_json::Value;
use stillwater::Validation;

use crate::error::{ValidationIssue, ValidationIssues};
use crate::path::DataPath;

use super::string::value_type_name;

/// A schema for validating enumerated string values.
///
/// # Example
///
/// ```rust
/// use formwork::Schema;
/// use serde_json::json;
///
/// let schema = Schema::labeled_options([("mx", "México"), ("us", "USA")]);
///
/// assert!(schema.safe_validate(&json!("mx")).is_success());
/// assert!(schema.safe_validate(&json!("México")).is_failure());
/// ```
#[derive(Clone)]
pub struct EnumSchema {
    options: Vec<(String, String)>,
    invalid_message: Option<String>,
    type_error_message: Option<String>,
}

impl EnumSchema {
    /// Creates an enumeration from a plain value list; labels equal
    /// values.
    pub fn of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            options: values
                .into_iter()
                .map(|v| {
                    let v = v.into();
                    (v.clone(), v)
                })
                .collect(),
            invalid_message: None,
            type_error_message: None,
        }
    }

    /// Creates an enumeration from ordered (value, label) pairs.
    pub fn with_labels<I, V, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (V, L)>,
        V: Into<String>,
        L: Into<String>,
    {
        Self {
            options: pairs
                .into_iter()
                .map(|(v, l)| (v.into(), l.into()))
                .collect(),
            invalid_message: None,
            type_error_message: None,
        }
    }

    /// Sets a custom message for values outside the option set.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.invalid_message = Some(message.into());
        self
    }

    /// Returns the ordered (value, label) pairs.
    pub fn options(&self) -> &[(String, String)] {
        &self.options
    }

    /// Validates a value against this schema.
    pub fn validate(&self, value: &Value, path: &DataPath) -> Validation<String, ValidationIssues> {
        let s = match value.as_str() {
            Some(s) => s,
            None => {
                let message = self
                    .type_error_message
                    .clone()
                    .unwrap_or_else(|| "expected string".to_string());
                return Validation::Failure(ValidationIssues::single(
                    ValidationIssue::new(path.clone(), message)
                        .with_code("invalid_type")
                        .with_got(value_type_name(value))
                        .with_expected("string"),
                ));
            }
        };

        if self.options.iter().any(|(v, _)| v == s) {
            Validation::Success(s.to_string())
        } else {
            let values: Vec<&str> = self.options.iter().map(|(v, _)| v.as_str()).collect();
            let message = self
                .invalid_message
                .clone()
                .unwrap_or_else(|| format!("must be one of: {}", values.join(", ")));
            Validation::Failure(ValidationIssues::single(
                ValidationIssue::new(path.clone(), message)
                    .with_code("invalid_option")
                    .with_got(s)
                    .with_expected(format!("one of: {}", values.join(", "))),
            ))
        }
    }

    /// Validates a value from the root path.
    pub fn safe_validate(&self, value: &Value) -> Validation<String, ValidationIssues> {
        self.validate(value, &DataPath::root())
    }
}
