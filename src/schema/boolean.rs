//! Boolean schema validation.

use serde_json::Value;
use stillwater::Validation;

use crate::error::{ValidationIssue, ValidationIssues};
use crate::path::DataPath;

use super::string::value_type_name;

/// A schema for validating boolean values.
///
/// Optionally requires the literal `true`, the shape of a mandatory
/// consent checkbox.
///
/// # Example
///
/// ```rust
/// use formwork::Schema;
/// use serde_json::json;
///
/// let schema = Schema::boolean().must_accept("you must accept the terms");
/// assert!(schema.safe_validate(&json!(true)).is_success());
/// assert!(schema.safe_validate(&json!(false)).is_failure());
/// ```
#[derive(Clone)]
pub struct BooleanSchema {
    accept_message: Option<String>,
    type_error_message: Option<String>,
}

impl BooleanSchema {
    /// Creates a new boolean schema.
    pub fn new() -> Self {
        Self {
            accept_message: None,
            type_error_message: None,
        }
    }

    /// Requires the value to be literal `true`.
    pub fn must_accept(mut self, message: impl Into<String>) -> Self {
        self.accept_message = Some(message.into());
        self
    }

    /// Sets a custom type error message.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.type_error_message = Some(message.into());
        self
    }

    /// Returns true if this schema requires literal `true`.
    pub(crate) fn requires_acceptance(&self) -> bool {
        self.accept_message.is_some()
    }

    /// Validates a value against this schema.
    pub fn validate(&self, value: &Value, path: &DataPath) -> Validation<bool, ValidationIssues> {
        let b = match value.as_bool() {
            Some(b) => b,
            None => {
                let message = self
                    .type_error_message
                    .clone()
                    .unwrap_or_else(|| "expected boolean".to_string());
                return Validation::Failure(ValidationIssues::single(
                    ValidationIssue::new(path.clone(), message)
                        .with_code("invalid_type")
                        .with_got(value_type_name(value))
                        .with_expected("boolean"),
                ));
            }
        };

        if let Some(message) = &self.accept_message {
            if !b {
                return Validation::Failure(ValidationIssues::single(
                    ValidationIssue::new(path.clone(), message.clone())
                        .with_code("must_accept")
                        .with_got("false")
                        .with_expected("true"),
                ));
            }
        }

        Validation::Success(b)
    }

    /// Validates a value from the root path.
    pub fn safe_validate(&self, value: &Value) -> Validation<bool, ValidationIssues> {
        self.validate(value, &DataPath::root())
    }
}

impl Default for BooleanSchema {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accepts_both_values() {
        let schema = BooleanSchema::new();
        assert!(schema.validate(&json!(true), &DataPath::root()).is_success());
        assert!(schema.validate(&json!(false), &DataPath::root()).is_success());
    }

    #[test]
    fn test_rejects_non_boolean() {
        let schema = BooleanSchema::new();
        let result = schema.validate(&json!("true"), &DataPath::root());
        let issues = result.into_result().unwrap_err();
        assert_eq!(issues.first().code, "invalid_type");
    }

    #[test]
    fn test_must_accept() {
        let schema = BooleanSchema::new().must_accept("accept the terms");
        assert!(schema.validate(&json!(true), &DataPath::root()).is_success());

        let issues = schema
            .validate(&json!(false), &DataPath::root())
            .into_result()
            .unwrap_err();
        assert_eq!(issues.first().code, "must_accept");
        assert_eq!(issues.first().message, "accept the terms");
    }
}
