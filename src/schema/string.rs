//! String schema validation.
//!
//! This module provides [`StringSchema`] for validating string values with
//! length, pattern, and format constraints. All constraint violations are
//! accumulated rather than short-circuiting on the first failure.

use regex::Regex;
use serde_json::Value;
use stillwater::Validation;

use crate::error::{ValidationIssue, ValidationIssues};
use crate::introspect::Constraints;
use crate::path::DataPath;

/// A constraint applied to string values.
#[derive(Clone)]
enum StringConstraint {
    MinLength {
        min: usize,
        message: Option<String>,
    },
    MaxLength {
        max: usize,
        message: Option<String>,
    },
    Pattern {
        regex: Regex,
        pattern_str: String,
        message: Option<String>,
    },
    Email {
        message: Option<String>,
    },
    Url {
        message: Option<String>,
    },
}

/// A schema for validating string values.
///
/// # Example
///
/// ```rust
/// use formwork::Schema;
/// use serde_json::json;
///
/// let schema = Schema::string()
///     .min_len(3)
///     .max_len(20)
///     .pattern(r"^[a-z]+$")
///     .unwrap();
///
/// // Accumulates all failures: too short AND pattern mismatch
/// let result = schema.safe_validate(&json!("AB"));
/// assert!(result.is_failure());
/// ```
#[derive(Clone)]
pub struct StringSchema {
    constraints: Vec<StringConstraint>,
    type_error_message: Option<String>,
}

impl StringSchema {
    /// Creates a new string schema with no constraints.
    pub fn new() -> Self {
        Self {
            constraints: Vec::new(),
            type_error_message: None,
        }
    }

    /// Adds a minimum length constraint, counted in Unicode scalar values.
    pub fn min_len(mut self, min: usize) -> Self {
        self.constraints
            .push(StringConstraint::MinLength { min, message: None });
        self
    }

    /// Adds a maximum length constraint, counted in Unicode scalar values.
    pub fn max_len(mut self, max: usize) -> Self {
        self.constraints
            .push(StringConstraint::MaxLength { max, message: None });
        self
    }

    /// Adds a regex pattern constraint.
    ///
    /// Returns an error if the pattern does not compile.
    ///
    /// # Example
    ///
    /// ```rust
    /// use formwork::Schema;
    /// use serde_json::json;
    ///
    /// let schema = Schema::string().pattern(r"^\d{10}$").unwrap();
    /// assert!(schema.safe_validate(&json!("5512345678")).is_success());
    /// assert!(schema.safe_validate(&json!("phone")).is_failure());
    /// ```
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        self.constraints.push(StringConstraint::Pattern {
            regex,
            pattern_str: pattern.to_string(),
            message: None,
        });
        Ok(self)
    }

    /// Requires the string to look like an email address.
    ///
    /// The check is structural (non-empty local part, `@`, dotted domain);
    /// real deliverability is out of scope.
    pub fn email(mut self) -> Self {
        self.constraints
            .push(StringConstraint::Email { message: None });
        self
    }

    /// Requires the string to look like a URL (`scheme://rest`).
    pub fn url(mut self) -> Self {
        self.constraints.push(StringConstraint::Url { message: None });
        self
    }

    /// Sets a custom message for the most recent constraint, or the type
    /// error message if no constraints have been added yet.
    ///
    /// # Example
    ///
    /// ```rust
    /// use formwork::Schema;
    ///
    /// let schema = Schema::string()
    ///     .min_len(8)
    ///     .error("password must be at least 8 characters");
    /// ```
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.constraints.last_mut() {
            match last {
                StringConstraint::MinLength { message: m, .. }
                | StringConstraint::MaxLength { message: m, .. }
                | StringConstraint::Pattern { message: m, .. }
                | StringConstraint::Email { message: m }
                | StringConstraint::Url { message: m } => *m = Some(message.into()),
            }
        } else {
            self.type_error_message = Some(message.into());
        }
        self
    }

    /// Validates a value against this schema, accumulating all violations.
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

        let issues: Vec<ValidationIssue> = self
            .constraints
            .iter()
            .filter_map(|c| check_constraint(c, s, path))
            .collect();

        if issues.is_empty() {
            Validation::Success(s.to_string())
        } else {
            Validation::Failure(ValidationIssues::from_vec(issues))
        }
    }

    /// Validates a value from the root path.
    pub fn safe_validate(&self, value: &Value) -> Validation<String, ValidationIssues> {
        self.validate(value, &DataPath::root())
    }

    /// Records this schema's constraints in a descriptor bag.
    pub(crate) fn describe(&self, constraints: &mut Constraints) {
        for c in &self.constraints {
            match c {
                StringConstraint::MinLength { min, .. } => constraints.min_length = Some(*min),
                StringConstraint::MaxLength { max, .. } => constraints.max_length = Some(*max),
                StringConstraint::Pattern { pattern_str, .. } => {
                    constraints.pattern = Some(pattern_str.clone())
                }
                StringConstraint::Email { .. } => constraints.email = true,
                StringConstraint::Url { .. } => constraints.url = true,
            }
        }
    }
}

impl Default for StringSchema {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks a single constraint and returns an issue if it fails.
fn check_constraint(
    constraint: &StringConstraint,
    value: &str,
    path: &DataPath,
) -> Option<ValidationIssue> {
    match constraint {
        StringConstraint::MinLength { min, message } => {
            let len = value.chars().count();
            if len < *min {
                let msg = message
                    .clone()
                    .unwrap_or_else(|| format!("must be at least {} characters", min));
                Some(
                    ValidationIssue::new(path.clone(), msg)
                        .with_code("min_length")
                        .with_got(format!("{} characters", len))
                        .with_expected(format!("at least {} characters", min)),
                )
            } else {
                None
            }
        }
        StringConstraint::MaxLength { max, message } => {
            let len = value.chars().count();
            if len > *max {
                let msg = message
                    .clone()
                    .unwrap_or_else(|| format!("must be at most {} characters", max));
                Some(
                    ValidationIssue::new(path.clone(), msg)
                        .with_code("max_length")
                        .with_got(format!("{} characters", len))
                        .with_expected(format!("at most {} characters", max)),
                )
            } else {
                None
            }
        }
        StringConstraint::Pattern {
            regex,
            pattern_str,
            message,
        } => {
            if !regex.is_match(value) {
                let msg = message
                    .clone()
                    .unwrap_or_else(|| format!("must match pattern {}", pattern_str));
                Some(
                    ValidationIssue::new(path.clone(), msg)
                        .with_code("pattern")
                        .with_expected(format!("match for {}", pattern_str)),
                )
            } else {
                None
            }
        }
        StringConstraint::Email { message } => {
            if !looks_like_email(value) {
                let msg = message
                    .clone()
                    .unwrap_or_else(|| "must be a valid email address".to_string());
                Some(
                    ValidationIssue::new(path.clone(), msg)
                        .with_code("email")
                        .with_expected("email address"),
                )
            } else {
                None
            }
        }
        StringConstraint::Url { message } => {
            if !looks_like_url(value) {
                let msg = message
                    .clone()
                    .unwrap_or_else(|| "must be a valid URL".to_string());
                Some(
                    ValidationIssue::new(path.clone(), msg)
                        .with_code("url")
                        .with_expected("URL"),
                )
            } else {
                None
            }
        }
    }
}

/// Structural email shape: one `@`, non-empty local part, dotted domain.
fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    if value.chars().any(char::is_whitespace) || domain.contains('@') {
        return false;
    }
    domain.split('.').count() >= 2 && domain.split('.').all(|part| !part.is_empty())
}

/// Structural URL shape: alphabetic scheme, `://`, non-empty remainder.
fn looks_like_url(value: &str) -> bool {
    let Some((scheme, rest)) = value.split_once("://") else {
        return false;
    };
    !scheme.is_empty()
        && scheme.chars().all(|c| c.is_ascii_alphabetic())
        && !rest.is_empty()
        && !value.chars().any(char::is_whitespace)
}

/// Returns the JSON type name for a value.
pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
