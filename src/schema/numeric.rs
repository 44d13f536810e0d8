//! Number schema validation.
//!
//! This module provides [`NumberSchema`] for validating numeric values
//! with bound and integrality constraints. All constraint violations are
//! accumulated rather than short-circuiting on the first failure.

use serde_json::Value;
use stillwater::Validation;

use crate::error::{ValidationIssue, ValidationIssues};
use crate::introspect::Constraints;
use crate::path::DataPath;

use super::string::value_type_name;

/// A constraint applied to number values.
#[derive(Clone)]
enum NumberConstraint {
    Min {
        value: f64,
        inclusive: bool,
        message: Option<String>,
    },
    Max {
        value: f64,
        inclusive: bool,
        message: Option<String>,
    },
    Integer {
        message: Option<String>,
    },
    Positive {
        message: Option<String>,
    },
}

/// A schema for validating numeric values.
///
/// Any JSON number is accepted as input; constraints narrow the range and
/// may require integrality.
///
/// # Example
///
/// ```rust
/// use formwork::Schema;
/// use serde_json::json;
///
/// let schema = Schema::number().min(18.0).max(120.0);
///
/// assert!(schema.safe_validate(&json!(36)).is_success());
/// assert!(schema.safe_validate(&json!(15)).is_failure());
/// ```
#[derive(Clone)]
pub struct NumberSchema {
    constraints: Vec<NumberConstraint>,
    type_error_message: Option<String>,
}

impl NumberSchema {
    /// Creates a new number schema with no constraints.
    pub fn new() -> Self {
        Self {
            constraints: Vec::new(),
            type_error_message: None,
        }
    }

    /// Adds an inclusive minimum bound.
    pub fn min(mut self, value: f64) -> Self {
        self.constraints.push(NumberConstraint::Min {
            value,
            inclusive: true,
            message: None,
        });
        self
    }

    /// Adds an exclusive minimum bound.
    pub fn exclusive_min(mut self, value: f64) -> Self {
        self.constraints.push(NumberConstraint::Min {
            value,
            inclusive: false,
            message: None,
        });
        self
    }

    /// Adds an inclusive maximum bound.
    pub fn max(mut self, value: f64) -> Self {
        self.constraints.push(NumberConstraint::Max {
            value,
            inclusive: true,
            message: None,
        });
        self
    }

    /// Adds an exclusive maximum bound.
    pub fn exclusive_max(mut self, value: f64) -> Self {
        self.constraints.push(NumberConstraint::Max {
            value,
            inclusive: false,
            message: None,
        });
        self
    }

    /// Requires the value to be a whole number.
    ///
    /// # Example
    ///
    /// ```rust
    /// use formwork::Schema;
    /// use serde_json::json;
    ///
    /// let schema = Schema::number().integer();
    /// assert!(schema.safe_validate(&json!(42)).is_success());
    /// assert!(schema.safe_validate(&json!(1.5)).is_failure());
    /// ```
    pub fn integer(mut self) -> Self {
        self.constraints
            .push(NumberConstraint::Integer { message: None });
        self
    }

    /// Requires the value to be greater than zero.
    pub fn positive(mut self) -> Self {
        self.constraints
            .push(NumberConstraint::Positive { message: None });
        self
    }

    /// Sets a custom message for the most recent constraint, or the type
    /// error message if no constraints have been added yet.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.constraints.last_mut() {
            match last {
                NumberConstraint::Min { message: m, .. }
                | NumberConstraint::Max { message: m, .. }
                | NumberConstraint::Integer { message: m }
                | NumberConstraint::Positive { message: m } => *m = Some(message.into()),
            }
        } else {
            self.type_error_message = Some(message.into());
        }
        self
    }

    /// Validates a value against this schema, accumulating all violations.
    pub fn validate(&self, value: &Value, path: &DataPath) -> Validation<f64, ValidationIssues> {
        let n = match value.as_f64() {
            Some(n) => n,
            None => {
                let message = self
                    .type_error_message
                    .clone()
                    .unwrap_or_else(|| "expected number".to_string());
                return Validation::Failure(ValidationIssues::single(
                    ValidationIssue::new(path.clone(), message)
                        .with_code("invalid_type")
                        .with_got(value_type_name(value))
                        .with_expected("number"),
                ));
            }
        };

        let issues: Vec<ValidationIssue> = self
            .constraints
            .iter()
            .filter_map(|c| check_constraint(c, n, path))
            .collect();

        if issues.is_empty() {
            Validation::Success(n)
        } else {
            Validation::Failure(ValidationIssues::from_vec(issues))
        }
    }

    /// Validates a value from the root path.
    pub fn safe_validate(&self, value: &Value) -> Validation<f64, ValidationIssues> {
        self.validate(value, &DataPath::root())
    }

    /// Records this schema's constraints in a descriptor bag.
    pub(crate) fn describe(&self, constraints: &mut Constraints) {
        for c in &self.constraints {
            match c {
                NumberConstraint::Min { value, inclusive, .. } => {
                    constraints.min = Some(*value);
                    constraints.min_inclusive = *inclusive;
                }
                NumberConstraint::Max { value, inclusive, .. } => {
                    constraints.max = Some(*value);
                    constraints.max_inclusive = *inclusive;
                }
                NumberConstraint::Integer { .. } => constraints.integer = true,
                NumberConstraint::Positive { .. } => {
                    constraints.min = Some(0.0);
                    constraints.min_inclusive = false;
                }
            }
        }
    }
}

impl Default for NumberSchema {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks a single constraint and returns an issue if it fails.
fn check_constraint(
    constraint: &NumberConstraint,
    value: f64,
    path: &DataPath,
) -> Option<ValidationIssue> {
    match constraint {
        NumberConstraint::Min {
            value: min,
            inclusive,
            message,
        } => {
            let ok = if *inclusive { value >= *min } else { value > *min };
            if !ok {
                let bound = if *inclusive { "at least" } else { "greater than" };
                let msg = message
                    .clone()
                    .unwrap_or_else(|| format!("must be {} {}", bound, min));
                Some(
                    ValidationIssue::new(path.clone(), msg)
                        .with_code("min_value")
                        .with_got(value.to_string())
                        .with_expected(format!("{} {}", bound, min)),
                )
            } else {
                None
            }
        }
        NumberConstraint::Max {
            value: max,
            inclusive,
            message,
        } => {
            let ok = if *inclusive { value <= *max } else { value < *max };
            if !ok {
                let bound = if *inclusive { "at most" } else { "less than" };
                let msg = message
                    .clone()
                    .unwrap_or_else(|| format!("must be {} {}", bound, max));
                Some(
                    ValidationIssue::new(path.clone(), msg)
                        .with_code("max_value")
                        .with_got(value.to_string())
                        .with_expected(format!("{} {}", bound, max)),
                )
            } else {
                None
            }
        }
        NumberConstraint::Integer { message } => {
            if value.fract() != 0.0 {
                let msg = message
                    .clone()
                    .unwrap_or_else(|| "must be a whole number".to_string());
                Some(
                    ValidationIssue::new(path.clone(), msg)
                        .with_code("integer")
                        .with_got(value.to_string())
                        .with_expected("whole number"),
                )
            } else {
                None
            }
        }
        NumberConstraint::Positive { message } => {
            if value <= 0.0 {
                let msg = message
                    .clone()
                    .unwrap_or_else(|| "must be positive".to_string());
                Some(
                    ValidationIssue::new(path.clone(), msg)
                        .with_code("positive")
                        .with_got(value.to_string())
                        .with_expected("greater than 0"),
                )
            } else {
                None
            }
        }
    }
}
