//! Array schema validation.
//!
//! This module provides [`ArraySchema`] for validating arrays whose items
//! share one schema. Item failures carry index segments in their paths,
//! which the error projector later strips when mapping issues back to
//! logical fields.

use std::sync::Arc;

use serde_json::Value;
use stillwater::Validation;

use crate::error::{ValidationIssue, ValidationIssues};
use crate::path::DataPath;

use super::node::SchemaNode;
use super::string::value_type_name;

/// A constraint applied to array values.
#[derive(Clone)]
enum ArrayConstraint {
    MinItems { min: usize, message: Option<String> },
    MaxItems { max: usize, message: Option<String> },
}

/// A schema for validating arrays with a shared item schema.
///
/// # Example
///
/// ```rust
/// use formwork::Schema;
/// use serde_json::json;
///
/// let schema = Schema::array(
///     Schema::object().field("zip", Schema::string().min_len(5)),
/// )
/// .min_items(1);
///
/// let result = schema.safe_validate(&json!([{"zip": "10001"}]));
/// assert!(result.is_success());
///
/// let result = schema.safe_validate(&json!([]));
/// assert!(result.is_failure());
/// ```
#[derive(Clone)]
pub struct ArraySchema {
    item: Arc<SchemaNode>,
    constraints: Vec<ArrayConstraint>,
    type_error_message: Option<String>,
}

impl ArraySchema {
    /// Creates a new array schema with the given item schema.
    pub fn new(item: impl Into<SchemaNode>) -> Self {
        Self {
            item: Arc::new(item.into()),
            constraints: Vec::new(),
            type_error_message: None,
        }
    }

    /// Adds a minimum item-count constraint.
    pub fn min_items(mut self, min: usize) -> Self {
        self.constraints
            .push(ArrayConstraint::MinItems { min, message: None });
        self
    }

    /// Adds a maximum item-count constraint.
    pub fn max_items(mut self, max: usize) -> Self {
        self.constraints
            .push(ArrayConstraint::MaxItems { max, message: None });
        self
    }

    /// Sets a custom message for the most recent constraint, or the type
    /// error message if no constraints have been added yet.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.constraints.last_mut() {
            match last {
                ArrayConstraint::MinItems { message: m, .. }
                | ArrayConstraint::MaxItems { message: m, .. } => *m = Some(message.into()),
            }
        } else {
            self.type_error_message = Some(message.into());
        }
        self
    }

    /// Returns the shared item schema.
    pub fn item(&self) -> &Arc<SchemaNode> {
        &self.item
    }

    /// Validates a value against this schema.
    ///
    /// Every failing item contributes its issues, each path carrying the
    /// item's index segment.
    pub fn validate(
        &self,
        value: &Value,
        path: &DataPath,
    ) -> Validation<Vec<Value>, ValidationIssues> {
        let items = match value.as_array() {
            Some(a) => a,
            None => {
                let message = self
                    .type_error_message
                    .clone()
                    .unwrap_or_else(|| "expected array".to_string());
                return Validation::Failure(ValidationIssues::single(
                    ValidationIssue::new(path.clone(), message)
                        .with_code("invalid_type")
                        .with_got(value_type_name(value))
                        .with_expected("array"),
                ));
            }
        };

        let mut issues = Vec::new();
        let mut validated = Vec::with_capacity(items.len());

        for constraint in &self.constraints {
            match constraint {
                ArrayConstraint::MinItems { min, message } => {
                    if items.len() < *min {
                        let msg = message
                            .clone()
                            .unwrap_or_else(|| format!("must have at least {} items", min));
                        issues.push(
                            ValidationIssue::new(path.clone(), msg)
                                .with_code("min_items")
                                .with_got(format!("{} items", items.len())),
                        );
                    }
                }
                ArrayConstraint::MaxItems { max, message } => {
                    if items.len() > *max {
                        let msg = message
                            .clone()
                            .unwrap_or_else(|| format!("must have at most {} items", max));
                        issues.push(
                            ValidationIssue::new(path.clone(), msg)
                                .with_code("max_items")
                                .with_got(format!("{} items", items.len())),
                        );
                    }
                }
            }
        }

        for (index, item) in items.iter().enumerate() {
            match self.item.validate(item, &path.push_index(index)) {
                Validation::Success(v) => validated.push(v),
                Validation::Failure(e) => issues.extend(e.into_iter()),
            }
        }

        if issues.is_empty() {
            Validation::Success(validated)
        } else {
            Validation::Failure(ValidationIssues::from_vec(issues))
        }
    }

    /// Validates a value from the root path.
    pub fn safe_validate(&self, value: &Value) -> Validation<Vec<Value>, ValidationIssues> {
        self.validate(value, &DataPath::root())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use serde_json::json;

    fn unwrap_failure<T: std::fmt::Debug, E>(v: Validation<T, E>) -> E {
        v.into_result().unwrap_err()
    }

    #[test]
    fn test_validates_each_item() {
        let schema = ArraySchema::new(Schema::string().min_len(2));
        assert!(schema.safe_validate(&json!(["ab", "cd"])).is_success());

        let issues = unwrap_failure(schema.safe_validate(&json!(["ab", "x"])));
        assert_eq!(issues.first().path.to_string(), "[1]");
    }

    #[test]
    fn test_rejects_non_array() {
        let schema = ArraySchema::new(Schema::string());
        let issues = unwrap_failure(schema.safe_validate(&json!("nope")));
        assert_eq!(issues.first().code, "invalid_type");
    }

    #[test]
    fn test_item_count_constraints() {
        let schema = ArraySchema::new(Schema::number()).min_items(1).max_items(2);
        assert!(schema.safe_validate(&json!([1])).is_success());

        let issues = unwrap_failure(schema.safe_validate(&json!([])));
        assert_eq!(issues.first().code, "min_items");

        let issues = unwrap_failure(schema.safe_validate(&json!([1, 2, 3])));
        assert_eq!(issues.first().code, "max_items");
    }

    #[test]
    fn test_nested_object_items_carry_indexed_paths() {
        let schema = ArraySchema::new(
            Schema::object().field("zip", Schema::string().min_len(5)),
        );

        let issues = unwrap_failure(
            schema.safe_validate(&json!([{"zip": "10001"}, {"zip": "1"}])),
        );
        assert_eq!(issues.first().path.to_string(), "[1].zip");
    }

    #[test]
    fn test_accumulates_across_items() {
        let schema = ArraySchema::new(Schema::number().positive());
        let issues = unwrap_failure(schema.safe_validate(&json!([-1, 2, -3])));
        assert_eq!(issues.len(), 2);
    }
}
