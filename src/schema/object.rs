//! Object schema validation.
//!
//! This module provides [`ObjectSchema`], the root of every form schema:
//! an ordered field map plus the cross-field [`Refinement`]s attached to
//! it. Beyond validation it exposes the structural primitives the rest of
//! the crate builds on: ordered shape introspection, a non-destructive
//! [`with_override`] copy, and an [`omit`] projection.
//!
//! [`with_override`]: ObjectSchema::with_override
//! [`omit`]: ObjectSchema::omit

use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use stillwater::Validation;

use crate::error::{ValidationIssue, ValidationIssues};
use crate::path::{DataPath, LogicalPath};

use super::node::SchemaNode;
use super::string::value_type_name;

/// A cross-field predicate attached to an object schema.
///
/// A refinement inspects the whole input object at once, independent of
/// per-field constraints. "Password and confirmation must match" is the
/// canonical example. Its failure is reported at the logical path it
/// declares, usually the field a human would fix.
///
/// Refinements are cheap to clone and share their predicate, so the same
/// refinement can be re-attached verbatim to a derived schema.
#[derive(Clone)]
pub struct Refinement {
    predicate: Arc<dyn Fn(&Map<String, Value>) -> bool + Send + Sync>,
    message: String,
    path: LogicalPath,
}

impl Refinement {
    /// Creates a refinement from a predicate, a failure message, and the
    /// logical path the failure is reported at.
    pub fn new<F>(predicate: F, message: impl Into<String>, path: impl Into<LogicalPath>) -> Self
    where
        F: Fn(&Map<String, Value>) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            message: message.into(),
            path: path.into(),
        }
    }

    /// Returns the failure message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the logical path the failure is reported at.
    pub fn path(&self) -> &LogicalPath {
        &self.path
    }

    /// Runs the predicate against an input object.
    pub fn check(&self, data: &Map<String, Value>) -> bool {
        (self.predicate)(data)
    }
}

/// How properties outside the declared shape are handled.
#[derive(Clone, Copy, PartialEq, Eq)]
enum UnknownFields {
    /// Pass unknown properties through untouched (default). Required for
    /// visibility support: hidden fields stay in the data but leave the
    /// derived schema's shape.
    Allow,
    /// Reject unknown properties.
    Deny,
}

/// A schema for validating objects with an ordered, typed shape.
///
/// Field order is declaration order and is semantic: the compiled form
/// structure and all error reports follow it.
///
/// # Example
///
/// ```rust
/// use formwork::Schema;
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("password", Schema::string().min_len(8))
///     .field("confirm", Schema::string())
///     .equal_fields("password", "confirm");
///
/// let result = schema.safe_validate(&json!({
///     "password": "abcdefgh",
///     "confirm": "abcdefgh",
/// }));
/// assert!(result.is_success());
/// ```
#[derive(Clone)]
pub struct ObjectSchema {
    fields: IndexMap<String, Arc<SchemaNode>>,
    refinements: Vec<Refinement>,
    unknown_fields: UnknownFields,
    type_error_message: Option<String>,
}

impl ObjectSchema {
    /// Creates a new object schema with no fields.
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
            refinements: Vec::new(),
            unknown_fields: UnknownFields::Allow,
            type_error_message: None,
        }
    }

    /// Adds a field to the schema.
    ///
    /// A field is required unless its node is an optional wrapper (see
    /// [`Annotate::optional`]). Re-adding a name replaces the previous
    /// node in place, keeping its position.
    ///
    /// [`Annotate::optional`]: super::Annotate::optional
    pub fn field(mut self, name: impl Into<String>, schema: impl Into<SchemaNode>) -> Self {
        self.fields.insert(name.into(), Arc::new(schema.into()));
        self
    }

    /// Returns the ordered field map.
    pub fn shape(&self) -> &IndexMap<String, Arc<SchemaNode>> {
        &self.fields
    }

    /// Attaches a cross-field refinement.
    ///
    /// The predicate receives the whole input object; a `false` return
    /// reports `message` at `path`. Refinements run only after every
    /// per-field validation has passed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use formwork::Schema;
    /// use serde_json::json;
    ///
    /// let schema = Schema::object()
    ///     .field("min", Schema::number())
    ///     .field("max", Schema::number())
    ///     .refine(
    ///         |data| {
    ///             match (data.get("min").and_then(|v| v.as_f64()),
    ///                    data.get("max").and_then(|v| v.as_f64())) {
    ///                 (Some(lo), Some(hi)) => lo <= hi,
    ///                 _ => true,
    ///             }
    ///         },
    ///         "min must not exceed max",
    ///         "max",
    ///     );
    ///
    /// assert!(schema.safe_validate(&json!({"min": 2, "max": 1})).is_failure());
    /// ```
    pub fn refine<F>(
        mut self,
        predicate: F,
        message: impl Into<String>,
        path: impl Into<LogicalPath>,
    ) -> Self
    where
        F: Fn(&Map<String, Value>) -> bool + Send + Sync + 'static,
    {
        self.refinements
            .push(Refinement::new(predicate, message, path));
        self
    }

    /// Attaches an existing refinement verbatim.
    ///
    /// Used to carry refinements onto a derived schema; the predicate,
    /// message, and path are shared, not copied.
    pub fn with_refinement(mut self, refinement: Refinement) -> Self {
        self.refinements.push(refinement);
        self
    }

    /// Requires two fields to hold equal values.
    ///
    /// Sugar over [`refine`]; the failure is reported at `other`. Absent
    /// fields compare as absent: the rule only fires when both are
    /// present and unequal.
    ///
    /// [`refine`]: ObjectSchema::refine
    pub fn equal_fields(self, field: &str, other: &str) -> Self {
        let a = field.to_string();
        let b = other.to_string();
        let message = format!("{} must match {}", other, field);
        let path = other.to_string();
        self.refine(
            move |data| match (data.get(&a), data.get(&b)) {
                (Some(x), Some(y)) => x == y,
                _ => true,
            },
            message,
            path,
        )
    }

    /// Requires `dependent` to be present whenever `condition` holds for
    /// the trigger field's value.
    ///
    /// Sugar over [`refine`]; the failure is reported at `dependent`.
    /// An absent trigger never fires the condition.
    ///
    /// [`refine`]: ObjectSchema::refine
    pub fn require_if<F>(self, trigger: &str, condition: F, dependent: &str) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let trigger = trigger.to_string();
        let name = dependent.to_string();
        let message = format!("{} is required", dependent);
        let path = dependent.to_string();
        self.refine(
            move |data| match data.get(&trigger) {
                Some(value) if condition(value) => {
                    matches!(data.get(&name), Some(v) if !v.is_null())
                }
                _ => true,
            },
            message,
            path,
        )
    }

    /// Returns the attached refinements in attachment order.
    pub fn refinements(&self) -> &[Refinement] {
        &self.refinements
    }

    /// Returns a structural copy with the given fields replaced or added.
    ///
    /// This is a non-destructive extend: untouched fields keep their
    /// nodes and positions, refinements are preserved, and `self` is
    /// never modified. Passing no overrides yields a plain copy.
    pub fn with_override<I, S>(&self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, S)>,
        S: Into<SchemaNode>,
    {
        let mut copy = self.clone();
        for (name, schema) in overrides {
            copy.fields.insert(name, Arc::new(schema.into()));
        }
        copy
    }

    /// Returns a projection of this schema without the named top-level
    /// fields.
    ///
    /// Names not present in the shape are ignored. The projection carries
    /// NO refinements, since a dropped field may be one a predicate reads;
    /// the caller decides which refinements still apply and re-attaches
    /// them via [`with_refinement`]. This holds even when `keys` is
    /// empty.
    ///
    /// [`with_refinement`]: ObjectSchema::with_refinement
    pub fn omit<I, S>(&self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let dropped: HashSet<String> = keys.into_iter().map(|k| k.as_ref().to_string()).collect();
        Self {
            fields: self
                .fields
                .iter()
                .filter(|(name, _)| !dropped.contains(*name))
                .map(|(name, node)| (name.clone(), Arc::clone(node)))
                .collect(),
            refinements: Vec::new(),
            unknown_fields: self.unknown_fields,
            type_error_message: self.type_error_message.clone(),
        }
    }

    /// Rejects properties outside the declared shape.
    ///
    /// By default unknown properties pass through untouched.
    pub fn deny_unknown_fields(mut self) -> Self {
        self.unknown_fields = UnknownFields::Deny;
        self
    }

    /// Sets a custom error message for non-object inputs.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.type_error_message = Some(message.into());
        self
    }

    /// Validates a value against this schema.
    ///
    /// All field failures are accumulated. Refinements run only when
    /// every field validation passed, and each receives the raw input
    /// object, including properties outside the declared shape.
    pub fn validate(
        &self,
        value: &Value,
        path: &DataPath,
    ) -> Validation<Map<String, Value>, ValidationIssues> {
        let obj = match value.as_object() {
            Some(o) => o,
            None => {
                let message = self
                    .type_error_message
                    .clone()
                    .unwrap_or_else(|| "expected object".to_string());
                return Validation::Failure(ValidationIssues::single(
                    ValidationIssue::new(path.clone(), message)
                        .with_code("invalid_type")
                        .with_got(value_type_name(value))
                        .with_expected("object"),
                ));
            }
        };

        let mut issues = Vec::new();
        let mut validated = Map::new();

        for (name, node) in &self.fields {
            let field_path = path.push_field(name);

            match obj.get(name) {
                Some(field_value) => match node.validate(field_value, &field_path) {
                    Validation::Success(v) => {
                        validated.insert(name.clone(), v);
                    }
                    Validation::Failure(e) => {
                        issues.extend(e.into_iter());
                    }
                },
                None if !node.is_optional() => {
                    issues.push(
                        ValidationIssue::new(
                            field_path,
                            format!("required field '{}' is missing", name),
                        )
                        .with_code("required")
                        .with_expected("value"),
                    );
                }
                None => {}
            }
        }

        for (key, extra) in obj {
            if !self.fields.contains_key(key) {
                match self.unknown_fields {
                    UnknownFields::Allow => {
                        validated.insert(key.clone(), extra.clone());
                    }
                    UnknownFields::Deny => {
                        issues.push(
                            ValidationIssue::new(
                                path.push_field(key),
                                format!("unknown field '{}'", key),
                            )
                            .with_code("unknown_field"),
                        );
                    }
                }
            }
        }

        if issues.is_empty() {
            for refinement in &self.refinements {
                if !refinement.check(obj) {
                    let mut issue_path = path.clone();
                    for segment in refinement.path().segments() {
                        issue_path = issue_path.push_field(segment);
                    }
                    issues.push(
                        ValidationIssue::new(issue_path, refinement.message().to_string())
                            .with_code("refinement"),
                    );
                }
            }
        }

        if issues.is_empty() {
            Validation::Success(validated)
        } else {
            Validation::Failure(ValidationIssues::from_vec(issues))
        }
    }

    /// Validates a value from the root path. Never panics; all failures
    /// come back as data.
    pub fn safe_validate(&self, value: &Value) -> Validation<Map<String, Value>, ValidationIssues> {
        self.validate(value, &DataPath::root())
    }
}

impl Default for ObjectSchema {
    fn default() -> Self {
        Self::new()
    }
}
