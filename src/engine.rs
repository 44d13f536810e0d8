//! The form engine.
//!
//! One [`FormEngine`] instance owns everything a live form session needs:
//! the root schema, the compiled structure, the data object, the
//! per-field error map, and the session's validation state. All
//! operations are synchronous and run on a single logical timeline:
//! each is triggered by a discrete input event (value change, blur,
//! property mutation, submit) and completes before the next begins.
//!
//! Per field, the session moves through a small state machine:
//! untouched → validated-ok ⇄ validated-error. A field that has been
//! validated individually at least once becomes permanently eligible for
//! cross-field (refinement) errors; the eligibility set only grows.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde_json::{Map, Value};
use stillwater::Validation;

use crate::path::LogicalPath;
use crate::project;
use crate::registry::{WidgetConfig, WidgetRegistry};
use crate::revise;
use crate::schema::ObjectSchema;
use crate::structure::{CompileError, RuntimeProps, Structure, StructureItem};
use crate::value;

/// Per-field validation lifecycle state within one form session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldState {
    /// Never validated individually.
    #[default]
    Untouched,
    /// Last individual validation passed.
    ValidatedOk,
    /// Last validation (individual or projected cross-field) failed.
    ValidatedError,
}

/// The outcome of a single-field validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldOutcome {
    /// True when the field currently has no errors.
    pub success: bool,
    /// Messages to display next to the field.
    pub errors: Vec<String>,
}

impl FieldOutcome {
    fn clean() -> Self {
        Self {
            success: true,
            errors: Vec::new(),
        }
    }
}

/// The outcome of a whole-form validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    /// True when every visible field and refinement passed.
    pub success: bool,
    /// The complete per-field error map after the pass.
    pub errors: BTreeMap<LogicalPath, Vec<String>>,
}

/// A live form session over one schema.
///
/// # Example
///
/// ```rust
/// use formwork::{FormEngine, LogicalPath, Schema};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("email", Schema::string().email())
///     .field("age", Schema::number().min(18.0));
///
/// let mut form = FormEngine::new(schema).unwrap();
/// form.set_value(&LogicalPath::new("email"), json!("ada@example.com"));
/// form.set_value(&LogicalPath::new("age"), json!(36));
///
/// let report = form.validate_visible();
/// assert!(report.success);
/// ```
pub struct FormEngine {
    schema: ObjectSchema,
    structure: Structure,
    registry: WidgetRegistry,
    data: Value,
    errors: BTreeMap<LogicalPath, Vec<String>>,
    previously_errored: BTreeSet<LogicalPath>,
    states: BTreeMap<LogicalPath, FieldState>,
}

impl FormEngine {
    /// Compiles the schema and creates an engine with an empty registry.
    ///
    /// # Errors
    ///
    /// Returns the compiler's [`CompileError`] for a defective form
    /// definition; this is the only fallible step of construction.
    pub fn new(schema: ObjectSchema) -> Result<Self, CompileError> {
        Self::with_registry(schema, WidgetRegistry::new())
    }

    /// Compiles the schema and creates an engine using the given widget
    /// registry.
    pub fn with_registry(
        schema: ObjectSchema,
        registry: WidgetRegistry,
    ) -> Result<Self, CompileError> {
        let structure = Structure::compile(&schema)?;
        Ok(Self {
            schema,
            structure,
            registry,
            data: Value::Object(Map::new()),
            errors: BTreeMap::new(),
            previously_errored: BTreeSet::new(),
            states: BTreeMap::new(),
        })
    }

    /// Returns the compiled structure.
    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    /// Returns the current form data.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Returns the current per-field error map.
    pub fn errors(&self) -> &BTreeMap<LogicalPath, Vec<String>> {
        &self.errors
    }

    /// Returns a field's session state.
    pub fn field_state(&self, path: &LogicalPath) -> FieldState {
        self.states.get(path).copied().unwrap_or_default()
    }

    /// Reads the stored value at a logical path.
    pub fn value(&self, path: &LogicalPath) -> Option<&Value> {
        value::get(&self.data, path)
    }

    /// Stores a value and validates the field, returning its outcome.
    pub fn set_value(&mut self, path: &LogicalPath, new_value: Value) -> FieldOutcome {
        value::set(&mut self.data, path, new_value);
        self.validate_field(path)
    }

    /// Validates the field at a blur event.
    pub fn blur(&mut self, path: &LogicalPath) -> FieldOutcome {
        self.validate_field(path)
    }

    /// Toggles a field's visibility. Hiding a field clears its displayed
    /// errors; its stored value is left in the data.
    ///
    /// Returns false when the path names no field.
    pub fn set_visible(&mut self, path: &LogicalPath, visible: bool) -> bool {
        let found = self.structure.set_visible(path, visible);
        if found && !visible {
            self.errors.remove(path);
        }
        found
    }

    /// Returns mutable access to a field's runtime properties for
    /// non-visibility patches (disabled, size, mask, widget).
    pub fn runtime_props_mut(&mut self, path: &LogicalPath) -> Option<&mut RuntimeProps> {
        self.structure.get_mut(path).map(|item| &mut item.runtime)
    }

    /// Resolves a field's named widget through the registry.
    ///
    /// A field naming an unregistered widget yields `None`; keeping the
    /// unresolved name around is the renderer's concern, never an error.
    pub fn widget_config(&self, path: &LogicalPath) -> Option<Arc<WidgetConfig>> {
        let name = self.structure.get(path)?.runtime.widget.as_deref()?;
        self.registry.get(name)
    }

    /// Validates one field against its own schema node.
    ///
    /// An optional field whose value is absent, null, or the empty string
    /// passes without consulting the schema and clears any recorded
    /// error. A hidden field likewise passes and clears. Otherwise the
    /// field enters the validated state (making it permanently eligible
    /// for cross-field errors) and on success the engine re-checks
    /// refinements over the visible subset, projecting any failures onto
    /// eligible fields.
    pub fn validate_field(&mut self, path: &LogicalPath) -> FieldOutcome {
        let outcome = match self.structure.get(path) {
            Some(item) if item.validator().is_some() => {
                let current = value::get(&self.data, path);
                if !item.runtime.is_visible() || is_empty_and_optional(current, item.required) {
                    None
                } else {
                    Some(validate_field_value(item, current))
                }
            }
            _ => return FieldOutcome::clean(),
        };

        match outcome {
            None => {
                self.errors.remove(path);
                self.states.insert(path.clone(), FieldState::ValidatedOk);
                FieldOutcome::clean()
            }
            Some(outcome) => {
                self.previously_errored.insert(path.clone());
                if outcome.success {
                    self.errors.remove(path);
                    self.states.insert(path.clone(), FieldState::ValidatedOk);
                    self.sweep_cross_field();

                    let errors = self.errors.get(path).cloned().unwrap_or_default();
                    FieldOutcome {
                        success: errors.is_empty(),
                        errors,
                    }
                } else {
                    self.errors.insert(path.clone(), outcome.errors.clone());
                    self.states.insert(path.clone(), FieldState::ValidatedError);
                    outcome
                }
            }
        }
    }

    /// Re-validates the visible subset and projects refinement failures
    /// onto previously-errored fields. Runs after every single-field
    /// success so cross-field rules surface as soon as both sides have
    /// been touched.
    fn sweep_cross_field(&mut self) {
        if let Validation::Failure(issues) =
            revise::validate_visible(&self.schema, &self.structure, &self.data)
        {
            let displayed = project::classify(&issues, &self.previously_errored);
            for (field, messages) in displayed {
                self.states.insert(field.clone(), FieldState::ValidatedError);
                self.errors.insert(field, messages);
            }
        }
    }

    /// Runs single-field validation for every visible leaf with a
    /// validator, in declaration order.
    ///
    /// Container items (objects, arrays of objects) recurse into their
    /// children instead of validating as a whole; the derived-schema pass
    /// covers them.
    pub fn validate_all_fields(&mut self) {
        let mut leaves = Vec::new();
        self.structure.traverse(|path, item| {
            if item.children.is_none() && item.validator().is_some() {
                leaves.push(path.clone());
            }
        });
        for path in leaves {
            self.validate_field(&path);
        }
    }

    /// Whole-form validation: the submit path.
    ///
    /// Sweeps every visible field individually, then validates the data
    /// against the schema revised to the current visibility. On submit
    /// nothing is debounced: every failure is recorded and every failing
    /// field becomes eligible for future cross-field errors.
    pub fn validate_visible(&mut self) -> ValidationReport {
        self.validate_all_fields();

        if self.errors.is_empty() {
            if let Validation::Failure(issues) =
                revise::validate_visible(&self.schema, &self.structure, &self.data)
            {
                for issue in issues.iter() {
                    let field = issue.path.logical();
                    if field.is_empty() {
                        continue;
                    }
                    self.previously_errored.insert(field.clone());
                    self.states.insert(field.clone(), FieldState::ValidatedError);
                    self.errors.insert(field, vec![issue.message.clone()]);
                }
            }
        }

        ValidationReport {
            success: self.errors.is_empty(),
            errors: self.errors.clone(),
        }
    }

    /// Non-mutating validity probe for enabling a submit button: true
    /// when no errors are displayed and the visible subset currently
    /// validates.
    pub fn check_validity(&self) -> bool {
        self.errors.is_empty()
            && revise::validate_visible(&self.schema, &self.structure, &self.data).is_success()
    }

    /// Pre-fills the form from an existing record.
    ///
    /// Walks the record recursively: values whose path names a compiled
    /// field are stored; nested objects recurse; keys the structure does
    /// not know are skipped. No validation runs; populated fields stay
    /// untouched until the user reaches them.
    pub fn populate(&mut self, record: &Value) {
        let mut assignments = Vec::new();
        collect_assignments(&self.structure, None, record, &mut assignments);
        for (path, stored) in assignments {
            value::set(&mut self.data, &path, stored);
        }
    }
}

/// Checks one value against a structure item's own validator, with no
/// session state involved.
///
/// This is the stateless single-field contract: grouping items (no
/// validator) always pass, and an optional field whose value is absent,
/// null, or the empty string passes without consulting the schema.
///
/// # Example
///
/// ```rust
/// use formwork::{engine, LogicalPath, Schema, Structure};
/// use serde_json::json;
///
/// let schema = Schema::object().field("age", Schema::number().min(18.0));
/// let structure = Structure::compile(&schema).unwrap();
/// let item = structure.get(&LogicalPath::new("age")).unwrap();
///
/// assert!(engine::validate_field_value(item, Some(&json!(20))).success);
/// assert!(!engine::validate_field_value(item, Some(&json!(15))).success);
/// ```
pub fn validate_field_value(item: &StructureItem, current: Option<&Value>) -> FieldOutcome {
    let Some(validator) = item.validator() else {
        return FieldOutcome::clean();
    };
    if is_empty_and_optional(current, item.required) {
        return FieldOutcome::clean();
    }

    match validator.safe_validate(current.unwrap_or(&Value::Null)) {
        Validation::Success(_) => FieldOutcome::clean(),
        Validation::Failure(issues) => FieldOutcome {
            success: false,
            errors: issues.iter().map(|i| i.message.clone()).collect(),
        },
    }
}

/// Collects (path, value) pairs from a record, descending into nested
/// objects that correspond to container items.
fn collect_assignments(
    structure: &Structure,
    parent: Option<&LogicalPath>,
    record: &Value,
    out: &mut Vec<(LogicalPath, Value)>,
) {
    let Some(map) = record.as_object() else {
        return;
    };

    for (key, entry) in map {
        let path = match parent {
            Some(p) => p.join(key),
            None => LogicalPath::new(key.clone()),
        };

        match structure.get(&path) {
            Some(item) if item.children.is_some() && entry.is_object() => {
                collect_assignments(structure, Some(&path), entry, out);
            }
            Some(_) => out.push((path, entry.clone())),
            None if entry.is_object() => {
                collect_assignments(structure, Some(&path), entry, out);
            }
            None => {}
        }
    }
}

/// An optional field counts as valid while empty: absent, null, or the
/// empty string.
fn is_empty_and_optional(current: Option<&Value>, required: bool) -> bool {
    if required {
        return false;
    }
    match current {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Annotate, Schema};
    use serde_json::json;

    fn engine() -> FormEngine {
        let schema = Schema::object()
            .field("email", Schema::string().email())
            .field("age", Schema::number().min(18.0))
            .field("bio", Schema::string().min_len(10).optional());
        FormEngine::new(schema).unwrap()
    }

    #[test]
    fn test_set_value_stores_and_validates() {
        let mut form = engine();
        let outcome = form.set_value(&"email".into(), json!("not-an-email"));

        assert!(!outcome.success);
        assert_eq!(form.value(&"email".into()), Some(&json!("not-an-email")));
        assert_eq!(form.field_state(&"email".into()), FieldState::ValidatedError);
    }

    #[test]
    fn test_field_recovers_on_valid_value() {
        let mut form = engine();
        form.set_value(&"email".into(), json!("bad"));
        let outcome = form.set_value(&"email".into(), json!("a@b.com"));

        assert!(outcome.success);
        assert_eq!(form.field_state(&"email".into()), FieldState::ValidatedOk);
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_empty_optional_field_is_valid() {
        let mut form = engine();
        let outcome = form.set_value(&"bio".into(), json!(""));
        assert!(outcome.success);
        assert_eq!(form.field_state(&"bio".into()), FieldState::ValidatedOk);

        // A non-empty value is validated normally
        let outcome = form.set_value(&"bio".into(), json!("short"));
        assert!(!outcome.success);
    }

    #[test]
    fn test_missing_required_field_fails_on_blur() {
        let mut form = engine();
        let outcome = form.blur(&"email".into());
        assert!(!outcome.success);
    }

    #[test]
    fn test_hidden_field_validates_clean_and_clears() {
        let mut form = engine();
        form.set_value(&"age".into(), json!(10));
        assert!(!form.errors().is_empty());

        assert!(form.set_visible(&"age".into(), false));
        assert!(form.errors().is_empty());
        assert!(form.blur(&"age".into()).success);
    }

    #[test]
    fn test_validate_visible_scenario() {
        let mut form = engine();
        form.set_value(&"email".into(), json!("not-an-email"));
        form.set_value(&"age".into(), json!(15));

        let report = form.validate_visible();
        assert!(!report.success);
        assert_eq!(report.errors.len(), 2);

        form.set_value(&"email".into(), json!("a@b.com"));
        form.set_value(&"age".into(), json!(20));
        let report = form.validate_visible();
        assert!(report.success);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_check_validity_is_non_mutating() {
        let mut form = engine();
        assert!(!form.check_validity());

        form.set_value(&"email".into(), json!("a@b.com"));
        form.set_value(&"age".into(), json!(20));
        assert!(form.check_validity());
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_populate_fills_known_fields_without_validating() {
        let schema = Schema::object()
            .field("email", Schema::string().email())
            .field(
                "address",
                Schema::object()
                    .field("street", Schema::string())
                    .field("zip", Schema::string()),
            );
        let mut form = FormEngine::new(schema).unwrap();

        form.populate(&json!({
            "email": "ada@example.com",
            "address": {"street": "Main St", "zip": "10001"},
            "unknown": "skipped",
        }));

        assert_eq!(form.value(&"email".into()), Some(&json!("ada@example.com")));
        assert_eq!(
            form.value(&LogicalPath::new("address.zip")),
            Some(&json!("10001"))
        );
        assert_eq!(form.value(&"unknown".into()), None);
        assert_eq!(form.field_state(&"email".into()), FieldState::Untouched);
    }

    #[test]
    fn test_widget_resolution_through_registry() {
        let registry = WidgetRegistry::new();
        registry
            .register("switch", WidgetConfig::new().property("variant", json!("toggle")))
            .unwrap();

        let schema = Schema::object()
            .field("active", Schema::boolean().widget("switch"))
            .field("orphan", Schema::boolean().widget("unregistered"));
        let form = FormEngine::with_registry(schema, registry).unwrap();

        assert!(form.widget_config(&"active".into()).is_some());
        // Unregistered names stay unresolved hints, not errors
        assert!(form.widget_config(&"orphan".into()).is_none());
    }

    #[test]
    fn test_runtime_props_patching() {
        let mut form = engine();
        let props = form.runtime_props_mut(&"email".into()).unwrap();
        props.disabled = Some(true);
        props.size = Some(6);

        let item = form.structure().get(&"email".into()).unwrap();
        assert_eq!(item.runtime.disabled, Some(true));
        assert_eq!(item.runtime.size, Some(6));
    }

    #[test]
    fn test_is_empty_and_optional() {
        assert!(is_empty_and_optional(None, false));
        assert!(is_empty_and_optional(Some(&json!(null)), false));
        assert!(is_empty_and_optional(Some(&json!("")), false));
        assert!(!is_empty_and_optional(Some(&json!("x")), false));
        assert!(!is_empty_and_optional(None, true));
        assert!(!is_empty_and_optional(Some(&json!(0)), false));
    }
}
