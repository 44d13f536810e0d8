//! Compiled form structure.
//!
//! [`Structure::compile`] walks an object schema and produces one
//! [`StructureItem`] per field, in declaration order, recursively. The
//! structure is the renderer-agnostic description of a form: what each
//! field is, what it requires, and the mutable [`RuntimeProps`] the
//! hosting engine patches at runtime (visibility, disabled, size, mask).
//!
//! The schema-derived shape of a structure never changes after
//! compilation; only runtime properties do. Every compiled item keeps a
//! shared reference to its original schema node, so single-field
//! validation reuses exactly the rules the author declared.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::introspect::{self, Constraints, DescriptorKind};
use crate::path::LogicalPath;
use crate::schema::{ObjectSchema, SchemaNode};

/// A schema-compilation inconsistency.
///
/// This is the only error in the crate that is a `Result`-level failure:
/// it marks a defect in the form definition itself, not a user-input
/// condition, and is surfaced immediately instead of being defaulted
/// away.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// The compiler has no field mapping for a schema node.
    #[error("unsupported schema node at '{path}': {found}")]
    UnsupportedNode {
        /// Logical path of the offending field.
        path: LogicalPath,
        /// Short description of the node variant found.
        found: String,
    },
}

/// The kind tag of a compiled field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free-text input.
    Text,
    /// Numeric input.
    Number,
    /// Boolean input.
    Boolean,
    /// Option-list input; forced whenever the schema enumerates values.
    Select,
    /// Nested object owning a child structure.
    Object,
    /// Array field owning the per-element child structure.
    Array,
    /// Pure presentation grouping (section); carries no value and no
    /// validator.
    Group,
}

/// Mutable runtime properties of a compiled field.
///
/// This is the only part of a [`StructureItem`] that changes after
/// compilation. Unset means "default": a field with `visible: None` is
/// visible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuntimeProps {
    /// `Some(false)` hides the field and removes it from whole-form
    /// validation.
    pub visible: Option<bool>,
    /// Disables user input.
    pub disabled: Option<bool>,
    /// Relative display size.
    pub size: Option<u32>,
    /// Extra css class for the rendering layer.
    pub class_name: Option<String>,
    /// Input mask pattern (interpreted by the rendering layer).
    pub mask: Option<String>,
    /// Custom widget name, resolved through the widget registry.
    pub widget: Option<String>,
    /// Unrecognized property-bag entries, passed through untouched.
    pub extra: serde_json::Map<String, Value>,
}

impl RuntimeProps {
    /// Seeds runtime properties from an annotation property bag.
    ///
    /// Known keys map to the typed fields; anything else lands in
    /// `extra`. Non-object bags produce defaults.
    pub fn from_value(bag: &Value) -> Self {
        let mut props = Self::default();
        let Some(map) = bag.as_object() else {
            return props;
        };
        for (key, value) in map {
            match key.as_str() {
                "visible" => props.visible = value.as_bool(),
                "disabled" => props.disabled = value.as_bool(),
                "size" => props.size = value.as_u64().map(|s| s as u32),
                "className" => props.class_name = value.as_str().map(String::from),
                "mask" => props.mask = value.as_str().map(String::from),
                "widget" => props.widget = value.as_str().map(String::from),
                _ => {
                    props.extra.insert(key.clone(), value.clone());
                }
            }
        }
        props
    }

    /// Returns true unless visibility was explicitly turned off.
    pub fn is_visible(&self) -> bool {
        self.visible != Some(false)
    }
}

/// One compiled field descriptor.
pub struct StructureItem {
    /// Kind tag.
    pub kind: FieldKind,
    /// Display label from schema annotations.
    pub label: Option<String>,
    /// Derived from schema optionality.
    pub required: bool,
    /// Password-entry flag from schema annotations.
    pub password: bool,
    /// Descriptive constraint bag (validation authority stays with the
    /// schema node).
    pub constraints: Constraints,
    /// Mutable runtime properties.
    pub runtime: RuntimeProps,
    /// Child structure for object/array/group items.
    pub children: Option<Structure>,
    validator: Option<Arc<SchemaNode>>,
}

impl StructureItem {
    /// Creates a presentation-only grouping item.
    ///
    /// Groups carry no value and no validator; they exist so hosts can
    /// splice section headers into a structure.
    pub fn group(label: impl Into<String>) -> Self {
        Self {
            kind: FieldKind::Group,
            label: Some(label.into()),
            required: false,
            password: false,
            constraints: Constraints::default(),
            runtime: RuntimeProps::default(),
            children: None,
            validator: None,
        }
    }

    /// Returns the original schema node this field was compiled from.
    ///
    /// Shared, not owned: the node is the exact rule set the author
    /// declared, reused for single-field validation. Grouping items have
    /// none.
    pub fn validator(&self) -> Option<&Arc<SchemaNode>> {
        self.validator.as_ref()
    }
}

/// The compiled, ordered field map of a form.
///
/// # Example
///
/// ```rust
/// use formwork::{LogicalPath, Schema, Structure};
///
/// let schema = Schema::object()
///     .field("email", Schema::string().email())
///     .field("security", Schema::object()
///         .field("password", Schema::string().min_len(8)));
///
/// let structure = Structure::compile(&schema).unwrap();
/// assert!(structure.get(&LogicalPath::new("security.password")).is_some());
/// ```
#[derive(Default)]
pub struct Structure {
    items: IndexMap<String, StructureItem>,
}

impl Structure {
    /// Compiles an object schema into a structure.
    ///
    /// Field order equals declaration order. Enumerated constraints force
    /// [`FieldKind::Select`] regardless of the leaf type; nested shapes
    /// become [`FieldKind::Object`] items with recursively compiled
    /// children; array items compile their element shape the same way.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::UnsupportedNode`] for nodes with no field
    /// mapping (bare literals, empty unions).
    pub fn compile(schema: &ObjectSchema) -> Result<Self, CompileError> {
        Self::compile_fields(schema.shape(), None)
    }

    fn compile_fields(
        fields: &IndexMap<String, Arc<SchemaNode>>,
        parent: Option<&LogicalPath>,
    ) -> Result<Self, CompileError> {
        let mut items = IndexMap::new();

        for (key, node) in fields {
            let path = match parent {
                Some(p) => p.join(key),
                None => LogicalPath::new(key.clone()),
            };
            items.insert(key.clone(), Self::compile_item(node, &path)?);
        }

        Ok(Self { items })
    }

    fn compile_item(node: &Arc<SchemaNode>, path: &LogicalPath) -> Result<StructureItem, CompileError> {
        let descriptor = introspect::extract(node);

        let (kind, children) = match &descriptor.kind {
            DescriptorKind::Unsupported(found) => {
                return Err(CompileError::UnsupportedNode {
                    path: path.clone(),
                    found: (*found).to_string(),
                });
            }
            DescriptorKind::Object => {
                let shape = descriptor.shape.as_ref().expect("object descriptor has a shape");
                let children = Self::compile_fields(shape, Some(path))?;
                (FieldKind::Object, Some(children))
            }
            DescriptorKind::Array => {
                let item = descriptor.item.as_ref().expect("array descriptor has an item");
                let children = match introspect::extract(item).shape {
                    Some(shape) => Some(Self::compile_fields(&shape, Some(path))?),
                    None => None,
                };
                (FieldKind::Array, children)
            }
            DescriptorKind::Enumerated => (FieldKind::Select, None),
            DescriptorKind::Text => {
                // Enumerated constraints force a select even on a plain leaf
                if descriptor.constraints.options.is_some() {
                    (FieldKind::Select, None)
                } else {
                    (FieldKind::Text, None)
                }
            }
            DescriptorKind::Number => {
                if descriptor.constraints.options.is_some() {
                    (FieldKind::Select, None)
                } else {
                    (FieldKind::Number, None)
                }
            }
            DescriptorKind::Boolean => (FieldKind::Boolean, None),
        };

        let mut runtime = descriptor
            .properties
            .as_ref()
            .map(RuntimeProps::from_value)
            .unwrap_or_default();
        if runtime.widget.is_none() {
            runtime.widget = descriptor.widget.clone();
        }

        Ok(StructureItem {
            kind,
            label: descriptor.label.clone(),
            required: descriptor.required,
            password: descriptor.password,
            constraints: descriptor.constraints,
            runtime,
            children,
            validator: Some(Arc::clone(node)),
        })
    }

    /// Returns the item at a logical path, descending through children.
    pub fn get(&self, path: &LogicalPath) -> Option<&StructureItem> {
        let mut segments = path.segments();
        let mut item = self.items.get(segments.next()?)?;
        for segment in segments {
            item = item.children.as_ref()?.items.get(segment)?;
        }
        Some(item)
    }

    /// Returns the item at a logical path, mutably.
    pub fn get_mut(&mut self, path: &LogicalPath) -> Option<&mut StructureItem> {
        let mut segments = path.segments();
        let mut item = self.items.get_mut(segments.next()?)?;
        for segment in segments {
            item = item.children.as_mut()?.items.get_mut(segment)?;
        }
        Some(item)
    }

    /// Inserts a host-authored item (typically a [`StructureItem::group`])
    /// at the top level, after the compiled fields.
    pub fn insert(&mut self, key: impl Into<String>, item: StructureItem) {
        self.items.insert(key.into(), item);
    }

    /// Returns the number of top-level items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the structure has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates the top-level items in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &StructureItem)> {
        self.items.iter()
    }

    /// Visits every item depth-first in declaration order, passing its
    /// logical path. Children are always visited, regardless of the
    /// parent's own runtime state.
    pub fn traverse<F>(&self, mut visit: F)
    where
        F: FnMut(&LogicalPath, &StructureItem),
    {
        self.traverse_inner(None, &mut visit);
    }

    fn traverse_inner<F>(&self, parent: Option<&LogicalPath>, visit: &mut F)
    where
        F: FnMut(&LogicalPath, &StructureItem),
    {
        for (key, item) in &self.items {
            let path = match parent {
                Some(p) => p.join(key),
                None => LogicalPath::new(key.clone()),
            };
            visit(&path, item);
            if let Some(children) = &item.children {
                children.traverse_inner(Some(&path), visit);
            }
        }
    }

    /// Sets a field's visibility flag. Returns false if the path names no
    /// item.
    pub fn set_visible(&mut self, path: &LogicalPath, visible: bool) -> bool {
        match self.get_mut(path) {
            Some(item) => {
                item.runtime.visible = Some(visible);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Annotate, Schema};
    use serde_json::json;

    fn sample_schema() -> ObjectSchema {
        Schema::object()
            .field("email", Schema::string().email().label("Email"))
            .field("age", Schema::number().min(18.0))
            .field("country", Schema::options(["MX", "US"]))
            .field(
                "security",
                Schema::object()
                    .field("password", Schema::string().min_len(8).password())
                    .field("confirmPassword", Schema::string()),
            )
    }

    #[test]
    fn test_compile_preserves_declaration_order() {
        let structure = Structure::compile(&sample_schema()).unwrap();
        let keys: Vec<_> = structure.iter().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys, vec!["email", "age", "country", "security"]);
    }

    #[test]
    fn test_compile_is_deterministic() {
        let schema = sample_schema();
        let a = Structure::compile(&schema).unwrap();
        let b = Structure::compile(&schema).unwrap();

        let mut seen_a = Vec::new();
        a.traverse(|path, item| seen_a.push((path.clone(), item.kind, item.required)));
        let mut seen_b = Vec::new();
        b.traverse(|path, item| seen_b.push((path.clone(), item.kind, item.required)));

        assert_eq!(seen_a, seen_b);
    }

    #[test]
    fn test_kinds_and_required() {
        let structure = Structure::compile(&sample_schema()).unwrap();

        assert_eq!(structure.get(&"email".into()).unwrap().kind, FieldKind::Text);
        assert_eq!(structure.get(&"age".into()).unwrap().kind, FieldKind::Number);
        assert_eq!(
            structure.get(&"country".into()).unwrap().kind,
            FieldKind::Select
        );
        assert_eq!(
            structure.get(&"security".into()).unwrap().kind,
            FieldKind::Object
        );
        assert!(structure.get(&"email".into()).unwrap().required);
    }

    #[test]
    fn test_nested_children_compiled() {
        let structure = Structure::compile(&sample_schema()).unwrap();
        let item = structure.get(&LogicalPath::new("security.password")).unwrap();
        assert_eq!(item.kind, FieldKind::Text);
        assert!(item.password);
        assert_eq!(item.constraints.min_length, Some(8));
    }

    #[test]
    fn test_optional_field_not_required() {
        let schema = Schema::object().field("bio", Schema::string().optional());
        let structure = Structure::compile(&schema).unwrap();
        assert!(!structure.get(&"bio".into()).unwrap().required);
    }

    #[test]
    fn test_validator_is_shared_not_copied() {
        let schema = sample_schema();
        let structure = Structure::compile(&schema).unwrap();

        let item = structure.get(&"email".into()).unwrap();
        let shared = item.validator().unwrap();
        assert!(Arc::ptr_eq(shared, &schema.shape()["email"]));
    }

    #[test]
    fn test_array_of_objects_compiles_element_children() {
        let schema = Schema::object().field(
            "addresses",
            Schema::array(
                Schema::object()
                    .field("street", Schema::string())
                    .field("zip", Schema::string().min_len(5)),
            ),
        );
        let structure = Structure::compile(&schema).unwrap();

        let item = structure.get(&"addresses".into()).unwrap();
        assert_eq!(item.kind, FieldKind::Array);
        assert!(structure.get(&LogicalPath::new("addresses.zip")).is_some());
    }

    #[test]
    fn test_array_of_scalars_has_no_children() {
        let schema = Schema::object().field("tags", Schema::array(Schema::string()));
        let structure = Structure::compile(&schema).unwrap();
        assert!(structure.get(&"tags".into()).unwrap().children.is_none());
    }

    #[test]
    fn test_bare_literal_field_is_a_compile_error() {
        let schema = Schema::object().field("broken", Schema::literal(json!("x")));
        let result = Structure::compile(&schema);
        assert!(matches!(
            result,
            Err(CompileError::UnsupportedNode { ref path, .. }) if path.as_str() == "broken"
        ));
    }

    #[test]
    fn test_runtime_props_seeded_from_annotations() {
        let schema = Schema::object().field(
            "code",
            Schema::string().props(json!({
                "visible": false,
                "size": 6,
                "mask": "999-999",
                "custom": "kept",
            })),
        );
        let structure = Structure::compile(&schema).unwrap();
        let item = structure.get(&"code".into()).unwrap();

        assert_eq!(item.runtime.visible, Some(false));
        assert!(!item.runtime.is_visible());
        assert_eq!(item.runtime.size, Some(6));
        assert_eq!(item.runtime.mask.as_deref(), Some("999-999"));
        assert_eq!(item.runtime.extra.get("custom"), Some(&json!("kept")));
    }

    #[test]
    fn test_widget_annotation_lands_in_runtime() {
        let schema = Schema::object().field("toggle", Schema::boolean().widget("switch"));
        let structure = Structure::compile(&schema).unwrap();
        assert_eq!(
            structure.get(&"toggle".into()).unwrap().runtime.widget.as_deref(),
            Some("switch")
        );
    }

    #[test]
    fn test_set_visible_patches_in_place() {
        let mut structure = Structure::compile(&sample_schema()).unwrap();
        assert!(structure.set_visible(&"age".into(), false));
        assert!(!structure.get(&"age".into()).unwrap().runtime.is_visible());

        assert!(!structure.set_visible(&"missing".into(), false));
    }

    #[test]
    fn test_group_items_have_no_validator() {
        let mut structure = Structure::compile(&sample_schema()).unwrap();
        structure.insert("divider", StructureItem::group("Account"));

        let group = structure.get(&"divider".into()).unwrap();
        assert_eq!(group.kind, FieldKind::Group);
        assert!(group.validator().is_none());
    }

    #[test]
    fn test_traverse_visits_depth_first_with_paths() {
        let structure = Structure::compile(&sample_schema()).unwrap();
        let mut paths = Vec::new();
        structure.traverse(|path, _| paths.push(path.to_string()));
        assert_eq!(
            paths,
            vec![
                "email",
                "age",
                "country",
                "security",
                "security.password",
                "security.confirmPassword",
            ]
        );
    }
}
