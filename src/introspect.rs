//! Schema node introspection.
//!
//! [`extract`] turns one schema node into a normalized [`FieldDescriptor`]:
//! a flat record of what the field is (type tag), whether it is required,
//! which constraints it declares, and which annotations the author
//! attached. Wrappers are unwrapped in a fixed priority order (optional
//! first, then union) and the descriptor of the inner node is returned
//! with the wrapper's effect folded in.
//!
//! Extraction is deliberately non-recursive: an object node's descriptor
//! records its child shape but does not descend into it. Recursion is the
//! structure compiler's job, which keeps this component independently
//! testable.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::schema::{Annotations, SchemaKind, SchemaNode};

/// The normalized type tag of a field descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorKind {
    /// Free-text string input.
    Text,
    /// Numeric input.
    Number,
    /// Boolean input.
    Boolean,
    /// Value drawn from a fixed option list.
    Enumerated,
    /// Nested object owning a child shape.
    Object,
    /// Array of items sharing one schema.
    Array,
    /// A node the structure compiler has no field mapping for.
    Unsupported(&'static str),
}

/// Type-specific limits collected from a schema node.
///
/// The bag is descriptive: it feeds labels, input attributes, and option
/// widgets. Validation authority stays with the schema node itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraints {
    /// Minimum string length.
    pub min_length: Option<usize>,
    /// Maximum string length.
    pub max_length: Option<usize>,
    /// Regex pattern source.
    pub pattern: Option<String>,
    /// Email format required.
    pub email: bool,
    /// URL format required.
    pub url: bool,
    /// Lower numeric bound.
    pub min: Option<f64>,
    /// Whether the lower bound is inclusive.
    pub min_inclusive: bool,
    /// Upper numeric bound.
    pub max: Option<f64>,
    /// Whether the upper bound is inclusive.
    pub max_inclusive: bool,
    /// Whole numbers only.
    pub integer: bool,
    /// Literal `true` required (consent checkbox).
    pub must_accept: bool,
    /// Ordered (value, label) pairs for enumerated fields.
    pub options: Option<Vec<(String, String)>>,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            min_length: None,
            max_length: None,
            pattern: None,
            email: false,
            url: false,
            min: None,
            min_inclusive: true,
            max: None,
            max_inclusive: true,
            integer: false,
            must_accept: false,
            options: None,
        }
    }
}

/// The normalized description of one schema field.
#[derive(Clone)]
pub struct FieldDescriptor {
    /// Type tag after unwrapping.
    pub kind: DescriptorKind,
    /// False when an optional wrapper was unwrapped.
    pub required: bool,
    /// Collected type-specific limits.
    pub constraints: Constraints,
    /// Child shape, present only for object nodes.
    pub shape: Option<IndexMap<String, Arc<SchemaNode>>>,
    /// Item schema, present only for array nodes.
    pub item: Option<Arc<SchemaNode>>,
    /// Display label.
    pub label: Option<String>,
    /// Free-form initial property bag.
    pub properties: Option<Value>,
    /// Password-entry flag.
    pub password: bool,
    /// Custom widget name.
    pub widget: Option<String>,
}

impl FieldDescriptor {
    fn leaf(kind: DescriptorKind) -> Self {
        Self {
            kind,
            required: true,
            constraints: Constraints::default(),
            shape: None,
            item: None,
            label: None,
            properties: None,
            password: false,
            widget: None,
        }
    }

    /// Fills unset annotation fields from an outer wrapper's metadata.
    /// Inner annotations win; the wrapper only supplies what the inner
    /// node left blank.
    fn absorb_meta(&mut self, outer: &Annotations) {
        let inner = Annotations {
            label: self.label.take(),
            properties: self.properties.take(),
            password: self.password,
            widget: self.widget.take(),
        };
        let merged = inner.merged_over(outer);
        self.label = merged.label;
        self.properties = merged.properties;
        self.password = merged.password;
        self.widget = merged.widget;
    }
}

/// Extracts the normalized descriptor of a schema node.
///
/// Unwrap priority: an optional wrapper clears the required flag and
/// recurses; a union recurses into its first alternative that is not the
/// empty-string literal (the "may be left blank" sentinel), falling back
/// to the first alternative when all of them are. Leaves collect their
/// constraints; object and array nodes record their nested shape without
/// descending into it.
///
/// # Example
///
/// ```rust
/// use formwork::introspect::{extract, DescriptorKind};
/// use formwork::{Annotate, Schema, SchemaNode};
///
/// let node: SchemaNode = Schema::string().min_len(2).optional();
/// let descriptor = extract(&node);
///
/// assert_eq!(descriptor.kind, DescriptorKind::Text);
/// assert!(!descriptor.required);
/// assert_eq!(descriptor.constraints.min_length, Some(2));
/// ```
pub fn extract(node: &SchemaNode) -> FieldDescriptor {
    match node.kind() {
        SchemaKind::Optional(inner) => {
            let mut descriptor = extract(inner);
            descriptor.required = false;
            descriptor.absorb_meta(node.meta());
            descriptor
        }
        SchemaKind::Union(alternatives) => {
            let chosen = alternatives
                .iter()
                .find(|alt| !is_empty_literal(alt))
                .or_else(|| alternatives.first());
            let mut descriptor = match chosen {
                Some(alt) => extract(alt),
                None => FieldDescriptor::leaf(DescriptorKind::Unsupported("empty union")),
            };
            descriptor.absorb_meta(node.meta());
            descriptor
        }
        SchemaKind::String(s) => {
            let mut descriptor = FieldDescriptor::leaf(DescriptorKind::Text);
            s.describe(&mut descriptor.constraints);
            descriptor.absorb_meta(node.meta());
            descriptor
        }
        SchemaKind::Number(n) => {
            let mut descriptor = FieldDescriptor::leaf(DescriptorKind::Number);
            n.describe(&mut descriptor.constraints);
            descriptor.absorb_meta(node.meta());
            descriptor
        }
        SchemaKind::Boolean(b) => {
            let mut descriptor = FieldDescriptor::leaf(DescriptorKind::Boolean);
            descriptor.constraints.must_accept = b.requires_acceptance();
            descriptor.absorb_meta(node.meta());
            descriptor
        }
        SchemaKind::Enum(e) => {
            let mut descriptor = FieldDescriptor::leaf(DescriptorKind::Enumerated);
            descriptor.constraints.options = Some(e.options().to_vec());
            descriptor.absorb_meta(node.meta());
            descriptor
        }
        SchemaKind::Literal(_) => {
            let mut descriptor = FieldDescriptor::leaf(DescriptorKind::Unsupported("bare literal"));
            descriptor.absorb_meta(node.meta());
            descriptor
        }
        SchemaKind::Object(o) => {
            let mut descriptor = FieldDescriptor::leaf(DescriptorKind::Object);
            descriptor.shape = Some(o.shape().clone());
            descriptor.absorb_meta(node.meta());
            descriptor
        }
        SchemaKind::Array(a) => {
            let mut descriptor = FieldDescriptor::leaf(DescriptorKind::Array);
            descriptor.item = Some(Arc::clone(a.item()));
            descriptor.absorb_meta(node.meta());
            descriptor
        }
    }
}

/// Returns true for the empty-string literal sentinel.
fn is_empty_literal(node: &SchemaNode) -> bool {
    matches!(
        node.kind(),
        SchemaKind::Literal(Value::String(s)) if s.is_empty()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Annotate, Schema};
    use serde_json::json;

    #[test]
    fn test_leaf_kinds() {
        assert_eq!(
            extract(&Schema::string().into()).kind,
            DescriptorKind::Text
        );
        assert_eq!(
            extract(&Schema::number().into()).kind,
            DescriptorKind::Number
        );
        assert_eq!(
            extract(&Schema::boolean().into()).kind,
            DescriptorKind::Boolean
        );
        assert_eq!(
            extract(&Schema::options(["a"]).into()).kind,
            DescriptorKind::Enumerated
        );
    }

    #[test]
    fn test_string_constraints_collected() {
        let node: SchemaNode = Schema::string().min_len(2).max_len(50).email().into();
        let descriptor = extract(&node);
        assert_eq!(descriptor.constraints.min_length, Some(2));
        assert_eq!(descriptor.constraints.max_length, Some(50));
        assert!(descriptor.constraints.email);
    }

    #[test]
    fn test_optional_unwrap_only_changes_required() {
        let plain = extract(&Schema::string().min_len(2).into());
        let wrapped = extract(&Schema::string().min_len(2).optional());

        assert!(plain.required);
        assert!(!wrapped.required);
        assert_eq!(plain.constraints, wrapped.constraints);
        assert_eq!(plain.kind, wrapped.kind);
    }

    #[test]
    fn test_union_skips_empty_literal() {
        let node = Schema::string().email().or_empty();
        let descriptor = extract(&node);
        assert_eq!(descriptor.kind, DescriptorKind::Text);
        assert!(descriptor.constraints.email);
        // The sentinel affects accepted values, not requiredness
        assert!(descriptor.required);
    }

    #[test]
    fn test_union_of_only_empty_literals_uses_first() {
        let node = SchemaNode {
            kind: SchemaKind::Union(vec![
                Schema::literal(json!("")),
                Schema::literal(json!("")),
            ]),
            meta: Annotations::default(),
        };
        let descriptor = extract(&node);
        assert_eq!(descriptor.kind, DescriptorKind::Unsupported("bare literal"));
    }

    #[test]
    fn test_enum_options_preserve_declaration_order() {
        let node: SchemaNode = Schema::labeled_options([("z", "Zulu"), ("a", "Alpha")]).into();
        let descriptor = extract(&node);
        let options = descriptor.constraints.options.unwrap();
        assert_eq!(options[0], ("z".to_string(), "Zulu".to_string()));
        assert_eq!(options[1], ("a".to_string(), "Alpha".to_string()));
    }

    #[test]
    fn test_object_records_shape_without_recursing() {
        let node: SchemaNode = Schema::object()
            .field("street", Schema::string())
            .field("zip", Schema::string())
            .into();
        let descriptor = extract(&node);
        assert_eq!(descriptor.kind, DescriptorKind::Object);

        let shape = descriptor.shape.unwrap();
        let keys: Vec<_> = shape.keys().cloned().collect();
        assert_eq!(keys, vec!["street", "zip"]);
    }

    #[test]
    fn test_array_records_item() {
        let node: SchemaNode = Schema::array(Schema::string()).into();
        let descriptor = extract(&node);
        assert_eq!(descriptor.kind, DescriptorKind::Array);
        assert!(descriptor.item.is_some());
    }

    #[test]
    fn test_annotations_survive_optional_wrapper() {
        let node = Schema::string().label("Bio").optional();
        let descriptor = extract(&node);
        assert_eq!(descriptor.label.as_deref(), Some("Bio"));
        assert!(!descriptor.required);
    }

    #[test]
    fn test_inner_annotations_win_over_outer() {
        // Label on the inner node, widget on the wrapper
        let inner = Schema::string().label("inner");
        let node = inner.optional().widget("slider");
        let descriptor = extract(&node);
        assert_eq!(descriptor.label.as_deref(), Some("inner"));
        assert_eq!(descriptor.widget.as_deref(), Some("slider"));
    }

    #[test]
    fn test_must_accept_surfaces() {
        let node: SchemaNode = Schema::boolean().must_accept("accept").into();
        assert!(extract(&node).constraints.must_accept);
    }

    #[test]
    fn test_bare_literal_is_unsupported() {
        let descriptor = extract(&Schema::literal(json!("x")));
        assert!(matches!(descriptor.kind, DescriptorKind::Unsupported(_)));
    }
}
