//! The schema node tree and its annotations.
//!
//! [`SchemaNode`] is the unit of composition: a closed tagged union of
//! every schema variant plus an [`Annotations`] record carrying the
//! presentation metadata a form author may attach out-of-band (label,
//! property bag, password flag, widget name). The [`Annotate`] extension
//! trait makes those attachments chainable on any schema builder.

use serde_json::Value;
use stillwater::Validation;

use crate::error::{ValidationIssue, ValidationIssues};
use crate::path::DataPath;

use super::array::ArraySchema;
use super::boolean::BooleanSchema;
use super::enumeration::EnumSchema;
use super::numeric::NumberSchema;
use super::object::ObjectSchema;
use super::string::StringSchema;

/// Presentation metadata attached to a schema node.
///
/// Annotations are invisible to validation; the structure compiler copies
/// them onto the compiled field descriptors for the rendering layer.
#[derive(Clone, Debug, Default)]
pub struct Annotations {
    /// Display label for the field.
    pub label: Option<String>,
    /// Free-form property bag (initial visibility, size, css class, mask).
    pub properties: Option<Value>,
    /// Marks a password-entry field.
    pub password: bool,
    /// Names a custom widget to render this field with.
    pub widget: Option<String>,
}

impl Annotations {
    /// Merges `self` over `outer`: fields set on `self` win, unset fields
    /// fall back to `outer`. Used when unwrapping optional/union wrappers
    /// so annotations on either layer survive.
    pub(crate) fn merged_over(&self, outer: &Annotations) -> Annotations {
        Annotations {
            label: self.label.clone().or_else(|| outer.label.clone()),
            properties: self.properties.clone().or_else(|| outer.properties.clone()),
            password: self.password || outer.password,
            widget: self.widget.clone().or_else(|| outer.widget.clone()),
        }
    }
}

/// One node of a validation schema.
///
/// A node pairs a [`SchemaKind`] variant with its [`Annotations`]. Nodes
/// are cheap to share: object shapes hold them behind `Arc`, and the
/// compiled structure keeps a reference to the original node of every
/// field so single-field validation reuses the exact declared rules.
#[derive(Clone)]
pub struct SchemaNode {
    pub(crate) kind: SchemaKind,
    pub(crate) meta: Annotations,
}

/// The closed set of schema variants.
#[derive(Clone)]
pub enum SchemaKind {
    /// A string with optional length/pattern/format constraints.
    String(StringSchema),
    /// A number with optional bound/integrality constraints.
    Number(NumberSchema),
    /// A boolean, optionally requiring literal `true`.
    Boolean(BooleanSchema),
    /// An enumerated string drawn from an ordered option list.
    Enum(EnumSchema),
    /// Exactly one accepted value.
    Literal(Value),
    /// The inner schema, or null/absent.
    Optional(Box<SchemaNode>),
    /// Any one of the alternatives, tried in order.
    Union(Vec<SchemaNode>),
    /// A keyed object with a nested shape.
    Object(ObjectSchema),
    /// An array of items sharing one schema.
    Array(ArraySchema),
}

impl SchemaNode {
    /// Creates a literal node accepting exactly `value`.
    pub fn literal(value: Value) -> Self {
        Self {
            kind: SchemaKind::Literal(value),
            meta: Annotations::default(),
        }
    }

    /// Returns this node's variant.
    pub fn kind(&self) -> &SchemaKind {
        &self.kind
    }

    /// Returns this node's annotations.
    pub fn meta(&self) -> &Annotations {
        &self.meta
    }

    /// Returns true if this node is an optional wrapper.
    ///
    /// An object field whose node is optional may be absent from the
    /// input without error.
    pub fn is_optional(&self) -> bool {
        matches!(self.kind, SchemaKind::Optional(_))
    }

    /// Validates a value against this node, accumulating all issues.
    pub fn validate(&self, value: &Value, path: &DataPath) -> Validation<Value, ValidationIssues> {
        match &self.kind {
            SchemaKind::String(s) => s.validate(value, path).map(Value::String),
            SchemaKind::Number(n) => n.validate(value, path).map(Value::from),
            SchemaKind::Boolean(b) => b.validate(value, path).map(Value::Bool),
            SchemaKind::Enum(e) => e.validate(value, path).map(Value::String),
            SchemaKind::Literal(expected) => {
                if value == expected {
                    Validation::Success(value.clone())
                } else {
                    Validation::Failure(ValidationIssues::single(
                        ValidationIssue::new(
                            path.clone(),
                            format!("expected literal {}", expected),
                        )
                        .with_code("invalid_literal")
                        .with_expected(expected.to_string())
                        .with_got(value.to_string()),
                    ))
                }
            }
            SchemaKind::Optional(inner) => {
                if value.is_null() {
                    Validation::Success(Value::Null)
                } else {
                    inner.validate(value, path)
                }
            }
            SchemaKind::Union(alternatives) => {
                for alternative in alternatives {
                    if let Validation::Success(v) = alternative.validate(value, path) {
                        return Validation::Success(v);
                    }
                }
                Validation::Failure(ValidationIssues::single(
                    ValidationIssue::new(
                        path.clone(),
                        format!(
                            "value did not match any of {} alternatives",
                            alternatives.len()
                        ),
                    )
                    .with_code("union_no_match"),
                ))
            }
            SchemaKind::Object(o) => o.validate(value, path).map(Value::Object),
            SchemaKind::Array(a) => a.validate(value, path).map(Value::Array),
        }
    }

    /// Validates a value from the root path. Never panics; all failures
    /// come back as data.
    pub fn safe_validate(&self, value: &Value) -> Validation<Value, ValidationIssues> {
        self.validate(value, &DataPath::root())
    }
}

impl From<StringSchema> for SchemaNode {
    fn from(schema: StringSchema) -> Self {
        Self {
            kind: SchemaKind::String(schema),
            meta: Annotations::default(),
        }
    }
}

impl From<NumberSchema> for SchemaNode {
    fn from(schema: NumberSchema) -> Self {
        Self {
            kind: SchemaKind::Number(schema),
            meta: Annotations::default(),
        }
    }
}

impl From<BooleanSchema> for SchemaNode {
    fn from(schema: BooleanSchema) -> Self {
        Self {
            kind: SchemaKind::Boolean(schema),
            meta: Annotations::default(),
        }
    }
}

impl From<EnumSchema> for SchemaNode {
    fn from(schema: EnumSchema) -> Self {
        Self {
            kind: SchemaKind::Enum(schema),
            meta: Annotations::default(),
        }
    }
}

impl From<ObjectSchema> for SchemaNode {
    fn from(schema: ObjectSchema) -> Self {
        Self {
            kind: SchemaKind::Object(schema),
            meta: Annotations::default(),
        }
    }
}

impl From<ArraySchema> for SchemaNode {
    fn from(schema: ArraySchema) -> Self {
        Self {
            kind: SchemaKind::Array(schema),
            meta: Annotations::default(),
        }
    }
}

/// Chainable annotation and wrapping methods for schema builders.
///
/// Blanket-implemented for everything convertible to [`SchemaNode`], so
/// annotations read the way the constraints do:
///
/// ```rust
/// use formwork::{Schema, Annotate};
///
/// let field = Schema::string()
///     .min_len(8)
///     .label("Password")
///     .password();
/// ```
pub trait Annotate: Into<SchemaNode> + Sized {
    /// Attaches a display label.
    fn label(self, label: impl Into<String>) -> SchemaNode {
        let mut node = self.into();
        node.meta.label = Some(label.into());
        node
    }

    /// Attaches a free-form property bag (initial runtime properties such
    /// as `{"visible": false, "size": 6}`).
    fn props(self, properties: Value) -> SchemaNode {
        let mut node = self.into();
        node.meta.properties = Some(properties);
        node
    }

    /// Marks the field as a password entry.
    fn password(self) -> SchemaNode {
        let mut node = self.into();
        node.meta.password = true;
        node
    }

    /// Names a custom widget for rendering.
    fn widget(self, name: impl Into<String>) -> SchemaNode {
        let mut node = self.into();
        node.meta.widget = Some(name.into());
        node
    }

    /// Wraps the schema in an optional wrapper: null or an absent field
    /// passes, anything else validates against the inner schema.
    fn optional(self) -> SchemaNode {
        SchemaNode {
            kind: SchemaKind::Optional(Box::new(self.into())),
            meta: Annotations::default(),
        }
    }

    /// Unions the schema with the empty-string literal, the sentinel
    /// pattern for "may be left blank" text inputs.
    fn or_empty(self) -> SchemaNode {
        SchemaNode {
            kind: SchemaKind::Union(vec![self.into(), SchemaNode::literal(Value::String(String::new()))]),
            meta: Annotations::default(),
        }
    }
}

impl<T: Into<SchemaNode>> Annotate for T {}
