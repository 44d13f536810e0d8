//! Composable validation schemas.
//!
//! A form's accepted data shape is described by a tree of [`SchemaNode`]s.
//! Every node is one variant of a closed set (string, number, boolean,
//! enumeration, literal, optional wrapper, union, object, array), so the
//! rest of the crate can dispatch on it with plain pattern matching,
//! with no downcasting and no open trait hierarchy.
//!
//! Schemas are built through [`Schema`]'s factory methods and the builder
//! methods on each variant, and validated through
//! [`ObjectSchema::safe_validate`] which accumulates every failure rather
//! than short-circuiting on the first.
//!
//! # Example
//!
//! ```rust
//! use formwork::{Schema, Annotate};
//! use serde_json::json;
//!
//! let schema = Schema::object()
//!     .field("email", Schema::string().email())
//!     .field("age", Schema::number().min(18.0))
//!     .field("bio", Schema::string().max_len(500).optional());
//!
//! let result = schema.safe_validate(&json!({
//!     "email": "ada@example.com",
//!     "age": 36,
//! }));
//! assert!(result.is_success());
//! ```

mod array;
mod boolean;
mod enumeration;
mod node;
mod numeric;
mod object;
mod string;

pub use array::ArraySchema;
pub use boolean::BooleanSchema;
pub use enumeration::EnumSchema;
pub use node::{Annotate, Annotations, SchemaKind, SchemaNode};
pub use numeric::NumberSchema;
pub use object::{ObjectSchema, Refinement};
pub use string::StringSchema;

use serde_json::Value;

/// Entry point for creating validation schemas.
///
/// `Schema` provides factory methods for every node variant. Each returned
/// builder adds constraints through chained methods; annotation methods
/// from [`Annotate`] (label, properties, password, widget, optional) are
/// available on all of them.
pub struct Schema;

impl Schema {
    /// Creates a new string schema.
    ///
    /// # Example
    ///
    /// ```rust
    /// use formwork::Schema;
    /// use serde_json::json;
    ///
    /// let schema = Schema::string().min_len(2).max_len(100);
    /// assert!(schema.safe_validate(&json!("Ada")).is_success());
    /// assert!(schema.safe_validate(&json!("A")).is_failure());
    /// ```
    pub fn string() -> StringSchema {
        StringSchema::new()
    }

    /// Creates a new number schema.
    ///
    /// Accepts any JSON number; use [`NumberSchema::integer`] to reject
    /// fractional values.
    pub fn number() -> NumberSchema {
        NumberSchema::new()
    }

    /// Creates a new boolean schema.
    pub fn boolean() -> BooleanSchema {
        BooleanSchema::new()
    }

    /// Creates an enumeration schema from a plain list of values.
    ///
    /// Each option's label equals its value. Declaration order is
    /// preserved.
    ///
    /// # Example
    ///
    /// ```rust
    /// use formwork::Schema;
    /// use serde_json::json;
    ///
    /// let schema = Schema::options(["MX", "US", "AR"]);
    /// assert!(schema.safe_validate(&json!("MX")).is_success());
    /// assert!(schema.safe_validate(&json!("FR")).is_failure());
    /// ```
    pub fn options<I, S>(values: I) -> EnumSchema
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EnumSchema::of(values)
    }

    /// Creates an enumeration schema from ordered (value, label) pairs.
    ///
    /// Used when the stored value differs from the text presented to the
    /// user (e.g. `("mx", "México")`).
    pub fn labeled_options<I, V, L>(pairs: I) -> EnumSchema
    where
        I: IntoIterator<Item = (V, L)>,
        V: Into<String>,
        L: Into<String>,
    {
        EnumSchema::with_labels(pairs)
    }

    /// Creates a new object schema with no fields.
    pub fn object() -> ObjectSchema {
        ObjectSchema::new()
    }

    /// Creates a new array schema with the given item schema.
    pub fn array(item: impl Into<SchemaNode>) -> ArraySchema {
        ArraySchema::new(item)
    }

    /// Creates a literal schema accepting exactly the given value.
    ///
    /// Mostly useful inside unions, e.g. "a url, or the empty string";
    /// see [`Annotate::or_empty`].
    pub fn literal(value: Value) -> SchemaNode {
        SchemaNode::literal(value)
    }
}
