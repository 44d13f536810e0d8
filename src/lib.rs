//! # Formwork
//!
//! Schema-driven form structure compilation and visibility-aware
//! validation, with every failure accumulated rather than reported one at
//! a time.
//!
//! ## Overview
//!
//! A form is declared once as a composable validation schema. Formwork
//! compiles that schema into a renderer-agnostic [`Structure`], one
//! descriptor per field, recursively, and then keeps validating the form
//! data as the set of visible fields changes at runtime: hidden fields
//! drop out of whole-form validation while cross-field rules
//! ([`Refinement`]s) keep applying to what remains.
//!
//! ## Core types
//!
//! - [`Schema`]: entry point for building validation schemas
//! - [`Structure`] / [`StructureItem`]: the compiled field tree
//! - [`LogicalPath`] / [`DataPath`]: field identity vs. concrete storage
//!   location (array indices included)
//! - [`ValidationIssue`] / [`ValidationIssues`]: accumulated failures
//! - [`FormEngine`]: a live form session owning data, errors, and state
//!
//! ## Example
//!
//! ```rust
//! use formwork::{FormEngine, LogicalPath, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::object()
//!     .field("password", Schema::string().min_len(8))
//!     .field("confirm", Schema::string())
//!     .equal_fields("password", "confirm");
//!
//! let mut form = FormEngine::new(schema).unwrap();
//! form.set_value(&LogicalPath::new("password"), json!("abcdefgh"));
//! form.set_value(&LogicalPath::new("confirm"), json!("abcdefgh"));
//!
//! assert!(form.validate_visible().success);
//! ```

pub mod engine;
pub mod error;
pub mod introspect;
pub mod path;
pub mod project;
pub mod registry;
pub mod revise;
pub mod schema;
pub mod structure;
pub mod value;
pub mod visibility;

pub use engine::{validate_field_value, FieldOutcome, FieldState, FormEngine, ValidationReport};
pub use error::{ValidationIssue, ValidationIssues};
pub use path::{DataPath, LogicalPath, PathSegment};
pub use registry::{RegistryError, WidgetConfig, WidgetRegistry};
pub use schema::{
    Annotate, Annotations, ArraySchema, BooleanSchema, EnumSchema, NumberSchema, ObjectSchema,
    Refinement, Schema, SchemaKind, SchemaNode, StringSchema,
};
pub use structure::{CompileError, FieldKind, RuntimeProps, Structure, StructureItem};

/// Type alias for validation results using ValidationIssues.
pub type ValidationResult<T> = stillwater::Validation<T, ValidationIssues>;
