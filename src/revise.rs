//! Schema revision for the currently-visible field subset.
//!
//! Whole-form validation must not fail on fields the user cannot see.
//! [`revise`] derives a schema restricted to the visible subset while
//! keeping every cross-field refinement the root schema declared: the
//! [`omit`] projection is defined to drop refinements, so they are
//! re-attached verbatim afterwards. Without that step, hiding an
//! unrelated field (say, `age`) would silently disable a "passwords must
//! match" rule.
//!
//! Only top-level fields are omitted from the shape. A nested invisible
//! path inside a still-visible parent is left in the derived schema; the
//! engine excludes such fields from its single-field sweeps instead.
//!
//! [`omit`]: ObjectSchema::omit

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use stillwater::Validation;

use crate::error::ValidationIssues;
use crate::path::LogicalPath;
use crate::schema::ObjectSchema;
use crate::structure::Structure;
use crate::visibility;

/// Derives a schema that validates only fields outside `invisible`.
///
/// An empty set returns the root schema unchanged. Invisible paths that
/// name no top-level field are ignored. The derived schema carries every
/// refinement of the root schema, predicate and message shared verbatim.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeSet;
/// use formwork::{revise, LogicalPath, Schema};
/// use serde_json::json;
///
/// let schema = Schema::object()
///     .field("email", Schema::string().email())
///     .field("age", Schema::number().min(18.0));
///
/// let hidden = BTreeSet::from([LogicalPath::new("age")]);
/// let derived = revise::revise(&schema, &hidden);
///
/// // A missing hidden field no longer fails
/// assert!(derived.safe_validate(&json!({"email": "a@b.com"})).is_success());
/// ```
pub fn revise(root: &ObjectSchema, invisible: &BTreeSet<LogicalPath>) -> ObjectSchema {
    if invisible.is_empty() {
        return root.clone();
    }

    let top_level = invisible.iter().filter(|p| p.is_top_level()).map(LogicalPath::as_str);
    let mut revised = root.omit(top_level);

    for refinement in root.refinements() {
        revised = revised.with_refinement(refinement.clone());
    }

    revised
}

/// Validates form data against the schema restricted to the structure's
/// currently-visible fields.
///
/// This is the whole-form entry point used on submit and after every
/// single-field success: visibility is recomputed from the structure, the
/// schema revised, and the data validated with refinements intact.
pub fn validate_visible(
    root: &ObjectSchema,
    structure: &Structure,
    data: &Value,
) -> Validation<Map<String, Value>, ValidationIssues> {
    let invisible = visibility::invisible_paths(structure);
    revise(root, &invisible).safe_validate(data)
}
