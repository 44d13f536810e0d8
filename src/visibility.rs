//! Visibility tracking over a compiled structure.
//!
//! A field is invisible when its runtime properties carry
//! `visible: Some(false)`; an absent flag means visible. The walk always
//! descends into children, even under an invisible parent: a child may be
//! toggled independently, and whether hiding a section should cascade
//! into its fields is the hosting UI's decision, not this core's.

use std::collections::BTreeSet;

use crate::path::LogicalPath;
use crate::structure::Structure;

/// Collects the logical paths of every field currently marked invisible.
///
/// Recomputed on demand; never cache the result across a mutation that
/// can change visibility.
///
/// # Example
///
/// ```rust
/// use formwork::{visibility, LogicalPath, Schema, Structure};
///
/// let schema = Schema::object()
///     .field("email", Schema::string())
///     .field("age", Schema::number());
///
/// let mut structure = Structure::compile(&schema).unwrap();
/// structure.set_visible(&LogicalPath::new("age"), false);
///
/// let invisible = visibility::invisible_paths(&structure);
/// assert!(invisible.contains(&LogicalPath::new("age")));
/// assert_eq!(invisible.len(), 1);
/// ```
pub fn invisible_paths(structure: &Structure) -> BTreeSet<LogicalPath> {
    let mut invisible = BTreeSet::new();
    structure.traverse(|path, item| {
        if item.runtime.visible == Some(false) {
            invisible.insert(path.clone());
        }
    });
    invisible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;

    fn nested_structure() -> Structure {
        let schema = Schema::object()
            .field("name", Schema::string())
            .field(
                "address",
                Schema::object()
                    .field("street", Schema::string())
                    .field("zip", Schema::string()),
            );
        Structure::compile(&schema).unwrap()
    }

    #[test]
    fn test_all_visible_by_default() {
        let structure = nested_structure();
        assert!(invisible_paths(&structure).is_empty());
    }

    #[test]
    fn test_top_level_flag_collected() {
        let mut structure = nested_structure();
        structure.set_visible(&"name".into(), false);

        let invisible = invisible_paths(&structure);
        assert_eq!(invisible.len(), 1);
        assert!(invisible.contains(&LogicalPath::new("name")));
    }

    #[test]
    fn test_nested_flag_collected() {
        let mut structure = nested_structure();
        structure.set_visible(&LogicalPath::new("address.zip"), false);

        let invisible = invisible_paths(&structure);
        assert_eq!(invisible.len(), 1);
        assert!(invisible.contains(&LogicalPath::new("address.zip")));
    }

    #[test]
    fn test_hidden_parent_does_not_cascade() {
        let mut structure = nested_structure();
        structure.set_visible(&"address".into(), false);

        let invisible = invisible_paths(&structure);
        // Only the parent itself is reported; children keep their own flags
        assert_eq!(invisible.len(), 1);
        assert!(invisible.contains(&LogicalPath::new("address")));
    }

    #[test]
    fn test_children_walked_under_hidden_parent() {
        let mut structure = nested_structure();
        structure.set_visible(&"address".into(), false);
        structure.set_visible(&LogicalPath::new("address.street"), false);

        let invisible = invisible_paths(&structure);
        assert_eq!(invisible.len(), 2);
        assert!(invisible.contains(&LogicalPath::new("address.street")));
    }

    #[test]
    fn test_retoggling_removes_from_set() {
        let mut structure = nested_structure();
        structure.set_visible(&"name".into(), false);
        structure.set_visible(&"name".into(), true);
        assert!(invisible_paths(&structure).is_empty());
    }
}
