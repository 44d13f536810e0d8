//! Projection of validation issues onto displayable field errors.
//!
//! Whole-form validation reports issues at data paths that may carry
//! array indices; the rendering layer keys its error display by logical
//! field. [`classify`] bridges the two: each issue path is normalized by
//! stripping index segments, and only fields that have already been
//! validated individually at least once are eligible to display.
//!
//! The eligibility gate is what keeps a shared refinement from lighting
//! up untouched fields on every keystroke in a sibling: a cross-field
//! failure surfaces on a field only after that field has entered the
//! validated state on its own.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::ValidationIssues;
use crate::path::LogicalPath;

/// Filters validation issues down to the fields allowed to display them.
///
/// Issue paths are normalized to logical paths (index segments dropped).
/// An issue is kept only when its logical path is in
/// `previously_errored`; issues that normalize to the root are never
/// displayable and are skipped. When several issues normalize to the same
/// field the last one wins; fields show one failure at a time.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeSet;
/// use formwork::{project, DataPath, LogicalPath, ValidationIssue, ValidationIssues};
///
/// let issues = ValidationIssues::single(ValidationIssue::new(
///     DataPath::root().push_field("addresses").push_index(1).push_field("zip"),
///     "zip too short",
/// ));
///
/// let touched = BTreeSet::from([LogicalPath::new("addresses.zip")]);
/// let displayed = project::classify(&issues, &touched);
/// assert_eq!(
///     displayed.get(&LogicalPath::new("addresses.zip")),
///     Some(&vec!["zip too short".to_string()]),
/// );
/// ```
pub fn classify(
    issues: &ValidationIssues,
    previously_errored: &BTreeSet<LogicalPath>,
) -> BTreeMap<LogicalPath, Vec<String>> {
    let mut displayed = BTreeMap::new();

    for issue in issues.iter() {
        let field = issue.path.logical();
        if field.is_empty() {
            continue;
        }
        if previously_errored.contains(&field) {
            displayed.insert(field, vec![issue.message.clone()]);
        }
    }

    displayed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationIssue;
    use crate::path::DataPath;

    fn issue(path: DataPath, message: &str) -> ValidationIssue {
        ValidationIssue::new(path, message)
    }

    #[test]
    fn test_untouched_field_is_suppressed() {
        let issues = ValidationIssues::single(issue(
            DataPath::root().push_field("b"),
            "b must match a",
        ));

        let displayed = classify(&issues, &BTreeSet::new());
        assert!(displayed.is_empty());
    }

    #[test]
    fn test_previously_errored_field_is_displayed() {
        let issues = ValidationIssues::single(issue(
            DataPath::root().push_field("b"),
            "b must match a",
        ));

        let touched = BTreeSet::from([LogicalPath::new("b")]);
        let displayed = classify(&issues, &touched);
        assert_eq!(
            displayed.get(&LogicalPath::new("b")),
            Some(&vec!["b must match a".to_string()]),
        );
    }

    #[test]
    fn test_indexed_paths_normalize() {
        let issues = ValidationIssues::single(issue(
            DataPath::root()
                .push_field("addresses")
                .push_index(1)
                .push_field("zip"),
            "bad zip",
        ));

        let touched = BTreeSet::from([LogicalPath::new("addresses.zip")]);
        let displayed = classify(&issues, &touched);
        assert!(displayed.contains_key(&LogicalPath::new("addresses.zip")));
    }

    #[test]
    fn test_last_issue_wins_per_field() {
        let issues = ValidationIssues::from_vec(vec![
            issue(DataPath::root().push_field("a"), "first"),
            issue(DataPath::root().push_field("a"), "second"),
        ]);

        let touched = BTreeSet::from([LogicalPath::new("a")]);
        let displayed = classify(&issues, &touched);
        assert_eq!(
            displayed.get(&LogicalPath::new("a")),
            Some(&vec!["second".to_string()]),
        );
    }

    #[test]
    fn test_root_issues_are_skipped() {
        let issues = ValidationIssues::single(issue(DataPath::root(), "expected object"));
        let touched = BTreeSet::from([LogicalPath::new("")]);
        assert!(classify(&issues, &touched).is_empty());
    }

    #[test]
    fn test_mixed_eligibility() {
        let issues = ValidationIssues::from_vec(vec![
            issue(DataPath::root().push_field("a"), "a bad"),
            issue(DataPath::root().push_field("b"), "b bad"),
        ]);

        let touched = BTreeSet::from([LogicalPath::new("a")]);
        let displayed = classify(&issues, &touched);
        assert_eq!(displayed.len(), 1);
        assert!(displayed.contains_key(&LogicalPath::new("a")));
        assert!(!displayed.contains_key(&LogicalPath::new("b")));
    }
}
