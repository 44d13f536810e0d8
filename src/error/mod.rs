//! Validation issue types.
//!
//! This module provides the data-level failure types returned by
//! validation: a single [`ValidationIssue`] with path and context, and the
//! non-empty accumulating collection [`ValidationIssues`].

mod issue;

pub use issue::{ValidationIssue, ValidationIssues};
