//! Validation issue types.
//!
//! Validation failures are data, never panics: a failed validation returns
//! [`ValidationIssues`], a non-empty collection of [`ValidationIssue`]s
//! accumulated across every field that failed.

use std::fmt::{self, Display};

use stillwater::prelude::*;

use crate::path::DataPath;

/// A single validation failure with full context.
///
/// An issue captures where the failure happened (a [`DataPath`] that may
/// include array indices), a human-readable message, a machine-readable
/// code, and optionally the received and expected values.
///
/// # Example
///
/// ```rust
/// use formwork::{DataPath, ValidationIssue};
///
/// let issue = ValidationIssue::new(
///     DataPath::root().push_field("email"),
///     "invalid email format",
/// )
/// .with_code("email")
/// .with_got("not-an-email")
/// .with_expected("email address");
///
/// assert_eq!(issue.code, "email");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    /// The path to the value that failed validation.
    pub path: DataPath,
    /// Human-readable message, suitable for display next to a field.
    pub message: String,
    /// The actual value that was received (formatted as string).
    pub got: Option<String>,
    /// Description of what was expected.
    pub expected: Option<String>,
    /// Machine-readable code (e.g. `min_length`).
    pub code: String,
}

impl ValidationIssue {
    /// Creates a new issue with the given path and message.
    ///
    /// The code defaults to `validation_error`; use [`with_code`] to set a
    /// more specific one.
    ///
    /// [`with_code`]: ValidationIssue::with_code
    pub fn new(path: DataPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            got: None,
            expected: None,
            code: "validation_error".to_string(),
        }
    }

    /// Sets the code and returns self for chaining.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Sets the received value and returns self for chaining.
    pub fn with_got(mut self, got: impl Into<String>) -> Self {
        self.got = Some(got.into());
        self
    }

    /// Sets the expected description and returns self for chaining.
    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }
}

impl Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path_str = if self.path.is_root() {
            "(root)".to_string()
        } else {
            self.path.to_string()
        };

        write!(f, "{}: {}", path_str, self.message)?;

        if let Some(ref expected) = self.expected {
            write!(f, " (expected: {})", expected)?;
        }
        if let Some(ref got) = self.got {
            write!(f, " (got: {})", got)?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationIssue {}

/// A non-empty collection of validation issues.
///
/// `ValidationIssues` wraps a `NonEmptyVec<ValidationIssue>` so that a
/// `Validation::Failure` always carries at least one issue. Issues from
/// independent validations combine through `Semigroup`, which is how
/// whole-form validation accumulates every failing field instead of
/// stopping at the first.
///
/// ```rust
/// use formwork::{DataPath, ValidationIssue, ValidationIssues};
/// use stillwater::prelude::*;
///
/// let a = ValidationIssues::single(
///     ValidationIssue::new(DataPath::root().push_field("email"), "required"),
/// );
/// let b = ValidationIssues::single(
///     ValidationIssue::new(DataPath::root().push_field("age"), "too young"),
/// );
///
/// assert_eq!(a.combine(b).len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssues(NonEmptyVec<ValidationIssue>);

impl ValidationIssues {
    /// Creates a collection containing a single issue.
    pub fn single(issue: ValidationIssue) -> Self {
        Self(NonEmptyVec::singleton(issue))
    }

    /// Creates a collection from a `Vec` of issues.
    ///
    /// # Panics
    ///
    /// Panics if the vec is empty. Use this only where emptiness has
    /// already been ruled out.
    pub fn from_vec(issues: Vec<ValidationIssue>) -> Self {
        Self(NonEmptyVec::from_vec(issues).expect("ValidationIssues requires at least one issue"))
    }

    /// Returns the number of issues.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection is guaranteed non-empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the issues.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.0.iter()
    }

    /// Returns the first issue.
    pub fn first(&self) -> &ValidationIssue {
        self.0.head()
    }

    /// Returns all issues with the given code.
    pub fn with_code(&self, code: &str) -> Vec<&ValidationIssue> {
        self.0.iter().filter(|i| i.code == code).collect()
    }

    /// Returns all issues whose path normalizes to the given logical path.
    pub fn at_field(&self, path: &crate::path::LogicalPath) -> Vec<&ValidationIssue> {
        self.0.iter().filter(|i| &i.path.logical() == path).collect()
    }

    /// Converts into a plain `Vec`.
    pub fn into_vec(self) -> Vec<ValidationIssue> {
        self.0.into_vec()
    }
}

impl Semigroup for ValidationIssues {
    fn combine(self, other: Self) -> Self {
        ValidationIssues(self.0.combine(other.0))
    }
}

impl Display for ValidationIssues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} issue(s):", self.len())?;
        for (i, issue) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationIssues {}

impl IntoIterator for ValidationIssues {
    type Item = ValidationIssue;
    type IntoIter = std::vec::IntoIter<ValidationIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationIssues {
    type Item = &'a ValidationIssue;
    type IntoIter = Box<dyn Iterator<Item = &'a ValidationIssue> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.0.iter())
    }
}
