//! Field addressing for nested form data.
//!
//! Two path notions live here. A [`DataPath`] addresses a concrete location
//! in validated data and may contain array indices (`addresses[0].street`);
//! validation issues carry one. A [`LogicalPath`] is the index-free identity
//! of a field (`addresses.street`); the compiled structure, visibility
//! tracking, and the per-field error map are all keyed by it.

use std::fmt::{self, Display};

/// A segment of a [`DataPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A field/property access (e.g. `email`).
    Field(String),
    /// An array index access (e.g. `[0]`).
    Index(usize),
}

impl PathSegment {
    /// Creates a new field segment.
    pub fn field(name: impl Into<String>) -> Self {
        PathSegment::Field(name.into())
    }

    /// Creates a new index segment.
    pub fn index(idx: usize) -> Self {
        PathSegment::Index(idx)
    }
}

/// A path to a concrete value in nested form data.
///
/// `DataPath` locates values the way validation sees them, array indices
/// included. Paths are immutable; the `push_*` methods return extended
/// copies so sibling paths can share a prefix.
///
/// # Example
///
/// ```rust
/// use formwork::DataPath;
///
/// let path = DataPath::root()
///     .push_field("addresses")
///     .push_index(1)
///     .push_field("zip");
///
/// assert_eq!(path.to_string(), "addresses[1].zip");
/// assert_eq!(path.logical().as_str(), "addresses.zip");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DataPath {
    segments: Vec<PathSegment>,
}

impl DataPath {
    /// Creates an empty path representing the root value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a new path with a field segment appended.
    pub fn push_field(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Field(name.into()));
        Self { segments }
    }

    /// Returns a new path with an index segment appended.
    pub fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Returns true if this is the root path (no segments).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments in this path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Builds a `DataPath` from a logical path's dotted segments.
    ///
    /// Every segment becomes a field access; logical paths never carry
    /// indices.
    pub fn from_logical(path: &LogicalPath) -> Self {
        Self {
            segments: path
                .segments()
                .map(|s| PathSegment::Field(s.to_string()))
                .collect(),
        }
    }

    /// Normalizes this path to the field identity it addresses.
    ///
    /// Index segments are dropped and the remaining field segments joined
    /// with `.`, so every element of an array maps to the same logical
    /// field.
    ///
    /// # Example
    ///
    /// ```rust
    /// use formwork::DataPath;
    ///
    /// let path = DataPath::root()
    ///     .push_field("addresses")
    ///     .push_index(1)
    ///     .push_field("zip");
    ///
    /// assert_eq!(path.logical().as_str(), "addresses.zip");
    /// ```
    pub fn logical(&self) -> LogicalPath {
        let fields: Vec<&str> = self
            .segments
            .iter()
            .filter_map(|s| match s {
                PathSegment::Field(name) => Some(name.as_str()),
                PathSegment::Index(_) => None,
            })
            .collect();
        LogicalPath::new(fields.join("."))
    }
}

impl Display for DataPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

/// The index-free identity of a form field.
///
/// A logical path is a dotted string like `security.confirmPassword`. It
/// names a field in the compiled structure independent of how many array
/// elements currently exist; any number of [`DataPath`]s can normalize to
/// the same logical path.
///
/// # Example
///
/// ```rust
/// use formwork::LogicalPath;
///
/// let path = LogicalPath::new("security.password");
/// assert_eq!(path.head(), "security");
/// assert!(!path.is_top_level());
/// assert_eq!(path.parent(), Some(LogicalPath::new("security")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LogicalPath(String);

impl LogicalPath {
    /// Creates a logical path from a dotted string.
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Returns the dotted string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the path names nothing (normalized from a root
    /// data path).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the dot-separated segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Returns the first segment.
    ///
    /// For a top-level path this is the whole path.
    pub fn head(&self) -> &str {
        self.0.split('.').next().unwrap_or("")
    }

    /// Returns true if the path has a single segment.
    pub fn is_top_level(&self) -> bool {
        !self.0.contains('.')
    }

    /// Returns a new path with `key` appended as a child segment.
    pub fn join(&self, key: &str) -> Self {
        if self.0.is_empty() {
            Self(key.to_string())
        } else {
            Self(format!("{}.{}", self.0, key))
        }
    }

    /// Returns the parent path, or `None` for a top-level path.
    pub fn parent(&self) -> Option<Self> {
        self.0.rfind('.').map(|i| Self(self.0[..i].to_string()))
    }
}

impl Display for LogicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LogicalPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for LogicalPath {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}
