//! Widget registry for named render-configuration lookup.
//!
//! A schema may name a custom widget for a field (see
//! [`Annotate::widget`]); the registry maps those names to opaque
//! [`WidgetConfig`] bags that the rendering collaborator interprets. The
//! registry is an explicit dependency passed into the form engine, never
//! process-global state, and is cheap to clone: clones share the same
//! underlying store, so one registry can serve many engines.
//!
//! [`Annotate::widget`]: crate::schema::Annotate::widget

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};

/// An opaque, renderer-interpreted widget configuration.
///
/// The core never looks inside: it stores the bag and hands it back when
/// a compiled field names the widget.
///
/// # Example
///
/// ```rust
/// use formwork::WidgetConfig;
/// use serde_json::json;
///
/// let config = WidgetConfig::new()
///     .property("variant", json!("switch"))
///     .property("onLabel", json!("On"));
///
/// assert_eq!(config.get("variant"), Some(&json!("switch")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct WidgetConfig {
    properties: Map<String, Value>,
}

impl WidgetConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a property and returns self for chaining.
    pub fn property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Returns a property by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Returns the full property bag.
    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }
}

/// A shared store of named widget configurations.
///
/// # Example
///
/// ```rust
/// use formwork::{WidgetConfig, WidgetRegistry};
///
/// let registry = WidgetRegistry::new();
/// registry.register("switch", WidgetConfig::new()).unwrap();
///
/// assert!(registry.get("switch").is_some());
/// assert!(registry.register("switch", WidgetConfig::new()).is_err());
/// ```
pub struct WidgetRegistry {
    widgets: Arc<RwLock<HashMap<String, Arc<WidgetConfig>>>>,
}

impl WidgetRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            widgets: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registers a widget configuration under a name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if the name is taken.
    pub fn register(
        &self,
        name: impl Into<String>,
        config: WidgetConfig,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        let mut widgets = self.widgets.write();

        if widgets.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }

        widgets.insert(name, Arc::new(config));
        Ok(())
    }

    /// Retrieves a configuration by name.
    pub fn get(&self, name: &str) -> Option<Arc<WidgetConfig>> {
        self.widgets.read().get(name).cloned()
    }

    /// Returns the number of registered widgets.
    pub fn len(&self) -> usize {
        self.widgets.read().len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.widgets.read().is_empty()
    }
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for WidgetRegistry {
    /// Clones share the same underlying store.
    fn clone(&self) -> Self {
        Self {
            widgets: Arc::clone(&self.widgets),
        }
    }
}

/// Errors that can occur during registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register a widget under a name that already exists.
    #[error("widget '{0}' already registered")]
    DuplicateName(String),
}
