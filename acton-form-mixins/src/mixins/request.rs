//! Per-request state read by the helpers

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use crate::fields::{value_text, FieldConfig, FieldConfigs};
use crate::template::Context;
use crate::validation::{ErrorEntry, ErrorMap};

/// Submitted form values keyed by field key
///
/// Values are strings or lists of strings as submitted, but any JSON value
/// is accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<String, Value>);

impl FormValues {
    /// Create an empty value map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value of a field
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String form of a field's value; missing and null are `None`
    #[must_use]
    pub fn text(&self, key: &str) -> Option<String> {
        self.0
            .get(key)
            .filter(|value| !value.is_null())
            .map(value_text)
    }

    /// Set a field's value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Remove a field's value
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Whether a field has a value
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Iterate over values in key order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Number of values
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no values
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Everything a request contributes to rendering
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Submitted values
    pub values: FormValues,
    /// Active validation errors
    pub errors: ErrorMap,
    /// Per-request field configuration, over the static configuration
    pub fields: FieldConfigs,
    /// Partial overrides: flattened partial name to path without extension
    pub partials: HashMap<String, PathBuf>,
    /// Ambient template variables
    pub locals: Context,
    /// Base URL relative links resolve against
    pub base_url: Option<String>,
    /// Use the template cache; `false` forces fresh reads
    pub view_cache: bool,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            values: FormValues::default(),
            errors: ErrorMap::default(),
            fields: FieldConfigs::default(),
            partials: HashMap::new(),
            locals: Context::new(),
            base_url: None,
            view_cache: true,
        }
    }
}

impl RequestContext {
    /// An empty request
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the submitted values
    #[must_use]
    pub fn with_values(mut self, values: FormValues) -> Self {
        self.values = values;
        self
    }

    /// Add a submitted value
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key, value);
        self
    }

    /// Add an error, keyed by its field key
    #[must_use]
    pub fn with_error(mut self, error: ErrorEntry) -> Self {
        self.errors.insert(error.key.clone(), error);
        self
    }

    /// Set per-request configuration for one field
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, config: FieldConfig) -> Self {
        self.fields.insert(key.into(), config);
        self
    }

    /// Override a partial
    #[must_use]
    pub fn with_partial(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.partials.insert(name.into(), path.into());
        self
    }

    /// Add an ambient template variable
    #[must_use]
    pub fn with_local(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.locals.insert(key.into(), value.into());
        self
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Bypass the template cache for this request
    #[must_use]
    pub const fn without_view_cache(mut self) -> Self {
        self.view_cache = false;
        self
    }
}
