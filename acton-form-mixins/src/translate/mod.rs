//! Translation lookup contract and in-memory catalogs
//!
//! Field rendering only needs `translate(key) -> String`. A [`Translator`]
//! reports a miss as `None` from [`Translator::lookup`]; the provided
//! [`Translator::translate`] turns a miss back into the key so broken locales
//! stay debuggable.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::Result;
use crate::template::{Context, TemplateEngine};

/// Source of translated strings
pub trait Translator: Send + Sync {
    /// Look up a single key, returning `None` when it has no translation
    fn lookup(&self, key: &str) -> Option<String>;

    /// Translate a key, falling back to the key itself
    fn translate(&self, key: &str) -> String {
        self.lookup(key).unwrap_or_else(|| key.to_string())
    }

    /// Translate the first key of `keys` that has a translation
    ///
    /// Falls back to the last key when none match.
    fn translate_first(&self, keys: &[String]) -> String {
        keys.iter()
            .find_map(|key| self.lookup(key))
            .or_else(|| keys.last().cloned())
            .unwrap_or_default()
    }
}

impl<F> Translator for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn lookup(&self, key: &str) -> Option<String> {
        self(key)
    }
}

/// Translator that knows no strings; every key translates to itself
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn lookup(&self, _key: &str) -> Option<String> {
        None
    }
}

/// Flat key to message catalog
///
/// # Example
///
/// ```
/// use acton_form_mixins::translate::{Catalog, Translator};
/// use serde_json::json;
///
/// let catalog = Catalog::from_json(&json!({
///     "fields": { "email": { "label": "Email address" } }
/// }));
///
/// assert_eq!(catalog.translate("fields.email.label"), "Email address");
/// assert_eq!(catalog.translate("fields.email.hint"), "fields.email.hint");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    messages: HashMap<String, String>,
}

impl Catalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a nested JSON document, joining keys with `.`
    #[must_use]
    pub fn from_json(document: &Value) -> Self {
        let mut catalog = Self::new();
        catalog.flatten_into(String::new(), document);
        catalog
    }

    /// Parse a nested JSON translation file
    ///
    /// # Errors
    ///
    /// Returns an error if `source` is not valid JSON.
    pub fn from_json_str(source: &str) -> Result<Self, serde_json::Error> {
        let document: Value = serde_json::from_str(source)?;
        Ok(Self::from_json(&document))
    }

    /// Add a single translation
    pub fn insert(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.messages.insert(key.into(), message.into());
    }

    /// Add a translation, returning the catalog
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, message: impl Into<String>) -> Self {
        self.insert(key, message);
        self
    }

    /// Number of translations held
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the catalog holds no translations
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn flatten_into(&mut self, prefix: String, value: &Value) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{prefix}.{key}")
                    };
                    self.flatten_into(path, child);
                }
            }
            Value::String(message) => {
                self.messages.insert(prefix, message.clone());
            }
            Value::Null => {}
            other => {
                self.messages.insert(prefix, other.to_string());
            }
        }
    }
}

impl Translator for Catalog {
    fn lookup(&self, key: &str) -> Option<String> {
        self.messages.get(key).cloned()
    }
}

/// Translator bound to a shared key prefix and a template engine
///
/// Every lookup is prefixed with the shared translations key and the
/// translated text is rendered against the caller's context, so messages
/// can interpolate `{{ label }}` and friends.
#[derive(Clone, Copy)]
pub struct Localizer<'a> {
    translator: &'a dyn Translator,
    shared_key: &'a str,
    engine: &'a TemplateEngine,
}

impl<'a> Localizer<'a> {
    /// Bind a translator to a normalised shared key and an engine
    #[must_use]
    pub fn new(translator: &'a dyn Translator, shared_key: &'a str, engine: &'a TemplateEngine) -> Self {
        Self {
            translator,
            shared_key,
            engine,
        }
    }

    /// The template engine translations are rendered with
    #[must_use]
    pub const fn engine(&self) -> &'a TemplateEngine {
        self.engine
    }

    /// `key` with the shared prefix applied
    #[must_use]
    pub fn full_key(&self, key: &str) -> String {
        format!("{}{key}", self.shared_key)
    }

    /// Translate and render `key`; a miss renders the prefixed key
    ///
    /// # Errors
    ///
    /// Returns an error if the translated text fails to render.
    pub fn translate(&self, key: &str, ctx: &Context) -> Result<String> {
        let full_key = self.full_key(key);
        tracing::trace!(key = %full_key, "translate");
        self.engine
            .render_text(&self.translator.translate(&full_key), ctx)
    }

    /// Like [`Localizer::translate`] but a miss is `None`
    ///
    /// # Errors
    ///
    /// Returns an error if the translated text fails to render.
    pub fn conditional_translate(&self, key: &str, ctx: &Context) -> Result<Option<String>> {
        self.translator
            .lookup(&self.full_key(key))
            .map(|text| self.engine.render_text(&text, ctx))
            .transpose()
    }

    /// Translate the first candidate key that has a translation
    ///
    /// # Errors
    ///
    /// Returns an error if the translated text fails to render.
    pub fn translate_first(&self, keys: &[String], ctx: &Context) -> Result<String> {
        let keys: Vec<String> = keys.iter().map(|key| self.full_key(key)).collect();
        self.engine
            .render_text(&self.translator.translate_first(&keys), ctx)
    }
}

impl std::fmt::Debug for Localizer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Localizer")
            .field("shared_key", &self.shared_key)
            .finish_non_exhaustive()
    }
}
