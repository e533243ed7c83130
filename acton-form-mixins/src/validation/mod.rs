//! Validation errors: per-field error state, messages and the error list
//!
//! Errors are produced by an external validator and handed in as an
//! [`ErrorMap`]. This module decides how each field displays them and fills
//! in translated messages once per render.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::Result;
use crate::template::Context;
use crate::translate::Localizer;

/// Active errors keyed by field key, ordered by key
pub type ErrorMap = BTreeMap<String, ErrorEntry>;

/// One active validation failure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Key of the failing field
    #[serde(default)]
    pub key: String,
    /// Name of the validator that failed
    #[serde(rename = "type")]
    pub kind: String,
    /// Key of the group this error is reported under
    #[serde(default, alias = "errorGroup", skip_serializing_if = "Option::is_none")]
    pub error_group: Option<String>,
    /// Extra interpolation values for the message
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub args: Map<String, Value>,
    /// Inline message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Message for the error summary
    #[serde(default, alias = "headerMessage", skip_serializing_if = "Option::is_none")]
    pub header_message: Option<String>,
}

impl ErrorEntry {
    /// Create an error for `key` failing validator `kind`
    #[must_use]
    pub fn new(key: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Report this error under `group`
    #[must_use]
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.error_group = Some(group.into());
        self
    }

    /// Add a message interpolation value
    #[must_use]
    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    /// Whether both messages have been filled in
    #[must_use]
    pub const fn is_processed(&self) -> bool {
        self.message.is_some() && self.header_message.is_some()
    }
}

/// How a field displays errors
///
/// Serialises as `false`, `true` or the full entry so templates can test it
/// for truthiness and still read `error.message` for direct errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ErrorState {
    /// No error
    #[default]
    None,
    /// The field's error group has an error
    Group,
    /// The field itself has an error
    Direct(ErrorEntry),
}

impl ErrorState {
    /// Resolve the error state of `key`
    ///
    /// A group error propagates when the group's entry is not itself
    /// reported under that group.
    #[must_use]
    pub fn resolve(key: &str, error_group: Option<&str>, errors: &ErrorMap) -> Self {
        if let Some(entry) = errors.get(key) {
            return Self::Direct(entry.clone());
        }
        let propagated = error_group
            .and_then(|group| errors.get(group).map(|entry| (group, entry)))
            .is_some_and(|(group, entry)| entry.error_group.as_deref() != Some(group));
        if propagated {
            Self::Group
        } else {
            Self::None
        }
    }

    /// Whether there is any error to highlight
    #[must_use]
    pub const fn is_error(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// The entry, for direct errors
    #[must_use]
    pub const fn entry(&self) -> Option<&ErrorEntry> {
        match self {
            Self::Direct(entry) => Some(entry),
            _ => None,
        }
    }
}

impl Serialize for ErrorState {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::None => serializer.serialize_bool(false),
            Self::Group => serializer.serialize_bool(true),
            Self::Direct(entry) => entry.serialize(serializer),
        }
    }
}

/// Candidate translation keys for an error message, most specific first
#[must_use]
pub fn message_keys(content_key: &str, entry: &ErrorEntry, header: bool) -> Vec<String> {
    let kind = &entry.kind;
    let scoped = |scope: &str, suffix: &str| {
        [
            format!("fields.{scope}.validation.{kind}{suffix}"),
            format!("validation.{scope}.{kind}{suffix}"),
            format!("fields.{scope}.validation.default{suffix}"),
            format!("validation.{scope}.default{suffix}"),
        ]
    };

    let mut keys = Vec::with_capacity(18);
    if header {
        keys.extend(scoped(content_key, "_header"));
        if let Some(group) = &entry.error_group {
            keys.extend(scoped(group, "_header"));
        }
    }
    keys.extend(scoped(content_key, ""));
    if let Some(group) = &entry.error_group {
        keys.extend(scoped(group, ""));
    }
    keys.push(format!("validation.{kind}"));
    keys.push("validation.default".to_string());
    keys
}

/// Give every entry without a key the key it is stored under
pub fn fill_keys(errors: &mut ErrorMap) {
    for (key, entry) in errors.iter_mut() {
        if entry.key.is_empty() {
            entry.key.clone_from(key);
        }
    }
}

/// Fill in `message` and `header_message` for every unprocessed error
///
/// `content_key_of` maps a field key to its `contentKey`, if configured.
/// Entries that already carry both messages are not touched, so calling
/// this twice performs no further translation.
///
/// # Errors
///
/// Returns an error if a translated message fails to render.
pub fn process_errors<F>(
    errors: &mut ErrorMap,
    content_key_of: F,
    localizer: &Localizer<'_>,
    ctx: &Context,
) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    fill_keys(errors);
    for (key, entry) in errors.iter_mut() {
        if entry.is_processed() {
            continue;
        }
        let content_key = content_key_of(key).unwrap_or_else(|| key.clone());
        let message_ctx = message_context(&content_key, entry, localizer, ctx)?;

        if entry.message.is_none() {
            let keys = message_keys(&content_key, entry, false);
            entry.message = Some(localizer.translate_first(&keys, &message_ctx)?);
        }
        if entry.header_message.is_none() {
            let keys = message_keys(&content_key, entry, true);
            entry.header_message = Some(localizer.translate_first(&keys, &message_ctx)?);
        }
        tracing::debug!(key = %key, kind = %entry.kind, "processed error message");
    }
    Ok(())
}

fn message_context(
    content_key: &str,
    entry: &ErrorEntry,
    localizer: &Localizer<'_>,
    ctx: &Context,
) -> Result<Context> {
    let label = localizer.translate(&format!("fields.{content_key}.label"), ctx)?;
    let legend = localizer.translate(&format!("fields.{content_key}.legend"), ctx)?;

    let mut message_ctx = ctx.clone();
    message_ctx.insert("key".into(), Value::String(format!("fields.{content_key}")));
    message_ctx.insert("label".into(), Value::String(label.to_lowercase()));
    message_ctx.insert("legend".into(), Value::String(legend.to_lowercase()));
    message_ctx.extend(entry.args.clone());
    Ok(message_ctx)
}

/// Errors to list in a summary: ungrouped errors and group representatives
#[must_use]
pub fn error_list(errors: &ErrorMap) -> Vec<&ErrorEntry> {
    errors
        .iter()
        .filter(|(key, entry)| {
            entry
                .error_group
                .as_deref()
                .is_none_or(|group| group == key.as_str())
        })
        .map(|(_, entry)| entry)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MixinsConfig;
    use crate::template::TemplateEngine;
    use crate::translate::{Catalog, Translator};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        catalog: Catalog,
        calls: AtomicUsize,
    }

    impl Translator for Counting {
        fn lookup(&self, key: &str) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.catalog.lookup(key)
        }
    }

    fn errors(entries: Vec<ErrorEntry>) -> ErrorMap {
        entries.into_iter().map(|e| (e.key.clone(), e)).collect()
    }

    #[test]
    fn test_direct_and_group_errors() {
        let map = errors(vec![ErrorEntry::new("dob", "required")]);

        assert_eq!(
            ErrorState::resolve("dob", None, &map),
            ErrorState::Direct(ErrorEntry::new("dob", "required"))
        );
        assert_eq!(ErrorState::resolve("dob-month", Some("dob"), &map), ErrorState::Group);
        assert_eq!(ErrorState::resolve("dob-month", None, &map), ErrorState::None);
        assert_eq!(ErrorState::resolve("other", Some("missing"), &map), ErrorState::None);
    }

    #[test]
    fn test_grouped_representative_does_not_propagate() {
        let map = errors(vec![ErrorEntry::new("dob", "date-day").in_group("dob")]);
        assert_eq!(ErrorState::resolve("dob-month", Some("dob"), &map), ErrorState::None);
        assert!(ErrorState::resolve("dob", Some("dob"), &map).is_error());
    }

    #[test]
    fn test_error_state_serialises_for_templates() {
        assert_eq!(serde_json::to_value(ErrorState::None).unwrap(), json!(false));
        assert_eq!(serde_json::to_value(ErrorState::Group).unwrap(), json!(true));
        let direct = serde_json::to_value(ErrorState::Direct(ErrorEntry::new("a", "required"))).unwrap();
        assert_eq!(direct["type"], json!("required"));
    }

    #[test]
    fn test_entry_accepts_camel_case() {
        let entry: ErrorEntry = serde_json::from_value(json!({
            "key": "dob-day", "type": "numeric", "errorGroup": "dob", "headerMessage": "Fix it"
        }))
        .unwrap();
        assert_eq!(entry.error_group.as_deref(), Some("dob"));
        assert_eq!(entry.header_message.as_deref(), Some("Fix it"));
    }

    #[test]
    fn test_keys_filled_from_map() {
        let mut map: ErrorMap = serde_json::from_value(json!({
            "dob": { "type": "required" },
            "email": { "key": "email", "type": "email" }
        }))
        .unwrap();
        assert_eq!(map["dob"].key, "");

        fill_keys(&mut map);
        let listed: Vec<&str> = error_list(&map).iter().map(|e| e.key.as_str()).collect();
        assert_eq!(listed, ["dob", "email"]);
    }

    #[test]
    fn test_message_key_order() {
        let entry = ErrorEntry::new("dob-day", "numeric").in_group("dob");
        let keys = message_keys("dob-day", &entry, true);
        assert_eq!(keys.len(), 18);
        assert_eq!(keys[0], "fields.dob-day.validation.numeric_header");
        assert_eq!(keys[4], "fields.dob.validation.numeric_header");
        assert_eq!(keys[8], "fields.dob-day.validation.numeric");
        assert_eq!(keys[12], "fields.dob.validation.numeric");
        assert_eq!(keys[16], "validation.numeric");
        assert_eq!(keys[17], "validation.default");

        let plain = message_keys("name", &ErrorEntry::new("name", "required"), false);
        assert_eq!(plain.len(), 6);
        assert_eq!(plain[0], "fields.name.validation.required");
    }

    #[test]
    fn test_process_errors_translates_with_context() {
        let engine = TemplateEngine::new(&MixinsConfig::default());
        let catalog = Catalog::new()
            .with("fields.full-name.label", "Full Name")
            .with("validation.required", "Enter your {{ label }}")
            .with("validation.maxlength", "{{ label }} must be {{ max }} characters or fewer")
            .with("fields.full-name.validation.required_header", "Name missing");
        let localizer = Localizer::new(&catalog, "", &engine);

        let mut map = errors(vec![
            ErrorEntry::new("name", "required"),
            ErrorEntry::new("nickname", "maxlength").with_arg("max", 10),
        ]);
        process_errors(
            &mut map,
            |key| (key == "name").then(|| "full-name".to_string()),
            &localizer,
            &Context::new(),
        )
        .unwrap();

        let name = &map["name"];
        assert_eq!(name.message.as_deref(), Some("Enter your full name"));
        assert_eq!(name.header_message.as_deref(), Some("Name missing"));

        let nickname = &map["nickname"];
        assert_eq!(
            nickname.message.as_deref(),
            Some("fields.nickname.label must be 10 characters or fewer")
        );
    }

    #[test]
    fn test_processing_is_idempotent() {
        let engine = TemplateEngine::new(&MixinsConfig::default());
        let counting = Counting {
            catalog: Catalog::new().with("validation.default", "Check this"),
            calls: AtomicUsize::new(0),
        };
        let localizer = Localizer::new(&counting, "", &engine);
        let mut map = errors(vec![ErrorEntry::new("email", "email")]);

        process_errors(&mut map, |_| None, &localizer, &Context::new()).unwrap();
        let first = counting.calls.load(Ordering::SeqCst);
        assert!(first > 0);

        process_errors(&mut map, |_| None, &localizer, &Context::new()).unwrap();
        assert_eq!(counting.calls.load(Ordering::SeqCst), first);
        assert_eq!(map["email"].message.as_deref(), Some("Check this"));
    }

    #[test]
    fn test_existing_message_is_kept() {
        let engine = TemplateEngine::new(&MixinsConfig::default());
        let localizer = Localizer::new(&crate::translate::IdentityTranslator, "", &engine);
        let mut entry = ErrorEntry::new("email", "email");
        entry.message = Some("Custom".into());
        let mut map = errors(vec![entry]);

        process_errors(&mut map, |_| None, &localizer, &Context::new()).unwrap();
        assert_eq!(map["email"].message.as_deref(), Some("Custom"));
        assert_eq!(map["email"].header_message.as_deref(), Some("validation.default"));
    }

    #[test]
    fn test_error_list_keeps_representatives() {
        let map = errors(vec![
            ErrorEntry::new("dob", "date-day").in_group("dob"),
            ErrorEntry::new("dob-day", "date-day").in_group("dob"),
            ErrorEntry::new("email", "required"),
        ]);
        let keys: Vec<&str> = error_list(&map).iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["dob", "email"]);
    }
}
