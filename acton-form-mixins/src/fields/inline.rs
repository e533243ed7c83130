//! Inline helper arguments: `key opt1=val1 opt2 opt3="str val"`

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use super::descriptor::FieldConfig;
use crate::error::{MixinError, Result};

static KEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*((?:\{\{.*?\}\}|\{%.*?%\}|\S)+)\s*(.+?)?\s*$").expect("Invalid regex")
});

static OPTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\s*([^=\s]+?)(=("[^"]*?"|\d+|true|false|null))?([,;\s]+|$)"#)
        .expect("Invalid regex")
});

/// Parse an inline argument string into a configuration layer
///
/// The first token is the field key; `{{ ... }}` and `{% ... %}` spans
/// inside it may contain spaces. A key containing markup is rendered
/// through `render` first. Every following token is `name=value` (a JSON
/// string, integer, boolean or null, itself rendered through `render`
/// before parsing) or a bare `name` meaning `true`.
///
/// # Errors
///
/// Returns [`MixinError::InvalidSyntax`] if no key can be read or a value is
/// not a valid literal, and any error produced by `render`.
pub fn parse_inline<F>(content: &str, render: F) -> Result<FieldConfig>
where
    F: Fn(&str) -> Result<String>,
{
    let captures = KEY_PATTERN
        .captures(content)
        .ok_or_else(|| MixinError::InvalidSyntax(content.to_string()))?;

    let mut key = captures[1].to_string();
    if key.contains("{{") || key.contains("{%") {
        key = render(&key)?;
    }
    tracing::debug!(content, key = %key, "decoding inline mixin options");

    let mut options = Map::new();
    if let Some(rest) = captures.get(2) {
        for option in OPTION_PATTERN.captures_iter(rest.as_str()) {
            let value = match option.get(3) {
                Some(literal) => {
                    let rendered = render(literal.as_str())?;
                    serde_json::from_str(&rendered)
                        .map_err(|_| MixinError::InvalidSyntax(content.to_string()))?
                }
                None => Value::Bool(true),
            };
            options.insert(option[1].to_string(), value);
        }
    }
    options.insert("key".to_string(), Value::String(key));

    Ok(FieldConfig::from_value(Value::Object(options))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::descriptor::{TextConfig, TextSetting};

    fn verbatim(text: &str) -> Result<String> {
        Ok(text.to_string())
    }

    #[test]
    fn test_key_only() {
        let config = parse_inline("  email  ", verbatim).unwrap();
        assert_eq!(config.key.as_deref(), Some("email"));
        assert!(config.extra.is_empty());
    }

    #[test]
    fn test_label_and_bare_flag() {
        let config = parse_inline(r#"field-name label="My Label" required"#, verbatim).unwrap();
        assert_eq!(config.key.as_deref(), Some("field-name"));
        assert_eq!(config.label, Some(TextConfig::Key("My Label".into())));
        assert_eq!(config.required, Some(true));
    }

    #[test]
    fn test_literal_kinds_and_separators() {
        let config = parse_inline(
            r#"dob inexact=true, offset=5; hintValue="Enter a date" compound=false className=null"#,
            verbatim,
        )
        .unwrap();
        assert_eq!(config.inexact, Some(true));
        assert_eq!(config.offset, Some(5));
        assert_eq!(config.hint_value, Some(TextSetting::Text("Enter a date".into())));
        assert_eq!(config.compound, Some(false));
        assert_eq!(config.class_name, None);
    }

    #[test]
    fn test_unknown_options_are_kept() {
        let config = parse_inline("email data-track", verbatim).unwrap();
        assert_eq!(config.extra.get("data-track"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_templated_key_is_rendered() {
        let config = parse_inline("{{prefix}}-name", |text| {
            Ok(text.replace("{{prefix}}", "applicant"))
        })
        .unwrap();
        assert_eq!(config.key.as_deref(), Some("applicant-name"));
    }

    #[test]
    fn test_spaced_template_key_stays_one_token() {
        let config = parse_inline(r#"{{ prefix }}-address label="Home" required"#, |text| {
            Ok(text.replace("{{ prefix }}", "home"))
        })
        .unwrap();
        assert_eq!(config.key.as_deref(), Some("home-address"));
        assert_eq!(config.label, Some(TextConfig::Key("Home".into())));
        assert_eq!(config.required, Some(true));

        let config = parse_inline("{% if a %}x{% endif %}-b", |_| Ok("x-b".into())).unwrap();
        assert_eq!(config.key.as_deref(), Some("x-b"));
    }

    #[test]
    fn test_mismatched_literal_types_are_accepted() {
        let config = parse_inline(r#"dob required=1 toggle=5 offset="5""#, verbatim).unwrap();
        assert_eq!(config.required, Some(true));
        assert_eq!(config.toggle.as_deref(), Some("5"));
        assert_eq!(config.offset, Some(5));
    }

    #[test]
    fn test_values_are_rendered_before_parsing() {
        let config = parse_inline(r#"email label="{{name}}""#, |text| Ok(text.replace("{{name}}", "Email"))).unwrap();
        assert_eq!(config.label, Some(TextConfig::Key("Email".into())));
    }

    #[test]
    fn test_blank_content_is_invalid() {
        let err = parse_inline("   ", verbatim).unwrap_err();
        assert!(matches!(err, MixinError::InvalidSyntax(_)));
        assert!(err.to_string().starts_with("Invalid syntax for mixin options"));
    }
}
