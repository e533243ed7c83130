//! Field configuration types and their merge rules
//!
//! A [`FieldConfig`] is one layer of configuration for a field: built-in
//! variant defaults, the static `fields` map, the per-request map or the
//! inline options of a helper call. Layers are combined with
//! [`FieldConfig::overlay`]; the combined result for one key is a
//! [`FieldDescriptor`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Field configurations keyed by field key
pub type FieldConfigs = BTreeMap<String, FieldConfig>;

/// Field type tag
///
/// Known types get a variant; anything else (`email`, `password`, ...) is
/// carried through verbatim as the input `type` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    /// Single line text input
    Text,
    /// Numeric input
    Number,
    /// Telephone number input
    Phone,
    /// Day/month/year date
    Date,
    /// Select dropdown
    Select,
    /// Radio button group
    Radio,
    /// Checkbox or checkbox group
    Checkbox,
    /// Generic option group
    Group,
    /// Multi-line text
    Textarea,
    /// Submit button
    Submit,
    /// Error group marker
    ErrorGroup,
    /// Any other input type
    Other(String),
}

impl FieldType {
    /// The type name as written in configuration and templates
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Phone => "phone",
            Self::Date => "date",
            Self::Select => "select",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Group => "group",
            Self::Textarea => "textarea",
            Self::Submit => "submit",
            Self::ErrorGroup => "error-group",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for FieldType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "text" => Self::Text,
            "number" => Self::Number,
            "phone" => Self::Phone,
            "date" => Self::Date,
            "select" => Self::Select,
            "radio" => Self::Radio,
            "checkbox" => Self::Checkbox,
            "group" => Self::Group,
            "textarea" => Self::Textarea,
            "submit" => Self::Submit,
            "error-group" => Self::ErrorGroup,
            _ => Self::Other(name),
        }
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Class names given as one string or a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassNames {
    /// A single (possibly space separated) class string
    One(String),
    /// A list of classes
    Many(Vec<String>),
}

impl ClassNames {
    /// Classes joined with a single space
    #[must_use]
    pub fn joined(&self) -> String {
        match self {
            Self::One(class) => class.clone(),
            Self::Many(classes) => classes.join(" "),
        }
    }
}

impl From<&str> for ClassNames {
    fn from(class: &str) -> Self {
        Self::One(class.to_string())
    }
}

/// A string setting that may be switched off with `false`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextSetting {
    /// `false` suppresses the text; `true` is treated as unset
    Flag(bool),
    /// Literal text or translation key
    Text(String),
}

impl TextSetting {
    /// Whether this setting suppresses the text entirely
    #[must_use]
    pub const fn is_suppressed(&self) -> bool {
        matches!(self, Self::Flag(false))
    }

    /// The configured string, if non-empty
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for TextSetting {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// Object form of a field part: `label: { value, key, className, ... }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartConfig {
    /// Literal text, rendered as a template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<TextSetting>,
    /// Translation key override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<TextSetting>,
    /// Class names for the part's element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<ClassNames>,
    /// Element id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Extra element attributes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<Attribute>>,
}

/// Configuration of a label, hint, legend or group part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextConfig {
    /// `false` suppresses the part
    Flag(bool),
    /// A translation key override
    Key(String),
    /// The full object form
    Detailed(PartConfig),
}

impl TextConfig {
    fn detailed(&self) -> Option<&PartConfig> {
        match self {
            Self::Detailed(part) => Some(part),
            _ => None,
        }
    }
}

impl From<&str> for TextConfig {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

/// An element attribute passed through verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name
    pub attribute: String,
    /// Attribute value
    pub value: Value,
}

impl Attribute {
    /// Create a new attribute
    #[must_use]
    pub fn new(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

/// Validator reference: a bare name or `{type, arguments}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Validator {
    /// Bare validator name, e.g. `"required"`
    Named(String),
    /// Validator with arguments
    Typed {
        /// Validator name
        #[serde(rename = "type")]
        kind: String,
        /// Validator arguments: a scalar or a list
        #[serde(default, skip_serializing_if = "Option::is_none")]
        arguments: Option<Value>,
    },
}

impl Validator {
    /// Create a validator with arguments
    #[must_use]
    pub fn typed(kind: impl Into<String>, arguments: impl Into<Value>) -> Self {
        Self::Typed {
            kind: kind.into(),
            arguments: Some(arguments.into()),
        }
    }

    /// The validator's name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Typed { kind, .. } => kind,
        }
    }

    /// First argument of a list, or the scalar argument
    #[must_use]
    pub fn argument(&self) -> Option<&Value> {
        match self {
            Self::Named(_) => None,
            Self::Typed { arguments, .. } => match arguments.as_ref()? {
                Value::Array(list) => list.first(),
                scalar => Some(scalar),
            },
        }
    }
}

impl From<&str> for Validator {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

/// One configured option of a select, radio or checkbox group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionSpec {
    /// Full object form
    Detailed(OptionConfig),
    /// A bare value
    Scalar(Value),
}

impl OptionSpec {
    /// Normalise to the object form
    #[must_use]
    pub fn into_config(self) -> OptionConfig {
        match self {
            Self::Detailed(config) => config,
            Self::Scalar(value) => OptionConfig {
                value: Some(value),
                ..OptionConfig::default()
            },
        }
    }
}

impl From<&str> for OptionSpec {
    fn from(value: &str) -> Self {
        Self::Scalar(Value::String(value.to_string()))
    }
}

/// Object form of an option
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionConfig {
    /// Submitted value of the option
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Literal label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Translation key of the label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_key: Option<String>,
    /// Key of the field revealed by this option
    #[serde(
        default,
        deserialize_with = "deserialize_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub toggle: Option<String>,
    /// Conditional content for this option
    #[serde(
        default,
        deserialize_with = "deserialize_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub child: Option<String>,
    /// Extra element attributes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<Attribute>>,
}

/// Part of a field that carries text, classes or attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    /// The field element itself
    Field,
    /// The wrapping form group
    Group,
    /// The label element
    Label,
    /// The text span inside the label
    LabelText,
    /// The hint text
    Hint,
    /// The fieldset legend
    Legend,
}

impl Part {
    /// Name used in derived translation keys
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Field => "field",
            Self::Group => "group",
            Self::Label => "label",
            Self::LabelText => "labelText",
            Self::Hint => "hint",
            Self::Legend => "legend",
        }
    }
}

/// One layer of field configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    /// Field key (only meaningful for inline options)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Field type
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    /// Label configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<TextConfig>,
    /// Hint configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<TextConfig>,
    /// Legend configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<TextConfig>,
    /// Group wrapper configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<TextConfig>,
    /// Label text span configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_text: Option<TextConfig>,
    /// Flat form of `label.value`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_value: Option<TextSetting>,
    /// Flat form of `label.key`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_key: Option<TextSetting>,
    /// Flat form of `label.className`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_class_name: Option<ClassNames>,
    /// Flat form of `labelText.className`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_text_class_name: Option<ClassNames>,
    /// Flat form of `hint.value`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint_value: Option<TextSetting>,
    /// Flat form of `hint.key`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint_key: Option<TextSetting>,
    /// Flat form of `hint.className`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint_class_name: Option<ClassNames>,
    /// Flat form of `hint.id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint_id: Option<String>,
    /// Flat form of `legend.value`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend_value: Option<TextSetting>,
    /// Flat form of `legend.key`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend_key: Option<TextSetting>,
    /// Flat form of `legend.className`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend_class_name: Option<ClassNames>,
    /// Flat form of `group.className`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_class_name: Option<ClassNames>,
    /// Flat form of `group.attributes`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_attributes: Option<Vec<Attribute>>,
    /// Explicit required flag, wins over validators
    #[serde(
        default,
        deserialize_with = "deserialize_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub required: Option<bool>,
    /// Validators, in order
    #[serde(
        default,
        deserialize_with = "deserialize_validators",
        skip_serializing_if = "Option::is_none"
    )]
    pub validate: Option<Vec<Validator>>,
    /// Field element class names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<ClassNames>,
    /// Field element attributes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<Attribute>>,
    /// Group options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<OptionSpec>>,
    /// Group options (alias that wins over `options`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<OptionSpec>>,
    /// Part of a compound field: no standalone wrapper
    #[serde(
        default,
        deserialize_with = "deserialize_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub compound: Option<bool>,
    /// Key of the field revealed by this one
    #[serde(
        default,
        deserialize_with = "deserialize_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub toggle: Option<String>,
    /// Conditional content
    #[serde(
        default,
        deserialize_with = "deserialize_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub child: Option<String>,
    /// Key of the group this field reports errors under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_group: Option<String>,
    /// Alternate key for translation lookups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_key: Option<String>,
    /// Date without a day component
    #[serde(
        default,
        deserialize_with = "deserialize_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub inexact: Option<bool>,
    /// Century split bias for two digit years
    #[serde(
        default,
        deserialize_with = "deserialize_offset",
        skip_serializing_if = "Option::is_none"
    )]
    pub offset: Option<i32>,
    /// Minimum value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Value>,
    /// Maximum value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Value>,
    /// Maximum length when no length validator is configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maxlength: Option<Value>,
    /// Pattern when no pattern validator is configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Autocomplete attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autocomplete: Option<String>,
    /// Value formatters applied before validation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatter: Option<Vec<String>>,
    /// Extra template locals merged last into the render options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locals: Option<Map<String, Value>>,
    /// Any other properties, passed through to templates
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

macro_rules! overlay_fields {
    ($target:expr, $source:expr; $($field:ident),+ $(,)?) => {
        $(
            if $source.$field.is_some() {
                $target.$field = $source.$field;
            }
        )+
    };
}

impl FieldConfig {
    /// Parse a configuration layer from a JSON value
    ///
    /// # Errors
    ///
    /// Returns an error if the value does not fit the configuration shape.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Overwrite every property set in `other`
    ///
    /// Properties are replaced whole; lists are never concatenated.
    pub fn overlay(&mut self, other: Self) {
        overlay_fields!(self, other;
            key, field_type, label, hint, legend, group, label_text,
            label_value, label_key, label_class_name, label_text_class_name,
            hint_value, hint_key, hint_class_name, hint_id,
            legend_value, legend_key, legend_class_name,
            group_class_name, group_attributes,
            required, validate, class_name, attributes, options, items,
            compound, toggle, child, error_group, content_key, inexact, offset,
            min, max, maxlength, pattern, autocomplete, formatter, locals,
        );
        self.extra.extend(other.extra);
    }

    /// Builder-style [`FieldConfig::overlay`]
    #[must_use]
    pub fn overlaid(mut self, other: Self) -> Self {
        self.overlay(other);
        self
    }

    /// Find a validator by name
    #[must_use]
    pub fn validator(&self, name: &str) -> Option<&Validator> {
        self.validate.as_deref()?.iter().find(|v| v.name() == name)
    }

    /// Whether the validators include `name`
    #[must_use]
    pub fn has_validator(&self, name: &str) -> bool {
        self.validator(name).is_some()
    }

    /// Argument of the validator `name`: first list element or scalar
    #[must_use]
    pub fn validator_argument(&self, name: &str) -> Option<&Value> {
        self.validator(name)?.argument()
    }

    fn part(&self, part: Part) -> Option<&TextConfig> {
        match part {
            Part::Field => None,
            Part::Group => self.group.as_ref(),
            Part::Label => self.label.as_ref(),
            Part::LabelText => self.label_text.as_ref(),
            Part::Hint => self.hint.as_ref(),
            Part::Legend => self.legend.as_ref(),
        }
    }

    fn detailed(&self, part: Part) -> Option<&PartConfig> {
        self.part(part).and_then(TextConfig::detailed)
    }

    /// Literal text configured for a part
    #[must_use]
    pub fn part_value(&self, part: Part) -> Option<&TextSetting> {
        if let Some(value) = self.detailed(part).and_then(|p| p.value.as_ref()) {
            return Some(value);
        }
        match part {
            Part::Label => self.label_value.as_ref(),
            Part::Hint => self.hint_value.as_ref(),
            Part::Legend => self.legend_value.as_ref(),
            Part::Field | Part::Group | Part::LabelText => None,
        }
    }

    /// Translation key override configured for a part
    ///
    /// A bare string or `false` in place of the part object is the key.
    #[must_use]
    pub fn part_key(&self, part: Part) -> Option<TextSetting> {
        match self.part(part) {
            Some(TextConfig::Flag(false)) => return Some(TextSetting::Flag(false)),
            Some(TextConfig::Key(key)) => return Some(TextSetting::Text(key.clone())),
            Some(TextConfig::Detailed(detail)) if detail.key.is_some() => return detail.key.clone(),
            _ => {}
        }
        match part {
            Part::Label => self.label_key.clone(),
            Part::Hint => self.hint_key.clone(),
            Part::Legend => self.legend_key.clone(),
            Part::Field | Part::Group | Part::LabelText => None,
        }
    }

    /// Class names configured for a part, joined with a single space
    #[must_use]
    pub fn part_class_name(&self, part: Part) -> Option<String> {
        let classes = match part {
            Part::Field => self.class_name.as_ref(),
            _ => self
                .detailed(part)
                .and_then(|p| p.class_name.as_ref())
                .or(match part {
                    Part::Group => self.group_class_name.as_ref(),
                    Part::Label => self.label_class_name.as_ref(),
                    Part::LabelText => self.label_text_class_name.as_ref(),
                    Part::Hint => self.hint_class_name.as_ref(),
                    Part::Legend => self.legend_class_name.as_ref(),
                    Part::Field => None,
                }),
        };
        classes.map(ClassNames::joined).filter(|c| !c.is_empty())
    }

    /// Element id configured for a part
    #[must_use]
    pub fn part_id(&self, part: Part) -> Option<&str> {
        self.detailed(part)
            .and_then(|p| p.id.as_deref())
            .or(match part {
                Part::Hint => self.hint_id.as_deref(),
                _ => None,
            })
    }

    /// Attributes configured for a part
    #[must_use]
    pub fn part_attributes(&self, part: Part) -> Option<&[Attribute]> {
        match part {
            Part::Field => self.attributes.as_deref(),
            _ => self
                .detailed(part)
                .and_then(|p| p.attributes.as_deref())
                .or(match part {
                    Part::Group => self.group_attributes.as_deref(),
                    _ => None,
                }),
        }
    }

    /// Group options, preferring `items` over `options`
    #[must_use]
    pub fn option_specs(&self) -> &[OptionSpec] {
        self.items
            .as_deref()
            .or(self.options.as_deref())
            .unwrap_or_default()
    }
}

/// Fully merged configuration for one field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    key: String,
    /// Merged configuration
    pub config: FieldConfig,
}

impl FieldDescriptor {
    /// Merge configuration layers, lowest precedence first
    ///
    /// The key is fixed here and cannot change afterwards.
    pub fn merge(key: impl Into<String>, layers: impl IntoIterator<Item = FieldConfig>) -> Self {
        let key = key.into();
        let config = layers
            .into_iter()
            .fold(FieldConfig::default(), FieldConfig::overlaid);
        tracing::trace!(key = %key, "field descriptor merged");
        Self { key, config }
    }

    /// The field key
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Key used for translation lookups (`contentKey` or `key`)
    #[must_use]
    pub fn content_key(&self) -> &str {
        self.config.content_key.as_deref().unwrap_or(&self.key)
    }

    /// Whether the field is required
    ///
    /// An explicit `required` wins; otherwise true iff a `required`
    /// validator is configured.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.config
            .required
            .unwrap_or_else(|| self.config.has_validator("required"))
    }

    /// Maximum length from validators (`maxlength`, then `exactlength`)
    /// or the `maxlength` property
    #[must_use]
    pub fn maxlength(&self) -> Option<Value> {
        self.config
            .validator_argument("maxlength")
            .or_else(|| self.config.validator_argument("exactlength"))
            .or(self.config.maxlength.as_ref())
            .cloned()
    }

    /// Pattern from the `pattern` validator or the `pattern` property
    #[must_use]
    pub fn pattern(&self) -> Option<Value> {
        self.config
            .validator_argument("pattern")
            .cloned()
            .or_else(|| self.config.pattern.clone().map(Value::String))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

fn deserialize_validators<'de, D>(deserializer: D) -> Result<Option<Vec<Validator>>, D::Error>
where
    D: Deserializer<'de>,
{
    let validators = Option::<OneOrMany<Validator>>::deserialize(deserializer)?;
    Ok(validators.map(|v| match v {
        OneOrMany::One(validator) => vec![validator],
        OneOrMany::Many(validators) => validators,
    }))
}

/// Flags read by truthiness: `0`, `""` and `false` are false
fn deserialize_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::Null => None,
        Value::Bool(flag) => Some(flag),
        Value::Number(n) => Some(n.as_f64().is_some_and(|n| n.abs() > 0.0)),
        Value::String(s) => Some(!s.is_empty()),
        Value::Array(_) | Value::Object(_) => Some(true),
    }))
}

/// Strings that also accept numeric and boolean scalars
fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string, found {other}"
        ))),
    }
}

fn deserialize_offset<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let offset = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse::<i32>().ok(),
        Some(_) => None,
    };
    offset
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom("offset must be an integer"))
}
