//! Render options handed to the partial templates
//!
//! Each helper produces one of these typed records. They serialise to the
//! flat snake_case context the bundled partials read.

use serde::Serialize;
use serde_json::{Map, Value};

use super::descriptor::Attribute;
use crate::error::Result;
use crate::template::Context;
use crate::validation::ErrorState;

/// Options shared by every input-like field
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InputOptions {
    /// Field key, used as the element name and id
    pub key: String,
    /// Field element classes
    pub class_name: Option<String>,
    /// Translated hint
    pub hint: Option<String>,
    /// Hint classes
    pub hint_class_name: String,
    /// Hint element id
    pub hint_id: String,
    /// Error state
    pub error: ErrorState,
    /// Whether the field is required
    pub required: bool,
    /// Key of the group the field reports errors under
    pub error_group: Option<String>,
    /// Attributes of the wrapping group
    pub group_attributes: Option<Vec<Attribute>>,
    /// Classes of the wrapping group
    pub group_class_name: Option<String>,
}

/// Options of a text-like input
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextOptions {
    /// Shared input options
    #[serde(flatten)]
    pub input: InputOptions,
    /// Submitted value
    pub value: Option<Value>,
    /// Translated label
    pub label: Option<String>,
    /// Label classes
    pub label_class_name: String,
    /// Classes of the label text span
    pub label_text_class_name: Option<String>,
    /// HTML input type
    #[serde(rename = "type")]
    pub input_type: String,
    /// Minimum value
    pub min: Option<Value>,
    /// Maximum value
    pub max: Option<Value>,
    /// Maximum length
    pub maxlength: Option<Value>,
    /// Input pattern
    pub pattern: Option<Value>,
    /// Rendered inside a compound field
    pub compound: bool,
    /// Autocomplete hint
    pub autocomplete: Option<String>,
    /// Extra element attributes
    pub attributes: Option<Vec<Attribute>>,
}

/// One resolved choice of an option group
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OptionRecord {
    /// Submitted value of the choice
    pub value: Option<Value>,
    /// Translated label
    pub label: String,
    /// Key of the field this choice reveals
    pub toggle: Option<String>,
    /// Conditional content source
    pub child: Option<String>,
    /// Extra element attributes
    pub attributes: Option<Vec<Attribute>>,
    /// Group type: `radio`, `checkbox` or `group`
    #[serde(rename = "type")]
    pub option_type: String,
    /// Whether the submitted value selects this choice
    pub selected: bool,
    /// Rendered conditional content
    pub child_html: Option<String>,
}

/// Fieldset options of an option group
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupOptions {
    /// Translated legend
    pub legend: Option<String>,
    /// Legend classes
    pub legend_class_name: Option<String>,
    /// `radiogroup` for radios, `group` otherwise
    pub role: String,
    /// Resolved choices, in configured order
    pub items: Vec<OptionRecord>,
}

/// Radio or checkbox group
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OptionGroupOptions {
    /// Shared input options
    #[serde(flatten)]
    pub input: InputOptions,
    /// Fieldset and choices
    #[serde(flatten)]
    pub group: GroupOptions,
}

/// Dropdown: text input options plus the option group
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SelectOptions {
    /// Text input options
    #[serde(flatten)]
    pub text: TextOptions,
    /// Choices
    #[serde(flatten)]
    pub group: GroupOptions,
}

/// Single checkbox
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CheckboxOptions {
    /// Shared input options
    #[serde(flatten)]
    pub input: InputOptions,
    /// Translated label
    pub label: Option<String>,
    /// Whether the checkbox is checked
    pub selected: bool,
    /// Rendered inside a compound field
    pub compound: bool,
    /// Extra element attributes
    pub attributes: Option<Vec<Attribute>>,
    /// Key of the field this checkbox reveals
    pub toggle: Option<String>,
    /// Conditional content source
    pub child: Option<String>,
    /// Rendered conditional content
    pub child_html: Option<String>,
}

/// Submit button
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubmitOptions {
    /// Button id
    pub key: String,
    /// Translated button text
    pub value: Option<String>,
}

/// Opening error group fieldset
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ErrorGroupOptions {
    /// Shared input options
    #[serde(flatten)]
    pub input: InputOptions,
    /// Translated legend
    pub legend: Option<String>,
    /// Legend classes
    pub legend_class_name: Option<String>,
}

/// Resolved options of any helper
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RenderOptions {
    /// Text-like input
    Text(TextOptions),
    /// Radio or checkbox group
    OptionGroup(OptionGroupOptions),
    /// Dropdown
    Select(SelectOptions),
    /// Single checkbox
    Checkbox(CheckboxOptions),
    /// Submit button
    Submit(SubmitOptions),
    /// Opening error group
    ErrorGroup(ErrorGroupOptions),
    /// Closing marker; carries nothing
    ErrorGroupEnd,
}

impl RenderOptions {
    /// Options shared by input-like fields
    #[must_use]
    pub const fn input(&self) -> Option<&InputOptions> {
        match self {
            Self::Text(options) => Some(&options.input),
            Self::OptionGroup(options) => Some(&options.input),
            Self::Select(options) => Some(&options.text.input),
            Self::Checkbox(options) => Some(&options.input),
            Self::ErrorGroup(options) => Some(&options.input),
            Self::Submit(_) | Self::ErrorGroupEnd => None,
        }
    }

    /// Resolved option records, for group fields
    #[must_use]
    pub fn items(&self) -> &[OptionRecord] {
        match self {
            Self::OptionGroup(options) => &options.group.items,
            Self::Select(options) => &options.group.items,
            _ => &[],
        }
    }
}

/// One partial to render with its options
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedField {
    /// Partial template name
    pub partial: &'static str,
    /// Resolved options
    pub options: RenderOptions,
    /// Field `locals`, merged over the options
    pub locals: Map<String, Value>,
}

impl ResolvedField {
    /// The options as a template context, with `locals` applied last
    ///
    /// # Errors
    ///
    /// Returns an error if the options cannot be serialised.
    pub fn to_context(&self) -> Result<Context> {
        let mut ctx = super::to_context(&self.options)?;
        ctx.extend(self.locals.clone());
        Ok(ctx)
    }
}
