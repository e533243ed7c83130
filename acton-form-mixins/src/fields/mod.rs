//! Field configuration resolution and rendering
//!
//! A helper call flows through this module in order:
//!
//! 1. [`inline`] parses `"key opt=value ..."` into a configuration layer
//! 2. [`descriptor`] merges the layers into a [`FieldDescriptor`]
//! 3. [`resolver`] derives the display attributes
//! 4. [`render`] composes compound helpers and renders the partials,
//!    rendering any child content on the way

pub mod descriptor;
pub mod inline;
pub mod mixin;
pub mod options;
pub mod render;
pub mod resolver;

mod child;

pub use child::PANEL_PARTIAL;
pub use descriptor::{
    Attribute, ClassNames, FieldConfig, FieldConfigs, FieldDescriptor, FieldType, OptionConfig,
    OptionSpec, Part, PartConfig, TextConfig, TextSetting, Validator,
};
pub use mixin::{FieldKind, Mixin, Variant};
pub use options::{
    CheckboxOptions, ErrorGroupOptions, GroupOptions, InputOptions, OptionGroupOptions,
    OptionRecord, RenderOptions, ResolvedField, SelectOptions, SubmitOptions, TextOptions,
};
pub use render::FieldRenderer;
pub use resolver::FieldResolver;

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::template::Context;

/// What a helper is invoked with
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Inline argument string from a template
    Inline(String),
    /// Configuration built in code
    Config(FieldConfig),
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Self::Inline(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Self::Inline(text)
    }
}

impl From<FieldConfig> for Content {
    fn from(config: FieldConfig) -> Self {
        Self::Config(config)
    }
}

/// String form of a submitted or configured value
///
/// Lists join with `,`; null is empty.
#[must_use]
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

fn to_context<T: Serialize>(value: &T) -> Result<Context> {
    Ok(match serde_json::to_value(value)? {
        Value::Object(map) => map,
        _ => Context::new(),
    })
}
