//! Attribute derivation for a single merged field
//!
//! A [`FieldResolver`] pairs a [`FieldDescriptor`] with the helper that is
//! rendering it and computes every display attribute: translated texts,
//! class names with their defaults, validator-derived constraints, the error
//! state and resolved options.

use serde_json::Value;

use super::descriptor::{FieldDescriptor, FieldType, Part, TextSetting};
use super::mixin::{FieldKind, Mixin, Variant};
use super::options::{
    CheckboxOptions, ErrorGroupOptions, GroupOptions, InputOptions, OptionGroupOptions,
    OptionRecord, RenderOptions, ResolvedField, SelectOptions, TextOptions,
};
use super::render::FieldRenderer;
use super::value_text;
use crate::error::Result;
use crate::template::merged;
use crate::validation::ErrorState;

const LABEL_CLASS: &str = "form-label-bold";
const HINT_CLASS: &str = "form-hint";
const CHECKBOX_CLASS: &str = "block-label";

/// Resolves the render options of one field
pub struct FieldResolver<'r, 'a> {
    renderer: &'r FieldRenderer<'a>,
    mixin: Mixin,
    variant: Variant,
    descriptor: FieldDescriptor,
}

impl<'r, 'a> FieldResolver<'r, 'a> {
    pub(crate) fn new(
        renderer: &'r FieldRenderer<'a>,
        mixin: Mixin,
        variant: Variant,
        descriptor: FieldDescriptor,
    ) -> Self {
        Self {
            renderer,
            mixin,
            variant,
            descriptor,
        }
    }

    /// The merged descriptor
    #[must_use]
    pub const fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    fn key(&self) -> &str {
        self.descriptor.key()
    }

    /// Whether the field is required, honouring forced variants
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.variant.force_required || self.descriptor.is_required()
    }

    /// Maximum length, honouring the variant fallback
    #[must_use]
    pub fn maxlength(&self) -> Option<Value> {
        self.descriptor
            .maxlength()
            .or_else(|| self.variant.maxlength_fallback.map(Value::from))
    }

    /// Submitted value of the field
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.renderer.values.get(self.key())
    }

    /// Error state of the field
    #[must_use]
    pub fn error(&self) -> ErrorState {
        ErrorState::resolve(
            self.key(),
            self.descriptor.config.error_group.as_deref(),
            self.renderer.errors,
        )
    }

    /// Class names of a part
    #[must_use]
    pub fn class_name(&self, part: Part) -> Option<String> {
        self.descriptor.config.part_class_name(part)
    }

    /// Translation key of a part, or `None` when the part is suppressed
    #[must_use]
    pub fn translation_key(&self, part: Part) -> Option<String> {
        match self.descriptor.config.part_key(part) {
            Some(TextSetting::Flag(false)) => None,
            Some(TextSetting::Text(key)) if !key.is_empty() => Some(key),
            _ => Some(format!(
                "fields.{}.{}",
                self.descriptor.content_key(),
                part.as_str()
            )),
        }
    }

    /// Display text of a part
    ///
    /// A literal value is rendered against the context. Otherwise the
    /// translation key is translated; for optional parts a missing
    /// translation yields `None` instead of the key.
    ///
    /// # Errors
    ///
    /// Returns an error if the text or translation fails to render.
    pub fn text(&self, part: Part, optional: bool) -> Result<Option<String>> {
        if let Some(value) = self.descriptor.config.part_value(part) {
            if value.is_suppressed() {
                return Ok(None);
            }
            if let Some(text) = value.text() {
                return self.renderer.render_text(text).map(Some);
            }
        }

        let Some(key) = self.translation_key(part) else {
            return Ok(None);
        };
        let localizer = self.renderer.localizer;
        if optional {
            localizer.conditional_translate(&key, &self.renderer.ctx)
        } else {
            localizer.translate(&key, &self.renderer.ctx).map(Some)
        }
    }

    /// Options common to every input-like field
    ///
    /// # Errors
    ///
    /// Returns an error if the hint fails to render.
    pub fn input_options(&self) -> Result<InputOptions> {
        let config = &self.descriptor.config;
        Ok(InputOptions {
            key: self.key().to_string(),
            class_name: self.class_name(Part::Field),
            hint: self.text(Part::Hint, true)?,
            hint_class_name: self
                .class_name(Part::Hint)
                .unwrap_or_else(|| HINT_CLASS.to_string()),
            hint_id: config
                .part_id(Part::Hint)
                .map_or_else(|| format!("{}-hint", self.key()), str::to_string),
            error: self.error(),
            required: self.is_required(),
            error_group: config.error_group.clone(),
            group_attributes: config.part_attributes(Part::Group).map(<[_]>::to_vec),
            group_class_name: self.class_name(Part::Group),
        })
    }

    /// Options of a text-like input
    ///
    /// # Errors
    ///
    /// Returns an error if a text fails to render.
    pub fn text_options(&self) -> Result<TextOptions> {
        let config = &self.descriptor.config;
        Ok(TextOptions {
            input: self.input_options()?,
            value: self.value().cloned(),
            label: self.text(Part::Label, false)?,
            label_class_name: self
                .class_name(Part::Label)
                .unwrap_or_else(|| LABEL_CLASS.to_string()),
            label_text_class_name: self.class_name(Part::LabelText),
            input_type: config
                .field_type
                .as_ref()
                .map_or_else(|| FieldType::Text.to_string(), ToString::to_string),
            min: config.min.clone(),
            max: config.max.clone(),
            maxlength: self.maxlength(),
            pattern: self.descriptor.pattern(),
            compound: config.compound.unwrap_or(false),
            autocomplete: config.autocomplete.clone(),
            attributes: config.attributes.clone(),
        })
    }

    /// Type shared by every option of a group
    #[must_use]
    pub fn group_type(&self) -> FieldType {
        self.descriptor
            .config
            .field_type
            .clone()
            .unwrap_or_else(|| self.mixin.default_type())
    }

    /// Resolve the configured options against the submitted value
    ///
    /// # Errors
    ///
    /// Returns an error if a label or child fails to render.
    pub fn items(&self) -> Result<Vec<OptionRecord>> {
        let option_type = self.group_type().to_string();
        self.descriptor
            .config
            .option_specs()
            .iter()
            .map(|spec| {
                let item = spec.clone().into_config();
                let label = match item.label.filter(|label| !label.is_empty()) {
                    Some(label) => label,
                    None => self.option_label(item.label_key.as_deref(), item.value.as_ref())?,
                };

                let mut record = OptionRecord {
                    selected: self.is_selected(item.value.as_ref()),
                    value: item.value,
                    label,
                    toggle: item.toggle,
                    child: item.child,
                    attributes: item.attributes,
                    option_type: option_type.clone(),
                    child_html: None,
                };
                if record.child.is_some() {
                    let item_ctx = merged(&self.renderer.ctx, &super::to_context(&record)?);
                    record.child_html = self.renderer.render_child(&item_ctx)?;
                }
                Ok(record)
            })
            .collect()
    }

    fn option_label(&self, label_key: Option<&str>, value: Option<&Value>) -> Result<String> {
        let derived = || {
            value
                .map(value_text)
                .filter(|value| !value.is_empty())
                .map(|value| {
                    format!(
                        "fields.{}.options.{value}.label",
                        self.descriptor.content_key()
                    )
                })
        };
        match label_key.map(str::to_string).or_else(derived) {
            Some(key) => self.renderer.localizer.translate(&key, &self.renderer.ctx),
            None => Ok(String::new()),
        }
    }

    /// Whether an option value is selected by the submitted value
    ///
    /// A submitted list selects by membership, anything else by strict
    /// equality.
    #[must_use]
    pub fn is_selected(&self, option: Option<&Value>) -> bool {
        match (self.value(), option) {
            (Some(Value::Array(submitted)), Some(option)) => submitted.contains(option),
            (Some(submitted), Some(option)) => submitted == option,
            _ => false,
        }
    }

    /// Fieldset options of an option group
    ///
    /// # Errors
    ///
    /// Returns an error if the legend, a label or a child fails to render.
    pub fn group_options(&self) -> Result<GroupOptions> {
        let role = if self.group_type() == FieldType::Radio {
            "radiogroup"
        } else {
            "group"
        };
        Ok(GroupOptions {
            legend: self.text(Part::Legend, true)?,
            legend_class_name: self.class_name(Part::Legend),
            role: role.to_string(),
            items: self.items()?,
        })
    }

    /// Options of a single checkbox, with its child content rendered
    ///
    /// # Errors
    ///
    /// Returns an error if the label or the child fails to render.
    pub fn checkbox_options(&self) -> Result<CheckboxOptions> {
        let config = &self.descriptor.config;
        let mut input = self.input_options()?;
        input.class_name = Some(
            input
                .class_name
                .unwrap_or_else(|| CHECKBOX_CLASS.to_string()),
        );

        let mut options = CheckboxOptions {
            input,
            label: self.text(Part::Label, false)?,
            selected: self.value().is_some_and(|value| value_text(value) == "true"),
            compound: config.compound.unwrap_or(false),
            attributes: config.attributes.clone(),
            toggle: config.toggle.clone(),
            child: config.child.clone(),
            child_html: None,
        };
        if options.child.is_some() {
            let child_ctx = merged(&self.renderer.ctx, &super::to_context(&options)?);
            options.child_html = self.renderer.render_child(&child_ctx)?;
        }
        Ok(options)
    }

    /// Options of an opening error group; the legend is required text
    ///
    /// # Errors
    ///
    /// Returns an error if a text fails to render.
    pub fn error_group_options(&self) -> Result<ErrorGroupOptions> {
        Ok(ErrorGroupOptions {
            input: self.input_options()?,
            legend: self.text(Part::Legend, false)?,
            legend_class_name: self.class_name(Part::Legend),
        })
    }

    /// Resolve the helper's render options
    ///
    /// # Errors
    ///
    /// Returns an error if any text, label or child fails to render.
    pub fn options(&self) -> Result<RenderOptions> {
        tracing::trace!(key = self.key(), mixin = %self.mixin, "resolving render options");
        Ok(match self.mixin.kind() {
            FieldKind::Text | FieldKind::Date { .. } | FieldKind::Submit => {
                RenderOptions::Text(self.text_options()?)
            }
            FieldKind::OptionGroup => RenderOptions::OptionGroup(OptionGroupOptions {
                input: self.input_options()?,
                group: self.group_options()?,
            }),
            FieldKind::Select => RenderOptions::Select(SelectOptions {
                text: self.text_options()?,
                group: self.group_options()?,
            }),
            FieldKind::Checkbox => RenderOptions::Checkbox(self.checkbox_options()?),
            FieldKind::ErrorGroup => RenderOptions::ErrorGroup(self.error_group_options()?),
            FieldKind::ErrorGroupEnd => RenderOptions::ErrorGroupEnd,
        })
    }

    /// Resolve into a partial and its options
    ///
    /// # Errors
    ///
    /// Returns an error if the options fail to resolve.
    pub fn resolve(&self) -> Result<ResolvedField> {
        Ok(ResolvedField {
            partial: self
                .mixin
                .partial()
                .unwrap_or("partials/forms/input-text-group"),
            options: self.options()?,
            locals: self.descriptor.config.locals.clone().unwrap_or_default(),
        })
    }
}
