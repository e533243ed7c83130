//! Helper dispatch and composite fields
//!
//! [`FieldRenderer`] is the per-call view of a request: the context the
//! helper was invoked with plus read-only access to values, errors, field
//! configuration and templates. It merges the descriptor for a helper call,
//! resolves it, composes dates out of number inputs and renders the
//! resulting partials.

use std::collections::HashMap;
use std::path::PathBuf;

use super::descriptor::{ClassNames, FieldConfig, FieldConfigs, FieldDescriptor, TextSetting};
use super::inline::parse_inline;
use super::mixin::{FieldKind, Mixin};
use super::options::{RenderOptions, ResolvedField, SubmitOptions};
use super::resolver::FieldResolver;
use super::Content;
use crate::error::Result;
use crate::mixins::FormValues;
use crate::template::{merged, Context, TemplateEngine};
use crate::translate::Localizer;
use crate::validation::ErrorMap;

const SUBMIT_ID: &str = "submit-button";
const SUBMIT_LABEL: &str = "next";

/// Renders field helpers against one call context
pub struct FieldRenderer<'a> {
    pub(crate) engine: &'a TemplateEngine,
    pub(crate) localizer: Localizer<'a>,
    pub(crate) values: &'a FormValues,
    pub(crate) errors: &'a ErrorMap,
    pub(crate) static_fields: &'a FieldConfigs,
    pub(crate) dynamic_fields: &'a FieldConfigs,
    pub(crate) partials: &'a HashMap<String, PathBuf>,
    pub(crate) use_cache: bool,
    pub(crate) ctx: Context,
}

impl<'a> FieldRenderer<'a> {
    /// The same request seen from another call context
    #[must_use]
    pub fn with_context(&self, ctx: Context) -> Self {
        Self {
            engine: self.engine,
            localizer: self.localizer,
            values: self.values,
            errors: self.errors,
            static_fields: self.static_fields,
            dynamic_fields: self.dynamic_fields,
            partials: self.partials,
            use_cache: self.use_cache,
            ctx,
        }
    }

    /// Render free text against the call context
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid template.
    pub fn render_text(&self, text: &str) -> Result<String> {
        self.engine.render_text(text, &self.ctx)
    }

    /// Merge every configuration layer for a helper call
    ///
    /// Lowest precedence first: variant defaults, static configuration,
    /// per-request configuration, then the call's own content.
    ///
    /// # Errors
    ///
    /// Returns an error if inline content is malformed.
    pub fn descriptor(&self, defaults: FieldConfig, content: Content) -> Result<FieldDescriptor> {
        let content = match content {
            Content::Inline(text) => parse_inline(&text, |raw| self.render_text(raw))?,
            Content::Config(config) => config,
        };
        let key = content.key.clone().unwrap_or_default();
        tracing::debug!(key = %key, "building field");

        let layers = [
            Some(defaults),
            self.static_fields.get(&key).cloned(),
            self.dynamic_fields.get(&key).cloned(),
            Some(content),
        ];
        Ok(FieldDescriptor::merge(key, layers.into_iter().flatten()))
    }

    /// Build the resolver for a helper call
    ///
    /// # Errors
    ///
    /// Returns an error if inline content is malformed.
    pub fn field(&self, mixin: Mixin, content: Content) -> Result<FieldResolver<'_, 'a>> {
        let variant = mixin.variant();
        let descriptor = self.descriptor(variant.defaults.clone(), content)?;
        Ok(FieldResolver::new(self, mixin, variant, descriptor))
    }

    /// Resolve a helper call into the partials it renders
    ///
    /// Most helpers resolve to one partial. Dates resolve to their day (when
    /// exact), month and year inputs, wrapped in an error group for
    /// `input-date-group`.
    ///
    /// # Errors
    ///
    /// Returns an error if content is malformed or a text fails to render.
    pub fn resolve(&self, mixin: Mixin, content: Content) -> Result<Vec<ResolvedField>> {
        match mixin.kind() {
            FieldKind::Submit => Ok(vec![self.submit(content)?]),
            FieldKind::ErrorGroupEnd => Ok(vec![error_group_end()]),
            FieldKind::Date { grouped } => self.date(content, grouped),
            _ => Ok(vec![self.field(mixin, content)?.resolve()?]),
        }
    }

    /// Render a helper call to HTML
    ///
    /// Each resolved partial is rendered with the call context overlaid by
    /// its options; multiple partials are joined with newlines.
    ///
    /// # Errors
    ///
    /// Returns an error if resolution fails or a partial cannot be read or
    /// rendered.
    pub fn render(&self, mixin: Mixin, content: Content) -> Result<String> {
        let parts = self
            .resolve(mixin, content)?
            .into_iter()
            .map(|field| {
                let ctx = merged(&self.ctx, &field.to_context()?);
                self.engine
                    .render_partial(field.partial, self.partials, self.use_cache, &ctx)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(parts.join("\n"))
    }

    fn submit(&self, content: Content) -> Result<ResolvedField> {
        let (label_key, key) = match content {
            Content::Inline(text) => {
                let mut props = text.split(' ');
                let label = props.next().filter(|p| !p.is_empty()).unwrap_or(SUBMIT_LABEL);
                let key = props.next().filter(|p| !p.is_empty()).unwrap_or(SUBMIT_ID);
                (format!("buttons.{label}"), key.to_string())
            }
            Content::Config(config) => (
                config
                    .label_key
                    .as_ref()
                    .and_then(TextSetting::text)
                    .map_or_else(|| format!("buttons.{SUBMIT_LABEL}"), str::to_string),
                config.key.unwrap_or_else(|| SUBMIT_ID.to_string()),
            ),
        };

        Ok(ResolvedField {
            partial: "partials/forms/input-submit",
            options: RenderOptions::Submit(SubmitOptions {
                key,
                value: Some(self.localizer.translate(&label_key, &self.ctx)?),
            }),
            locals: serde_json::Map::new(),
        })
    }

    fn date(&self, content: Content, grouped: bool) -> Result<Vec<ResolvedField>> {
        let parent = self.descriptor(FieldConfig::default(), content)?;
        let key = parent.key();
        let mut parts = Vec::with_capacity(5);

        if grouped {
            let group = FieldConfig {
                key: Some(key.to_string()),
                group_class_name: Some(ClassNames::from("form-date")),
                legend_class_name: Some(ClassNames::from("form-label-bold")),
                ..FieldConfig::default()
            };
            parts.push(self.field(Mixin::ErrorGroup, Content::Config(group))?.resolve()?);
        }

        if parent.config.inexact != Some(true) {
            parts.push(self.date_part(key, "day", Some((1, 31)), 2)?);
        }
        parts.push(self.date_part(key, "month", Some((1, 12)), 2)?);
        parts.push(self.date_part(key, "year", None, 4)?);

        if grouped {
            parts.push(error_group_end());
        }
        Ok(parts)
    }

    fn date_part(
        &self,
        key: &str,
        part: &str,
        range: Option<(u32, u32)>,
        maxlength: u32,
    ) -> Result<ResolvedField> {
        let config = FieldConfig {
            key: Some(format!("{key}-{part}")),
            min: range.map(|(min, _)| min.into()),
            max: range.map(|(_, max)| max.into()),
            maxlength: Some(maxlength.into()),
            ..FieldConfig::default()
        };
        self.field(Mixin::InputNumber, Content::Config(config))?
            .resolve()
    }
}

fn error_group_end() -> ResolvedField {
    ResolvedField {
        partial: "partials/forms/error-group-end",
        options: RenderOptions::ErrorGroupEnd,
        locals: serde_json::Map::new(),
    }
}
