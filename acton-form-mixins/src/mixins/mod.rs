//! Form mixins: the helper surface templates call into
//!
//! [`FormMixins`] is built once per process from configuration, a
//! translator and the static field map. Each request gets a [`MixinScope`]
//! through [`FormMixins::scope`], which owns the request's values, errors and
//! per-request field configuration and exposes the helpers, text transforms
//! and error processing.
//!
//! # Example
//!
//! ```rust
//! use acton_form_mixins::prelude::*;
//! use serde_json::json;
//!
//! # fn main() -> acton_form_mixins::Result<()> {
//! let mixins = FormMixins::new(MixinsConfig::default(), Catalog::new()
//!     .with("fields.email.label", "Email address"))
//!     .with_fields_json(json!({ "email": { "type": "email", "validate": ["required"] } }))?;
//!
//! let scope = mixins.scope(RequestContext::new().with_value("email", "ada@example.com"));
//! let html = scope.render("input-text", "email")?;
//! assert!(html.contains("Email address"));
//! assert!(html.contains(r#"type="email""#));
//! # Ok(())
//! # }
//! ```

mod request;

pub use request::{FormValues, RequestContext};

use serde_json::Value;
use std::sync::Arc;

use crate::config::MixinsConfig;
use crate::error::Result;
use crate::fields::{value_text, Content, FieldConfig, FieldConfigs, FieldRenderer, Mixin, ResolvedField};
use crate::lambdas::{self, Lambda};
use crate::template::{merged, Context, TemplateCache, TemplateEngine};
use crate::translate::{Localizer, Translator};
use crate::validation::{self, ErrorEntry, ErrorMap};

/// Process-wide helper registry
pub struct FormMixins {
    config: MixinsConfig,
    shared_key: String,
    translator: Arc<dyn Translator>,
    fields: FieldConfigs,
    templates: TemplateEngine,
}

impl FormMixins {
    /// Create the helpers from configuration and a translator
    #[must_use]
    pub fn new(config: MixinsConfig, translator: impl Translator + 'static) -> Self {
        Self::with_shared_translator(config, Arc::new(translator))
    }

    /// Create the helpers with a translator shared elsewhere
    #[must_use]
    pub fn with_shared_translator(config: MixinsConfig, translator: Arc<dyn Translator>) -> Self {
        let templates = TemplateEngine::new(&config);
        let shared_key = config.shared_translations_key();
        tracing::debug!(
            views = %config.templates.views_directory.display(),
            shared_key = %shared_key,
            "form mixins created"
        );
        Self {
            config,
            shared_key,
            translator,
            fields: FieldConfigs::new(),
            templates,
        }
    }

    /// Set the static field configuration
    #[must_use]
    pub fn with_fields(mut self, fields: FieldConfigs) -> Self {
        self.fields = fields;
        self
    }

    /// Set the static field configuration from a JSON object
    ///
    /// # Errors
    ///
    /// Returns [`MixinError::FieldConfig`](crate::MixinError::FieldConfig)
    /// if the document does not describe field configurations.
    pub fn with_fields_json(self, fields: Value) -> Result<Self> {
        Ok(self.with_fields(serde_json::from_value(fields)?))
    }

    /// Share a template cache with other instances
    #[must_use]
    pub fn with_template_cache(mut self, cache: Arc<TemplateCache>) -> Self {
        self.templates = self.templates.with_cache(cache);
        self
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &MixinsConfig {
        &self.config
    }

    /// Static field configuration
    #[must_use]
    pub const fn fields(&self) -> &FieldConfigs {
        &self.fields
    }

    /// Template engine
    #[must_use]
    pub const fn templates(&self) -> &TemplateEngine {
        &self.templates
    }

    /// Open the helpers for one request
    #[must_use]
    pub fn scope(&self, mut request: RequestContext) -> MixinScope<'_> {
        validation::fill_keys(&mut request.errors);
        MixinScope {
            mixins: self,
            request,
        }
    }
}

impl std::fmt::Debug for FormMixins {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormMixins")
            .field("config", &self.config)
            .field("fields", &self.fields.len())
            .finish_non_exhaustive()
    }
}

/// The helpers bound to one request
#[derive(Debug)]
pub struct MixinScope<'m> {
    mixins: &'m FormMixins,
    request: RequestContext,
}

impl MixinScope<'_> {
    /// The request this scope renders
    #[must_use]
    pub const fn request(&self) -> &RequestContext {
        &self.request
    }

    /// Submitted values
    #[must_use]
    pub const fn values(&self) -> &FormValues {
        &self.request.values
    }

    /// Active errors
    #[must_use]
    pub const fn errors(&self) -> &ErrorMap {
        &self.request.errors
    }

    /// Give the request back
    #[must_use]
    pub fn into_request(self) -> RequestContext {
        self.request
    }

    /// Static configuration of `key` overlaid with the request's
    #[must_use]
    pub fn field_config(&self, key: &str) -> Option<FieldConfig> {
        let layers = [self.mixins.fields.get(key), self.request.fields.get(key)];
        layers
            .into_iter()
            .flatten()
            .cloned()
            .reduce(FieldConfig::overlaid)
    }

    /// Base template context: locals, `values`, `errors`, `errorlist` and
    /// `base_url`
    ///
    /// # Errors
    ///
    /// Returns an error if values or errors cannot be serialised.
    pub fn context(&self) -> Result<Context> {
        let mut ctx = self.request.locals.clone();
        ctx.insert("values".into(), serde_json::to_value(&self.request.values)?);
        ctx.insert("errors".into(), serde_json::to_value(&self.request.errors)?);
        ctx.insert("errorlist".into(), serde_json::to_value(self.error_list())?);
        if let Some(base_url) = &self.request.base_url {
            ctx.insert("base_url".into(), Value::String(base_url.clone()));
        }
        Ok(ctx)
    }

    fn localizer(&self) -> Localizer<'_> {
        Localizer::new(
            self.mixins.translator.as_ref(),
            &self.mixins.shared_key,
            &self.mixins.templates,
        )
    }

    fn renderer(&self, ctx: Context) -> FieldRenderer<'_> {
        FieldRenderer {
            engine: &self.mixins.templates,
            localizer: self.localizer(),
            values: &self.request.values,
            errors: &self.request.errors,
            static_fields: &self.mixins.fields,
            dynamic_fields: &self.request.fields,
            partials: &self.request.partials,
            use_cache: self.request.view_cache,
            ctx,
        }
    }

    /// Render a helper by name with an inline argument string
    ///
    /// # Errors
    ///
    /// Returns [`MixinError::UnknownMixin`](crate::MixinError::UnknownMixin)
    /// for unregistered names, and any resolution or rendering error.
    pub fn render(&self, helper: &str, args: &str) -> Result<String> {
        let mixin: Mixin = helper.parse()?;
        self.render_mixin(mixin, args)
    }

    /// Render a helper
    ///
    /// # Errors
    ///
    /// Returns an error if resolution or rendering fails.
    pub fn render_mixin(&self, mixin: Mixin, content: impl Into<Content>) -> Result<String> {
        self.render_in(mixin, content, &Context::new())
    }

    /// Render a helper from inside another template's scope
    ///
    /// `call_ctx` is overlaid on the base context, so variables visible at
    /// the call site are visible to the helper's texts and partial.
    ///
    /// # Errors
    ///
    /// Returns an error if resolution or rendering fails.
    pub fn render_in(
        &self,
        mixin: Mixin,
        content: impl Into<Content>,
        call_ctx: &Context,
    ) -> Result<String> {
        tracing::debug!(mixin = %mixin, "rendering mixin");
        let ctx = merged(&self.context()?, call_ctx);
        self.renderer(ctx).render(mixin, content.into())
    }

    /// Resolve a helper's partials and options without rendering them
    ///
    /// # Errors
    ///
    /// Returns an error if resolution fails.
    pub fn resolve(&self, mixin: Mixin, content: impl Into<Content>) -> Result<Vec<ResolvedField>> {
        self.renderer(self.context()?).resolve(mixin, content.into())
    }

    /// Translate a key with the shared prefix and render it
    ///
    /// # Errors
    ///
    /// Returns an error if the translation fails to render.
    pub fn translate(&self, key: &str) -> Result<String> {
        self.localizer().translate(key, &self.context()?)
    }

    /// Apply a text transform
    ///
    /// `text` is rendered as a template first. `date` and `time` take
    /// `"value|option"`; `selected` takes `"field=value"`.
    ///
    /// # Errors
    ///
    /// Returns [`MixinError::UnknownLambda`](crate::MixinError::UnknownLambda)
    /// for unknown names, and any rendering error.
    pub fn lambda(&self, name: &str, text: &str) -> Result<String> {
        let lambda: Lambda = name.parse()?;
        let ctx = self.context()?;
        let text = self.mixins.templates.render_text(text, &ctx)?;
        let settings = &self.mixins.config.lambdas;

        Ok(match lambda {
            Lambda::Currency => lambdas::currency(&text, &settings.currency_symbol),
            Lambda::CurrencyOrFree if lambdas::is_zero(&text) => {
                self.localizer().translate("free", &ctx)?
            }
            Lambda::CurrencyOrFree => lambdas::currency(&text, &settings.currency_symbol),
            Lambda::Date => {
                let (value, pattern) = lambdas::split_argument(&text);
                lambdas::format_date(value, pattern.unwrap_or(&settings.date_format))
            }
            Lambda::Time => {
                let (value, options) = lambdas::split_argument(&text);
                lambdas::time(value, options.unwrap_or(&settings.time_options))
            }
            Lambda::Hyphenate => lambdas::hyphenate(&text),
            Lambda::Uppercase => text.to_uppercase(),
            Lambda::Lowercase => text.to_lowercase(),
            Lambda::Capscase => lambdas::capscase(&text),
            Lambda::Translate => self.localizer().translate(&text, &ctx)?,
            Lambda::Url => lambdas::resolve_url(self.request.base_url.as_deref(), &text),
            Lambda::Selected => self.selected(&text),
        })
    }

    fn selected(&self, text: &str) -> String {
        let matches = text.split_once('=').is_some_and(|(key, expected)| {
            self.request
                .values
                .get(key)
                .is_some_and(|value| value_text(value) == expected)
        });
        if matches {
            r#" checked="checked""#.to_string()
        } else {
            String::new()
        }
    }

    /// Fill in translated messages for every unprocessed error
    ///
    /// # Errors
    ///
    /// Returns an error if a message fails to render.
    pub fn process_errors(&mut self) -> Result<()> {
        let ctx = self.context()?;
        let mixins = self.mixins;
        let dynamic_fields = &self.request.fields;
        let localizer = Localizer::new(
            mixins.translator.as_ref(),
            &mixins.shared_key,
            &mixins.templates,
        );
        let content_key_of = |key: &str| {
            dynamic_fields
                .get(key)
                .and_then(|field| field.content_key.clone())
                .or_else(|| {
                    mixins
                        .fields
                        .get(key)
                        .and_then(|field| field.content_key.clone())
                })
        };
        validation::process_errors(&mut self.request.errors, content_key_of, &localizer, &ctx)
    }

    /// Errors to list in a summary
    #[must_use]
    pub fn error_list(&self) -> Vec<&ErrorEntry> {
        validation::error_list(&self.request.errors)
    }
}
