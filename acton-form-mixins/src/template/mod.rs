//! Partial lookup and template rendering
//!
//! Partials are referenced by name (`partials/forms/checkbox`) and resolved
//! against the configured views directory, or against a per-request override
//! keyed by the name with `/` replaced by `-`. Sources are compiled with
//! minijinja on every render; only the file contents are cached.
//!
//! Partials whose resolved name ends in `.html` are rendered with HTML
//! auto-escaping. Free text (labels, translations, inline keys) is rendered
//! without escaping, since it is escaped where the partial prints it.

mod cache;

pub use cache::TemplateCache;

use minijinja::Environment;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::MixinsConfig;
use crate::error::Result;

/// Render context: a JSON object of template variables
pub type Context = Map<String, Value>;

/// Name used for free-text templates
const TEXT_TEMPLATE: &str = "text";

/// Template renderer shared by every request
#[derive(Debug)]
pub struct TemplateEngine {
    env: Environment<'static>,
    cache: Arc<TemplateCache>,
    views_directory: PathBuf,
    view_extension: String,
    cache_enabled: bool,
    partials: HashMap<String, PathBuf>,
}

impl TemplateEngine {
    /// Create an engine with its own template cache
    #[must_use]
    pub fn new(config: &MixinsConfig) -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        crate::lambdas::register_filters(&mut env, &config.lambdas);

        Self {
            env,
            cache: Arc::new(TemplateCache::new()),
            views_directory: config.templates.views_directory.clone(),
            view_extension: config.view_extension(),
            cache_enabled: config.templates.cache_enabled,
            partials: config.templates.partials.clone(),
        }
    }

    /// Share an existing template cache
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<TemplateCache>) -> Self {
        self.cache = cache;
        self
    }

    /// The template cache in use
    #[must_use]
    pub const fn cache(&self) -> &Arc<TemplateCache> {
        &self.cache
    }

    /// Resolve a partial name to a file path
    ///
    /// Request overrides are consulted before the configured overrides,
    /// then the views directory.
    #[must_use]
    pub fn resolve_path(&self, name: &str, overrides: &HashMap<String, PathBuf>) -> PathBuf {
        let partial_name = name.replace('/', "-");
        match overrides
            .get(&partial_name)
            .or_else(|| self.partials.get(&partial_name))
        {
            Some(base) => PathBuf::from(format!("{}{}", base.display(), self.view_extension)),
            None => self
                .views_directory
                .join(format!("{name}{}", self.view_extension)),
        }
    }

    /// Read a partial's source
    ///
    /// The cache is used when enabled in configuration and not bypassed by
    /// the request (`use_cache = false`).
    ///
    /// # Errors
    ///
    /// Returns [`MixinError::TemplateRead`](crate::MixinError::TemplateRead)
    /// if the file cannot be read.
    pub fn read_template(
        &self,
        name: &str,
        overrides: &HashMap<String, PathBuf>,
        use_cache: bool,
    ) -> Result<Arc<str>> {
        let path = self.resolve_path(name, overrides);
        if self.cache_enabled && use_cache {
            self.cache.get_or_read(&path)
        } else {
            TemplateCache::read(&path)
        }
    }

    /// Render a partial with a context
    ///
    /// # Errors
    ///
    /// Returns an error if the partial cannot be read or fails to render.
    pub fn render_partial(
        &self,
        name: &str,
        overrides: &HashMap<String, PathBuf>,
        use_cache: bool,
        ctx: &Context,
    ) -> Result<String> {
        tracing::trace!(partial = name, "rendering partial");
        let source = self.read_template(name, overrides, use_cache)?;
        let template_name = format!("{name}{}", self.view_extension);
        Ok(self.env.render_named_str(&template_name, &source, ctx)?)
    }

    /// Render free text against a context
    ///
    /// Empty text renders empty; text without template markup is returned
    /// as-is.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid template.
    pub fn render_text(&self, text: &str, ctx: &Context) -> Result<String> {
        if !has_markup(text) {
            return Ok(text.to_string());
        }
        Ok(self.env.render_named_str(TEXT_TEMPLATE, text, ctx)?)
    }
}

fn has_markup(text: &str) -> bool {
    text.contains("{{") || text.contains("{%") || text.contains("{#")
}

/// Overlay `overlay` onto a copy of `base`
#[must_use]
pub fn merged(base: &Context, overlay: &Context) -> Context {
    let mut ctx = base.clone();
    ctx.extend(overlay.iter().map(|(k, v)| (k.clone(), v.clone())));
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn context(value: Value) -> Context {
        match value {
            Value::Object(map) => map,
            _ => Context::new(),
        }
    }

    fn engine_in(dir: &std::path::Path) -> TemplateEngine {
        let mut config = MixinsConfig::default();
        config.templates.views_directory = dir.to_path_buf();
        TemplateEngine::new(&config)
    }

    #[test]
    fn test_render_text_interpolates() {
        let engine = TemplateEngine::new(&MixinsConfig::default());
        let ctx = context(json!({ "name": "Ada" }));
        assert_eq!(engine.render_text("Hello {{ name }}", &ctx).unwrap(), "Hello Ada");
        assert_eq!(engine.render_text("No markup", &ctx).unwrap(), "No markup");
        assert_eq!(engine.render_text("", &ctx).unwrap(), "");
    }

    #[test]
    fn test_render_text_does_not_escape() {
        let engine = TemplateEngine::new(&MixinsConfig::default());
        let ctx = context(json!({ "name": "<b>" }));
        assert_eq!(engine.render_text("{{ name }}", &ctx).unwrap(), "<b>");
    }

    #[test]
    fn test_partials_escape_html() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("partials")).unwrap();
        std::fs::write(dir.path().join("partials/label.html"), "<p>{{ label }}</p>").unwrap();

        let engine = engine_in(dir.path());
        let ctx = context(json!({ "label": "<b>" }));
        let html = engine
            .render_partial("partials/label", &HashMap::new(), true, &ctx)
            .unwrap();
        assert_eq!(html, "<p>&lt;b&gt;</p>");
    }

    #[test]
    fn test_resolve_path_prefers_overrides() {
        let engine = engine_in(std::path::Path::new("/views"));
        let mut overrides = HashMap::new();
        overrides.insert(
            "partials-custom-partial".to_string(),
            PathBuf::from("/root/path/mypartial"),
        );

        assert_eq!(
            engine.resolve_path("partials/custom-partial", &overrides),
            PathBuf::from("/root/path/mypartial.html")
        );
        assert_eq!(
            engine.resolve_path("partials/forms/select", &overrides),
            PathBuf::from("/views/partials/forms/select.html")
        );
    }

    #[test]
    fn test_cache_bypass() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.html");
        std::fs::write(&path, "first").unwrap();

        let engine = engine_in(dir.path());
        let none = HashMap::new();
        assert_eq!(&*engine.read_template("partial", &none, true).unwrap(), "first");

        std::fs::write(&path, "second").unwrap();
        assert_eq!(&*engine.read_template("partial", &none, true).unwrap(), "first");
        assert_eq!(&*engine.read_template("partial", &none, false).unwrap(), "second");
    }

    #[test]
    fn test_missing_partial_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine_in(dir.path());
        assert!(engine
            .render_partial("partials/missing", &HashMap::new(), true, &Context::new())
            .is_err());
    }

    #[test]
    fn test_merged_overlays() {
        let base = context(json!({ "a": 1, "b": 1 }));
        let overlay = context(json!({ "b": 2 }));
        let ctx = merged(&base, &overlay);
        assert_eq!(ctx.get("a"), Some(&json!(1)));
        assert_eq!(ctx.get("b"), Some(&json!(2)));
    }
}
