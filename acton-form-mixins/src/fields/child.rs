//! Conditional "child" content revealed by a checkbox or option

use serde_json::Value;

use super::mixin::Mixin;
use super::render::FieldRenderer;
use super::{value_text, Content};
use crate::error::Result;
use crate::template::Context;

/// Partial wrapping a helper rendered as child content
pub const PANEL_PARTIAL: &str = "partials/mixins/panel";

const PARTIAL_PREFIX: &str = "partials/";

impl FieldRenderer<'_> {
    /// Render the `child` named in `ctx`
    ///
    /// - unset: nothing
    /// - `partials/...`: that partial
    /// - a helper name: the helper, invoked with `ctx.toggle` and wrapped in
    ///   the reveal panel
    /// - anything else: an inline template
    ///
    /// Every child template sees `render_mixin`, which holds the rendered
    /// helper for panels and is empty otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the partial cannot be read or any template fails
    /// to render.
    pub fn render_child(&self, ctx: &Context) -> Result<Option<String>> {
        let Some(child) = ctx
            .get("child")
            .and_then(Value::as_str)
            .filter(|child| !child.is_empty())
        else {
            return Ok(None);
        };
        tracing::debug!(child, "rendering child");

        let mut child_ctx = ctx.clone();
        child_ctx.insert("render_mixin".into(), Value::String(String::new()));

        if child.starts_with(PARTIAL_PREFIX) {
            return self
                .engine
                .render_partial(child, self.partials, self.use_cache, &child_ctx)
                .map(Some);
        }

        if let Ok(mixin) = child.parse::<Mixin>() {
            let toggle = ctx.get("toggle").map(value_text).unwrap_or_default();
            tracing::debug!(child, toggle = %toggle, "rendering child mixin");
            let html = self
                .with_context(ctx.clone())
                .render(mixin, Content::Inline(toggle))?;
            child_ctx.insert("render_mixin".into(), Value::String(html));
            return self
                .engine
                .render_partial(PANEL_PARTIAL, self.partials, self.use_cache, &child_ctx)
                .map(Some);
        }

        self.engine.render_text(child, &child_ctx).map(Some)
    }
}
