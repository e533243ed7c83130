//! acton-form-mixins: template helpers for server-rendered HTML forms
//!
//! Given a declarative field configuration and a translator, this crate
//! resolves each field into a complete set of display attributes (label,
//! hint, error state, required flag, class names, validator-derived
//! constraints, conditional child content) and renders them through
//! `minijinja` partials.
//!
//! # Design Principles
//!
//! 1. **Deterministic resolution**: the same configuration layers always
//!    resolve to the same options
//! 2. **Layered configuration**: variant defaults, static fields, per-request
//!    fields and the call's own arguments merge in a fixed order
//! 3. **Typed options**: every helper resolves to a serialisable options
//!    record before any template runs
//!
//! # Quick Start
//!
//! ```rust
//! use acton_form_mixins::prelude::*;
//! use serde_json::json;
//!
//! # fn main() -> acton_form_mixins::Result<()> {
//! let translations = Catalog::from_json(&json!({
//!     "fields": { "colour": { "legend": "Favourite colour" } }
//! }));
//! let mixins = FormMixins::new(MixinsConfig::default(), translations)
//!     .with_fields_json(json!({
//!         "colour": { "options": ["red", "blue"], "validate": "required" }
//!     }))?;
//!
//! let scope = mixins.scope(RequestContext::new().with_value("colour", "blue"));
//! let html = scope.render("radio-group", "colour")?;
//! assert!(html.contains("Favourite colour"));
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`fields`]: configuration merge, attribute derivation and rendering
//! - [`mixins`]: the per-request helper surface
//! - [`validation`]: error state and message processing
//! - [`date`]: day/month/year date fields
//! - [`lambdas`]: text transforms
//! - [`template`]: partial loading and rendering
//! - [`translate`]: translator contract and a catalog implementation

#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod date;
pub mod error;
pub mod fields;
pub mod lambdas;
pub mod mixins;
pub mod observability;
pub mod template;
pub mod translate;
pub mod validation;

pub use error::{MixinError, Result};
pub use mixins::{FormMixins, FormValues, MixinScope, RequestContext};

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! ```rust
    //! use acton_form_mixins::prelude::*;
    //! ```

    pub use crate::config::MixinsConfig;
    pub use crate::date::DateController;
    pub use crate::error::{MixinError, Result};
    pub use crate::fields::{Content, FieldConfig, FieldConfigs, Mixin, ResolvedField};
    pub use crate::lambdas::Lambda;
    pub use crate::mixins::{FormMixins, FormValues, MixinScope, RequestContext};
    pub use crate::template::{Context, TemplateCache, TemplateEngine};
    pub use crate::translate::{Catalog, IdentityTranslator, Translator};
    pub use crate::validation::{ErrorEntry, ErrorMap};
}
