//! Configuration management for acton-form-mixins
//!
//! Configuration is loaded from multiple sources with clear precedence:
//!
//! 1. Environment variables (highest priority, `FORM_MIXINS_` prefix, `__` for nesting)
//! 2. `./form-mixins.toml` (development)
//! 3. `~/.config/acton-form-mixins/{service}/config.toml` (user config, XDG)
//! 4. Hardcoded defaults (fallback)
//!
//! # Example Configuration
//!
//! ```toml
//! [templates]
//! views_directory = "./views"
//! view_engine = "html"
//! cache_enabled = true
//!
//! [templates.partials]
//! "partials-custom-partial" = "/srv/app/views/custom"
//!
//! [translations]
//! shared_translations_key = "passport.apply"
//!
//! [lambdas]
//! currency_symbol = "£"
//! date_format = "D MMMM YYYY"
//! ```
//!
//! # Usage
//!
//! ```rust
//! use acton_form_mixins::config::MixinsConfig;
//!
//! let config = MixinsConfig::default();
//! assert_eq!(config.view_extension(), ".html");
//! assert_eq!(config.shared_translations_key(), "");
//! ```

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Template loading configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    /// Directory the `partials/...` templates are resolved against
    pub views_directory: PathBuf,

    /// View engine name, used as the template file extension
    pub view_engine: String,

    /// Cache template file contents by resolved path
    pub cache_enabled: bool,

    /// Partial overrides: flattened partial name to path without extension
    pub partials: HashMap<String, PathBuf>,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            views_directory: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/templates")),
            view_engine: "html".to_string(),
            cache_enabled: true,
            partials: HashMap::new(),
        }
    }
}

/// Translation lookup configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationSettings {
    /// Prefix applied to every translation key
    pub shared_translations_key: String,
}

/// Text transform configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LambdaSettings {
    /// Symbol prepended by the `currency` lambda
    pub currency_symbol: String,

    /// Default moment-style pattern for the `date` lambda
    pub date_format: String,

    /// Default option list for the `time` lambda
    pub time_options: String,
}

impl Default for LambdaSettings {
    fn default() -> Self {
        Self {
            currency_symbol: "£".to_string(),
            date_format: "D MMMM YYYY".to_string(),
            time_options: "short,midnight,midday".to_string(),
        }
    }
}

/// Complete acton-form-mixins configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MixinsConfig {
    /// Template settings
    #[serde(default)]
    pub templates: TemplateSettings,

    /// Translation settings
    #[serde(default)]
    pub translations: TranslationSettings,

    /// Lambda settings
    #[serde(default)]
    pub lambdas: LambdaSettings,
}

impl MixinsConfig {
    /// Load configuration for a specific service
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file cannot be parsed or a value
    /// has the wrong type.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use acton_form_mixins::config::MixinsConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = MixinsConfig::load_for_service("my-app")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn load_for_service(service_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::new().merge(Toml::string(&toml::to_string(&Self::default())?));

        let user_config = Self::recommended_path(service_name);
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }

        let local_config = PathBuf::from("./form-mixins.toml");
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }

        figment = figment.merge(Env::prefixed("FORM_MIXINS_").split("__").lowercase(true));

        let config = figment.extract()?;
        tracing::debug!(service = service_name, "form mixins configuration loaded");
        Ok(config)
    }

    /// Load configuration from a specific file over the defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, is not valid TOML or holds
    /// values of the wrong type.
    pub fn load_from(path: &str) -> anyhow::Result<Self> {
        if !std::path::Path::new(path).exists() {
            anyhow::bail!("configuration file not found: {path}");
        }
        let config = Figment::new()
            .merge(Toml::string(&toml::to_string(&Self::default())?))
            .merge(Toml::file(path))
            .extract()?;
        Ok(config)
    }

    /// Get the recommended XDG config path for a service
    ///
    /// Returns `~/.config/acton-form-mixins/{service_name}/config.toml`.
    #[must_use]
    pub fn recommended_path(service_name: &str) -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("acton-form-mixins")
            .join(service_name)
            .join("config.toml")
    }

    /// Template file extension, including the leading dot
    #[must_use]
    pub fn view_extension(&self) -> String {
        format!(".{}", self.templates.view_engine)
    }

    /// Shared translations key, normalised to end in `.` when non-empty
    #[must_use]
    pub fn shared_translations_key(&self) -> String {
        normalize_shared_key(&self.translations.shared_translations_key)
    }
}

/// Ensure a non-empty shared key ends with the `.` separator
#[must_use]
pub fn normalize_shared_key(key: &str) -> String {
    if key.is_empty() || key.ends_with('.') {
        key.to_string()
    } else {
        format!("{key}.")
    }
}
