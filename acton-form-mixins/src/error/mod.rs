//! Error types and error handling

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving or rendering a form mixin
#[derive(Debug, Error)]
pub enum MixinError {
    /// Inline mixin options could not be parsed
    #[error("Invalid syntax for mixin options: {0}")]
    InvalidSyntax(String),

    /// A partial template could not be read from disk
    #[error("failed to read template '{}': {source}", path.display())]
    TemplateRead {
        /// Resolved path of the template file
        path: PathBuf,
        /// Underlying I/O failure
        source: std::io::Error,
    },

    /// Template compilation or rendering failed
    #[error("template render error: {0}")]
    Render(#[from] minijinja::Error),

    /// Field configuration does not have the expected shape
    #[error("invalid field configuration: {0}")]
    FieldConfig(#[from] serde_json::Error),

    /// No helper is registered under this name
    #[error("unknown mixin: {0}")]
    UnknownMixin(String),

    /// No text transform is registered under this name
    #[error("unknown lambda: {0}")]
    UnknownLambda(String),
}

/// Result alias used throughout the crate
pub type Result<T, E = MixinError> = std::result::Result<T, E>;
