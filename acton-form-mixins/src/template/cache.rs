//! Template source cache keyed by resolved file path

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{MixinError, Result};

/// Process-wide cache of template file contents
///
/// Created once and shared between [`FormMixins`](crate::FormMixins)
/// instances through an `Arc`. Entries are never invalidated; two requests
/// racing on the first read of a path both read the same file and the second
/// insert wins with identical content.
#[derive(Debug, Default)]
pub struct TemplateCache {
    entries: RwLock<HashMap<PathBuf, Arc<str>>>,
}

impl TemplateCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached content of `path`, reading it on first access
    ///
    /// # Errors
    ///
    /// Returns [`MixinError::TemplateRead`] if the file cannot be read.
    pub fn get_or_read(&self, path: &Path) -> Result<Arc<str>> {
        if let Some(source) = self.entries.read().get(path) {
            return Ok(Arc::clone(source));
        }

        let source = Self::read(path)?;
        self.entries
            .write()
            .insert(path.to_path_buf(), Arc::clone(&source));
        Ok(source)
    }

    /// Read `path` from disk without touching the cache
    ///
    /// # Errors
    ///
    /// Returns [`MixinError::TemplateRead`] if the file cannot be read.
    pub fn read(path: &Path) -> Result<Arc<str>> {
        tracing::debug!(path = %path.display(), "reading template");
        std::fs::read_to_string(path)
            .map(Arc::from)
            .map_err(|source| MixinError::TemplateRead {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Whether `path` has been cached
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.read().contains_key(path)
    }

    /// Number of cached templates
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether nothing has been cached yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every cached template
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
