//! Digest-keyed cache of parsed context documents.

use crate::{Context, parse_context};
use palaver_error::ContextError;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Parsed documents keyed by the SHA-256 digest of their markup.
///
/// Clones share the same entries. A new cache, or one after [`clear`](Self::clear),
/// is empty.
///
/// # Examples
///
/// ```
/// use palaver_context::ContextCache;
/// use std::sync::Arc;
///
/// let cache = ContextCache::new();
/// let markup = r#"<context><stage key="A"/></context>"#;
///
/// let first = cache.get_or_parse(markup).expect("valid document");
/// let second = cache.get_or_parse(markup).expect("cached");
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(cache.len(), 1);
///
/// cache.clear();
/// assert!(cache.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ContextCache {
    entries: Arc<RwLock<HashMap<[u8; 32], Arc<Context>>>>,
}

impl ContextCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached document for this markup, parsing it on first use.
    ///
    /// Parse failures are not cached.
    pub fn get_or_parse(&self, markup: &str) -> Result<Arc<Context>, ContextError> {
        let key: [u8; 32] = Sha256::digest(markup.as_bytes()).into();

        if let Some(context) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            tracing::trace!("Context cache hit");
            return Ok(Arc::clone(context));
        }

        let context = Arc::new(parse_context(markup)?);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let cached = Arc::clone(entries.entry(key).or_insert(context));
        tracing::debug!(entries = entries.len(), "Cached parsed context");
        Ok(cached)
    }

    /// Number of cached documents.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached document.
    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
