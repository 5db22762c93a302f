//! Collection registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use crate::http::adapter::{AdapterSettings, MountedCollection, ResourceAdapter};
use crate::service::ResourceService;

/// Top-level paths owned by the operational endpoints.
const RESERVED_NAMES: &[&str] = &["ping", "build-info"];

/// Error type for registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("collection '{0}' is already mounted")]
    Duplicate(String),

    #[error("invalid collection name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },
}

/// Check that `name` can be used as a collection's URL prefix.
pub fn check_collection_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("name must not be empty");
    }
    if name.contains('/') {
        return Err("name must be a single path segment");
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err("name may only contain ASCII letters, digits, '.', '_' and '-'");
    }
    if name.starts_with("__") {
        return Err("names starting with '__' are reserved");
    }
    if RESERVED_NAMES.contains(&name) {
        return Err("name clashes with an operational endpoint");
    }
    Ok(())
}

/// Named collections and the settings their adapters share.
///
/// Built once at startup, then shared read-only.
#[derive(Clone, Default)]
pub struct CollectionRegistry {
    settings: AdapterSettings,
    collections: BTreeMap<String, Arc<dyn MountedCollection>>,
}

impl CollectionRegistry {
    pub fn new(settings: AdapterSettings) -> Self {
        Self {
            settings,
            collections: BTreeMap::new(),
        }
    }

    /// Mount `service` under `/{name}`.
    pub fn mount<S: ResourceService>(
        &mut self,
        name: impl Into<String>,
        service: Arc<S>,
    ) -> Result<&mut Self, RegistryError> {
        let name = name.into();
        check_collection_name(&name).map_err(|reason| RegistryError::InvalidName {
            name: name.clone(),
            reason,
        })?;
        if self.collections.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }

        let adapter = ResourceAdapter::new(name.clone(), service, self.settings.clone());
        tracing::debug!(collection = %name, "Collection mounted");
        self.collections.insert(name, Arc::new(adapter));
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn MountedCollection>> {
        self.collections.get(name)
    }

    /// Collections in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn MountedCollection>> {
        self.collections.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}
