//! Registry of content-type descriptors, keyed by canonical name.

use std::collections::BTreeMap;

use crate::error::ValidationError;
use crate::types::{builtins, ContentTypeDescriptor};
use crate::validate;

#[derive(Debug, Clone, Default)]
pub struct ContentTypeRegistry {
    types: BTreeMap<String, ContentTypeDescriptor>,
}

impl ContentTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the WP-API built-in types.
    pub fn with_builtins() -> Self {
        let types = builtins()
            .into_iter()
            .map(|descriptor| (descriptor.name.canonical.clone(), descriptor))
            .collect();
        Self { types }
    }

    /// Register `descriptor`. Descriptors are immutable once registered.
    pub fn register(&mut self, descriptor: ContentTypeDescriptor) -> Result<(), ValidationError> {
        validate::content_type_shape(&descriptor)?;
        let name = descriptor.canonical_name().to_string();
        validate::new_content_type(self.types.contains_key(&name), &name)?;
        self.types.insert(name, descriptor);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&ContentTypeDescriptor, ValidationError> {
        validate::known_content_type(self.types.get(name), name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}
