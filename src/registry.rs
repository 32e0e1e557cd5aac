//! Global registry of described settings types

use crate::descriptor::{SettingDescriptor, SettingProperty};
use crate::error::{Result, SettingsError};
use crate::settings::Settings;
use log::debug;
use once_cell::sync::Lazy;
use std::any::{type_name, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

/// The validated, ordered property list of one settings type
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    properties: Vec<SettingProperty>,
}

impl Schema {
    /// Validate a property list
    ///
    /// Returns an error if two properties share a name, since the name is the
    /// `Key` identity inside its category
    pub fn new(properties: Vec<SettingProperty>) -> Result<Self> {
        let mut seen = HashSet::new();
        for property in &properties {
            if !seen.insert(property.name()) {
                return Err(SettingsError::descriptor(
                    property.name(),
                    "declared more than once",
                ));
            }
        }
        Ok(Self { properties })
    }

    /// All properties, including ignored ones, in canonical order
    pub fn properties(&self) -> &[SettingProperty] {
        &self.properties
    }

    /// Descriptor-bearing properties in canonical order
    pub fn settings(&self) -> impl Iterator<Item = (&str, &SettingDescriptor)> + '_ {
        self.properties
            .iter()
            .filter_map(|p| p.descriptor().map(|d| (p.name(), d)))
    }

    /// Get the descriptor of a property by name
    pub fn get(&self, name: &str) -> Option<&SettingDescriptor> {
        self.properties
            .iter()
            .find(|p| p.name() == name)
            .and_then(|p| p.descriptor())
    }

    /// Get all unique category names in first-seen order
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = Vec::new();
        for (_, descriptor) in self.settings() {
            if !categories.contains(&descriptor.category()) {
                categories.push(descriptor.category());
            }
        }
        categories
    }

    /// List the settings in a category
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = (&'a str, &'a SettingDescriptor)> + 'a {
        self.settings().filter(move |(_, d)| d.category() == category)
    }

    /// Number of descriptor-bearing properties
    pub fn len(&self) -> usize {
        self.settings().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Thread-safe cache of schemas keyed by settings type
pub struct DescriptorRegistry {
    schemas: RwLock<HashMap<TypeId, Arc<Schema>>>,
}

static GLOBAL: Lazy<DescriptorRegistry> = Lazy::new(DescriptorRegistry::new);

impl DescriptorRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            schemas: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide registry
    pub fn global() -> &'static DescriptorRegistry {
        &GLOBAL
    }

    /// Describe a settings type, building and caching its schema on first use
    ///
    /// Declaration errors are not cached; every call for a broken type fails.
    pub fn describe<T: Settings>(&self) -> Result<Arc<Schema>> {
        let id = TypeId::of::<T>();
        if let Some(schema) = self.schemas.read().unwrap_or_else(PoisonError::into_inner).get(&id) {
            return Ok(schema.clone());
        }

        let schema = Arc::new(Schema::new(T::properties()?)?);
        debug!(
            "Described settings type {} ({} settings in {} categories)",
            type_name::<T>(),
            schema.len(),
            schema.categories().len()
        );

        let mut schemas = self.schemas.write().unwrap_or_else(PoisonError::into_inner);
        Ok(schemas.entry(id).or_insert(schema).clone())
    }

    /// Check if a settings type has been described
    pub fn contains<T: Settings>(&self) -> bool {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&TypeId::of::<T>())
    }

    /// Get total number of described types
    pub fn count(&self) -> usize {
        self.schemas.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Default for DescriptorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Describe a settings type using the global registry
pub fn describe<T: Settings>() -> Result<Arc<Schema>> {
    DescriptorRegistry::global().describe::<T>()
}
