//! Resolution of static and dynamic default values

use crate::descriptor::SettingDescriptor;
use crate::error::{Result, SettingsError};
use crate::types::Value;
use std::collections::HashMap;

/// A lookup from property name to a dynamically computed default
pub trait DefaultSource: Send + Sync {
    fn default_for(&self, property: &str) -> Option<Value>;
}

impl<F> DefaultSource for F
where
    F: Fn(&str) -> Option<Value> + Send + Sync,
{
    fn default_for(&self, property: &str) -> Option<Value> {
        self(property)
    }
}

/// Dynamic defaults keyed by property name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicDefaults {
    values: HashMap<String, Value>,
}

impl DynamicDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a default, builder style
    pub fn with(mut self, property: &str, value: impl Into<Value>) -> Self {
        self.insert(property, value);
        self
    }

    pub fn insert(&mut self, property: &str, value: impl Into<Value>) {
        self.values.insert(property.to_string(), value.into());
    }

    pub fn get(&self, property: &str) -> Option<&Value> {
        self.values.get(property)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl DefaultSource for DynamicDefaults {
    fn default_for(&self, property: &str) -> Option<Value> {
        self.values.get(property).cloned()
    }
}

/// Picks the default for a setting: the static one if declared, otherwise
/// the dynamic source's entry for the property
pub struct DefaultResolver {
    source: Box<dyn DefaultSource>,
}

impl DefaultResolver {
    pub fn new(source: impl DefaultSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    pub(crate) fn from_boxed(source: Box<dyn DefaultSource>) -> Self {
        Self { source }
    }

    /// Resolve the default value of `property`
    ///
    /// A missing or mistyped dynamic default is a declaration error.
    pub fn resolve(&self, property: &str, descriptor: &SettingDescriptor) -> Result<Value> {
        if let Some(value) = descriptor.default_value() {
            return Ok(value.clone());
        }

        let value = self
            .source
            .default_for(property)
            .ok_or_else(|| SettingsError::MissingDynamicDefault {
                property: property.to_string(),
            })?;

        if !value.matches(descriptor.value_type()) {
            return Err(SettingsError::descriptor(
                property,
                format!(
                    "dynamic default must be a {}, got {}",
                    descriptor.value_type(),
                    value.value_type()
                ),
            ));
        }

        Ok(value)
    }
}

impl Default for DefaultResolver {
    fn default() -> Self {
        Self::new(DynamicDefaults::new())
    }
}
