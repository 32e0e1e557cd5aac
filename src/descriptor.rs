//! Per-property setting declarations and their fluent builder

use crate::convert;
use crate::error::{Result, SettingsError};
use crate::types::{SettingValue, Value, ValueType};

/// Immutable metadata attached to one persisted property
#[derive(Debug, Clone, PartialEq)]
pub struct SettingDescriptor {
    category: String,
    value_type: ValueType,
    default: Option<Value>,
}

impl SettingDescriptor {
    /// Category the setting is grouped under (the `Category` element's `Name`)
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    /// Static default, or None when the default is resolved dynamically
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn is_dynamic(&self) -> bool {
        self.default.is_none()
    }
}

/// A property of a settings type, with its descriptor if it is persisted
#[derive(Debug, Clone, PartialEq)]
pub struct SettingProperty {
    name: String,
    descriptor: Option<SettingDescriptor>,
}

impl SettingProperty {
    /// Start declaring a persisted property of native type `T`
    pub fn builder<T: SettingValue>(name: &str, category: &str) -> SettingBuilder {
        SettingBuilder::new(name, category, T::value_type())
    }

    /// Start declaring a persisted property with an explicit value type
    pub fn builder_for(name: &str, category: &str, value_type: ValueType) -> SettingBuilder {
        SettingBuilder::new(name, category, value_type)
    }

    /// A property that is not a setting and is never persisted
    pub fn ignored(name: &str) -> Self {
        Self {
            name: name.to_string(),
            descriptor: None,
        }
    }

    /// Property name, also used as the `Key` element's `Name`
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptor(&self) -> Option<&SettingDescriptor> {
        self.descriptor.as_ref()
    }
}

enum DefaultSpec {
    Value(Value),
    Text(String),
}

/// Builder for setting declarations
///
/// All consistency checks run in [`build`](Self::build), so a bad declaration
/// fails when the settings type is first described, before any file I/O.
pub struct SettingBuilder {
    name: String,
    category: String,
    value_type: ValueType,
    default: Option<DefaultSpec>,
}

impl SettingBuilder {
    fn new(name: &str, category: &str, value_type: ValueType) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            value_type,
            default: None,
        }
    }

    /// Set a typed static default
    pub fn default<T: SettingValue>(self, value: T) -> Self {
        self.default_value(value.to_value())
    }

    /// Set a static default; must be exactly of the declared value type
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(DefaultSpec::Value(value));
        self
    }

    /// Set a static default from invariant text, parsed at build time
    pub fn default_text(mut self, text: &str) -> Self {
        self.default = Some(DefaultSpec::Text(text.to_string()));
        self
    }

    /// Build the property declaration
    ///
    /// Returns an error if the name or category is empty, or if the default is
    /// not of the declared value type
    pub fn build(self) -> Result<SettingProperty> {
        if self.name.is_empty() {
            return Err(SettingsError::descriptor("", "property name is required"));
        }
        if self.category.trim().is_empty() {
            return Err(SettingsError::descriptor(&self.name, "category name is required"));
        }

        let default = match self.default {
            None => None,
            Some(DefaultSpec::Value(value)) => {
                if !value.matches(&self.value_type) {
                    let reason = if self.value_type.is_enum() {
                        format!(
                            "default value must be of the same enum type as the property ({}), got {}",
                            self.value_type,
                            value.value_type()
                        )
                    } else {
                        format!(
                            "default value must be a {}, got {}",
                            self.value_type,
                            value.value_type()
                        )
                    };
                    return Err(SettingsError::descriptor(&self.name, reason));
                }
                Some(value)
            }
            Some(DefaultSpec::Text(text)) => {
                if self.value_type.is_enum() {
                    return Err(SettingsError::descriptor(
                        &self.name,
                        format!(
                            "default value must be of the same enum type as the property ({}), got text",
                            self.value_type
                        ),
                    ));
                }
                let value = convert::from_invariant_text(&text, &self.value_type).map_err(|e| {
                    SettingsError::descriptor(&self.name, format!("invalid default: {}", e))
                })?;
                Some(value)
            }
        };

        Ok(SettingProperty {
            name: self.name,
            descriptor: Some(SettingDescriptor {
                category: self.category,
                value_type: self.value_type,
                default,
            }),
        })
    }
}
