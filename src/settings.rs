//! The trait every persisted settings type implements

use crate::defaults::DynamicDefaults;
use crate::descriptor::SettingProperty;
use crate::error::Result;
use crate::types::Value;

/// A typed settings object that can be synchronized with an XML document
///
/// Normally implemented with `#[derive(Settings)]`:
///
/// ```rust
/// use xml_settings::{SettingEnum, Settings};
///
/// #[derive(Debug, Clone, Copy, Default, PartialEq, SettingEnum)]
/// enum Quality {
///     Low,
///     #[default]
///     High,
/// }
///
/// #[derive(Default, Settings)]
/// #[settings(root = "App")]
/// struct AppSettings {
///     #[setting(category = "Audio", name = "Volume", default = 50)]
///     volume: i32,
///     #[setting(category = "Video", default = Quality::High)]
///     quality: Quality,
///     scratch: Vec<u8>,
/// }
/// ```
pub trait Settings: Default + 'static {
    /// Every property of the type, in a stable order
    ///
    /// Properties that are not settings are listed with
    /// [`SettingProperty::ignored`].
    fn properties() -> Result<Vec<SettingProperty>>;

    /// Current value of a persisted property
    fn get_value(&self, property: &str) -> Option<Value>;

    /// Assign a persisted property; fails if the value is of another type
    fn set_value(&mut self, property: &str, value: Value) -> Result<()>;

    /// Dynamic defaults for properties declared without a static default
    fn dynamic_defaults() -> DynamicDefaults {
        DynamicDefaults::new()
    }

    /// Root element used when the container is opened without one
    ///
    /// Defaults to the name of the crate that declares the settings type.
    fn root_element_name() -> String {
        crate_name(std::any::type_name::<Self>()).to_string()
    }
}

fn crate_name(type_name: &str) -> &str {
    type_name.split("::").next().unwrap_or(type_name)
}
