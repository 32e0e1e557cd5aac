//! Typed application settings persisted to a human-editable XML document
//!
//! Each persisted property carries a category, a value type and a default
//! (static or dynamic). Loading fills every property from the document,
//! falling back to defaults for anything missing or unparsable; saving writes
//! every property back and produces sorted, tab-indented output.
//!
//! ```rust,no_run
//! use xml_settings::{Settings, SettingsFile};
//!
//! #[derive(Default, Settings)]
//! #[settings(root = "App")]
//! struct AppSettings {
//!     #[setting(category = "Audio", name = "Volume", default = 50)]
//!     volume: i32,
//! }
//!
//! let mut settings = SettingsFile::<AppSettings>::open("settings.xml")?;
//! settings.data_mut().volume = 80;
//! settings.save()?;
//! # Ok::<(), xml_settings::SettingsError>(())
//! ```

extern crate self as xml_settings;

pub mod convert;
pub mod defaults;
pub mod descriptor;
pub mod document;
pub mod error;
pub mod paths;
pub mod registry;
pub mod settings;
pub mod store;
pub mod sync;
pub mod types;
pub mod writer;

pub use defaults::{DefaultResolver, DefaultSource, DynamicDefaults};
pub use descriptor::{SettingBuilder, SettingDescriptor, SettingProperty};
pub use document::Document;
pub use error::{Result, SettingsError};
pub use registry::{describe, Schema};
pub use settings::Settings;
pub use store::{SettingsFile, SettingsFileBuilder};
pub use types::{EnumType, SettingEnum, SettingValue, Value, ValueType};
pub use xml_settings_macros::{SettingEnum, Settings};
