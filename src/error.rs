//! Error taxonomy for loading and saving settings documents

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while describing, loading or saving settings.
///
/// Configuration errors are programming mistakes in the settings declaration or
/// the container setup and are never recovered from. Conversion errors are
/// recovered locally during load (the property falls back to its default) but
/// are fatal during save.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The root element name is not a valid XML name
    #[error("invalid root element '{0}': not a valid XML name")]
    InvalidRootElement(String),

    /// A setting declaration is inconsistent
    #[error("invalid setting '{property}': {reason}")]
    InvalidDescriptor { property: String, reason: String },

    /// A setting declares a dynamic default but no source provides one
    #[error("setting '{property}' has no static default and no dynamic default was supplied")]
    MissingDynamicDefault { property: String },

    /// Text could not be coerced into the declared value type
    #[error("cannot convert '{text}' to {value_type}")]
    Conversion { text: String, value_type: String },

    /// Writing the settings document failed
    #[error("failed to write settings document {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The canonicalizing writer could not render the document
    #[error("failed to render settings document: {0}")]
    Render(String),
}

impl SettingsError {
    pub(crate) fn descriptor(property: impl Into<String>, reason: impl Into<String>) -> Self {
        SettingsError::InvalidDescriptor {
            property: property.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn conversion(text: impl Into<String>, value_type: impl ToString) -> Self {
        SettingsError::Conversion {
            text: text.into(),
            value_type: value_type.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SettingsError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true for errors caused by an invalid declaration or setup
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SettingsError::InvalidRootElement(_)
                | SettingsError::InvalidDescriptor { .. }
                | SettingsError::MissingDynamicDefault { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SettingsError>;
