//! Public settings container bound to one document path

use crate::defaults::{DefaultResolver, DefaultSource};
use crate::error::Result;
use crate::registry::{self, Schema};
use crate::settings::Settings;
use crate::sync::Synchronizer;
use log::debug;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A typed settings object persisted to an XML document
///
/// The container owns the settings object exclusively. It is loaded once when
/// the container is opened; mutate it through [`data_mut`](Self::data_mut) and
/// persist it with [`save`](Self::save).
pub struct SettingsFile<T: Settings> {
    data: T,
    schema: Arc<Schema>,
    sync: Synchronizer,
}

impl<T: Settings> SettingsFile<T> {
    /// Open a settings file using the type's default root element
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::builder(path).open()
    }

    /// Open a settings file with an explicit root element
    pub fn open_with_root(path: impl Into<PathBuf>, root: &str) -> Result<Self> {
        Self::builder(path).root_element(root).open()
    }

    /// Configure the container before opening it
    pub fn builder(path: impl Into<PathBuf>) -> SettingsFileBuilder<T> {
        SettingsFileBuilder {
            path: path.into(),
            root: None,
            defaults: None,
            _marker: PhantomData,
        }
    }

    /// The live settings object
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Mutable access to the live settings object
    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }

    /// Persist the current settings to the document
    ///
    /// On failure the in-memory settings are left untouched and remain usable.
    pub fn save(&self) -> Result<()> {
        self.sync.save(&self.data)
    }

    /// Re-read the document and reassign every setting
    ///
    /// On failure every setting keeps its previous value.
    pub fn reload(&mut self) -> Result<()> {
        self.sync.load(&mut self.data)
    }

    pub fn path(&self) -> &Path {
        self.sync.path()
    }

    pub fn root_element(&self) -> &str {
        self.sync.root()
    }

    /// The ordered setting declarations of `T`
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Give up the container, keeping the settings object
    pub fn into_inner(self) -> T {
        self.data
    }
}

/// Builder for [`SettingsFile`]
pub struct SettingsFileBuilder<T: Settings> {
    path: PathBuf,
    root: Option<String>,
    defaults: Option<Box<dyn DefaultSource>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Settings> SettingsFileBuilder<T> {
    /// Set the root element name (defaults to [`Settings::root_element_name`])
    pub fn root_element(mut self, root: &str) -> Self {
        self.root = Some(root.to_string());
        self
    }

    /// Supply dynamic defaults, replacing [`Settings::dynamic_defaults`]
    pub fn dynamic_defaults(mut self, source: impl DefaultSource + 'static) -> Self {
        self.defaults = Some(Box::new(source));
        self
    }

    /// Validate the configuration, then create the settings object and load it
    ///
    /// Configuration errors (bad root element, inconsistent declarations,
    /// missing dynamic defaults) abort; a missing or corrupt file does not.
    pub fn open(self) -> Result<SettingsFile<T>> {
        let root = self.root.unwrap_or_else(T::root_element_name);
        let resolver = match self.defaults {
            Some(source) => DefaultResolver::from_boxed(source),
            None => DefaultResolver::new(T::dynamic_defaults()),
        };

        let mut sync = Synchronizer::new(self.path, &root, resolver)?;
        let schema = registry::describe::<T>()?;

        let mut data = T::default();
        sync.load(&mut data)?;
        debug!("Opened settings file {:?} with root <{}>", sync.path(), root);

        Ok(SettingsFile { data, schema, sync })
    }
}
