//! Load and save synchronization between a settings object and its document

use crate::convert::{from_invariant_text, to_invariant_text};
use crate::defaults::DefaultResolver;
use crate::document::{is_xml_text, validate_root_element, Document};
use crate::error::{Result, SettingsError};
use crate::registry;
use crate::settings::Settings;
use crate::writer;
use log::{debug, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Owns the document tree of one settings file
///
/// The tree is rebuilt from disk on every [`load`](Self::load) and updated in
/// place on every [`save`](Self::save). Saves are serialized by a lock held
/// for the whole update-and-write phase.
pub struct Synchronizer {
    path: PathBuf,
    root: String,
    document: Mutex<Option<Document>>,
    resolver: DefaultResolver,
}

impl Synchronizer {
    /// Create a synchronizer; the root element name is validated here,
    /// before any file I/O
    pub fn new(path: impl Into<PathBuf>, root: &str, resolver: DefaultResolver) -> Result<Self> {
        validate_root_element(root)?;
        Ok(Self {
            path: path.into(),
            root: root.to_string(),
            document: Mutex::new(None),
            resolver,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Read the document and assign every setting of `data`
    ///
    /// A missing, unreadable or malformed file is treated as empty, and a value
    /// that cannot be converted falls back to the default; neither is an error.
    /// Values are resolved for every setting before any is assigned, so a
    /// failed load leaves `data` untouched.
    pub fn load<T: Settings>(&mut self, data: &mut T) -> Result<()> {
        let schema = registry::describe::<T>()?;
        let document = self.read_document();

        let mut values = Vec::with_capacity(schema.len());
        for (name, descriptor) in schema.settings() {
            let default = self.resolver.resolve(name, descriptor)?;

            let stored = document
                .as_ref()
                .and_then(|d| d.value(descriptor.category(), name));

            let value = match stored {
                Some(text) => match from_invariant_text(text, descriptor.value_type()) {
                    Ok(value) => value,
                    Err(e) => {
                        warn!(
                            "Setting {}/{} in {:?}: {}; using default",
                            descriptor.category(),
                            name,
                            self.path,
                            e
                        );
                        default
                    }
                },
                None => default,
            };
            values.push((name, value));
        }

        for (name, value) in values {
            data.set_value(name, value)?;
        }

        *self.document.get_mut().unwrap_or_else(PoisonError::into_inner) = document;
        Ok(())
    }

    /// Write every setting of `data` into the tree and persist it
    ///
    /// Categories and keys missing from the tree are appended; the file itself
    /// is produced by the canonicalizing writer. Every value is checked before
    /// the tree is touched: a value of the wrong type, or one whose text XML
    /// cannot hold, fails the save and leaves both the tree and the file as
    /// they were.
    pub fn save<T: Settings>(&self, data: &T) -> Result<()> {
        let schema = registry::describe::<T>()?;

        let mut entries = Vec::with_capacity(schema.len());
        for (name, descriptor) in schema.settings() {
            let value = data.get_value(name).ok_or_else(|| {
                SettingsError::descriptor(name, "declared as a setting but has no readable value")
            })?;
            if !value.matches(descriptor.value_type()) {
                return Err(SettingsError::conversion(
                    format!("{:?}", value),
                    descriptor.value_type(),
                ));
            }

            let text = to_invariant_text(&value);
            if !is_xml_text(&text) {
                return Err(SettingsError::conversion(text, descriptor.value_type()));
            }
            entries.push((descriptor.category(), name, text));
        }

        let mut guard = self.document.lock().unwrap_or_else(PoisonError::into_inner);
        let mut document = guard
            .clone()
            .unwrap_or_else(|| Document::new(&self.root));
        for (category, name, text) in entries {
            document.set_value(category, name, text);
        }

        debug!("Writing {} settings to {:?}", schema.len(), self.path);
        writer::write_document(&self.path, &document, &self.root)?;
        *guard = Some(document);
        Ok(())
    }

    fn read_document(&self) -> Option<Document> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Settings file {:?} does not exist, using defaults", self.path);
                return None;
            }
            Err(e) => {
                warn!("Failed to read settings file {:?}: {}; using defaults", self.path, e);
                return None;
            }
        };

        match Document::parse(&text) {
            Ok(document) => Some(document),
            Err(e) => {
                warn!("Failed to parse settings file {:?}: {}; using defaults", self.path, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::DynamicDefaults;
    use crate::descriptor::SettingProperty;
    use crate::types::{assign, Value};

    #[derive(Debug, Default, PartialEq)]
    struct Audio {
        volume: i32,
        device: String,
        gain: f64,
    }

    impl Settings for Audio {
        fn properties() -> Result<Vec<SettingProperty>> {
            Ok(vec![
                SettingProperty::builder::<i32>("Volume", "Audio").default(50).build()?,
                SettingProperty::builder::<String>("Device", "Output").build()?,
                SettingProperty::builder::<f64>("Gain", "Audio").default_text("0.5").build()?,
            ])
        }

        fn get_value(&self, property: &str) -> Option<Value> {
            match property {
                "Volume" => Some(Value::I32(self.volume)),
                "Device" => Some(Value::String(self.device.clone())),
                "Gain" => Some(Value::F64(self.gain)),
                _ => None,
            }
        }

        fn set_value(&mut self, property: &str, value: Value) -> Result<()> {
            match property {
                "Volume" => assign(&mut self.volume, property, value),
                "Device" => assign(&mut self.device, property, value),
                "Gain" => assign(&mut self.gain, property, value),
                _ => Ok(()),
            }
        }
    }

    fn resolver() -> DefaultResolver {
        DefaultResolver::new(DynamicDefaults::new().with("Device", "default"))
    }

    fn synchronizer(path: &Path) -> Synchronizer {
        Synchronizer::new(path, "App", resolver()).unwrap()
    }

    #[test]
    fn test_invalid_root_fails_before_io() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.xml");

        let err = Synchronizer::new(&path, "1bad", resolver()).err().unwrap();
        assert!(err.is_configuration());
        assert!(!path.exists());
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut sync = synchronizer(&dir.path().join("settings.xml"));
        let mut audio = Audio::default();

        sync.load(&mut audio).unwrap();
        assert_eq!(audio.volume, 50);
        assert_eq!(audio.device, "default");
        assert_eq!(audio.gain, 0.5);
    }

    #[test]
    fn test_load_reads_values_and_falls_back_per_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.xml");
        fs::write(
            &path,
            r#"<App>
                <Category Name="Audio">
                    <Key Name="Volume" Value="not-a-number" />
                    <Key Name="Gain" Value="0.75" />
                </Category>
                <Category Name="Output">
                    <Key Name="Device" Value="hw:1" />
                </Category>
            </App>"#,
        )
        .unwrap();

        let mut sync = synchronizer(&path);
        let mut audio = Audio::default();
        sync.load(&mut audio).unwrap();

        assert_eq!(audio.volume, 50);
        assert_eq!(audio.gain, 0.75);
        assert_eq!(audio.device, "hw:1");
    }

    #[test]
    fn test_malformed_file_behaves_like_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.xml");
        fs::write(&path, "<App><Category Name=\"Audio\">").unwrap();

        let mut from_corrupt = Audio::default();
        synchronizer(&path).load(&mut from_corrupt).unwrap();

        let mut from_missing = Audio::default();
        synchronizer(&dir.path().join("missing.xml"))
            .load(&mut from_missing)
            .unwrap();

        assert_eq!(from_corrupt, from_missing);
    }

    #[test]
    fn test_missing_dynamic_default_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut sync =
            Synchronizer::new(dir.path().join("settings.xml"), "App", DefaultResolver::default())
                .unwrap();

        let err = sync.load(&mut Audio::default()).unwrap_err();
        assert!(matches!(err, SettingsError::MissingDynamicDefault { property } if property == "Device"));
    }

    #[test]
    fn test_save_is_idempotent_and_keeps_unknown_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.xml");
        fs::write(
            &path,
            r#"<Old><Category Name="Legacy"><Key Name="Theme" Value="Dark" /></Category></Old>"#,
        )
        .unwrap();

        let mut sync = synchronizer(&path);
        let mut audio = Audio::default();
        sync.load(&mut audio).unwrap();
        audio.volume = 75;

        sync.save(&audio).unwrap();
        let first = fs::read(&path).unwrap();
        sync.save(&audio).unwrap();
        let second = fs::read(&path).unwrap();
        assert_eq!(first, second);

        let text = String::from_utf8(first).unwrap();
        assert!(text.contains("<App>"));
        assert!(text.contains("<Key Name=\"Theme\" Value=\"Dark\"/>"));
        assert!(text.contains("<Key Name=\"Volume\" Value=\"75\"/>"));
    }

    #[test]
    fn test_failed_load_leaves_settings_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.xml");
        fs::write(
            &path,
            r#"<App><Category Name="Audio"><Key Name="Volume" Value="90" /></Category></App>"#,
        )
        .unwrap();

        let mut sync = Synchronizer::new(&path, "App", DefaultResolver::default()).unwrap();
        let mut audio = Audio {
            volume: 7,
            device: "hw:0".to_string(),
            gain: 1.0,
        };

        assert!(sync.load(&mut audio).is_err());
        assert_eq!(audio.volume, 7);
        assert_eq!(audio.device, "hw:0");
        assert_eq!(audio.gain, 1.0);
    }

    #[test]
    fn test_unrepresentable_text_fails_save_and_keeps_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.xml");
        let mut sync = synchronizer(&path);
        let mut audio = Audio::default();
        sync.load(&mut audio).unwrap();
        audio.volume = 80;
        sync.save(&audio).unwrap();
        let before = fs::read(&path).unwrap();

        audio.volume = 10;
        audio.device = "bell\u{7}".to_string();
        let err = sync.save(&audio).unwrap_err();
        assert!(matches!(err, SettingsError::Conversion { .. }));
        assert!(!err.is_configuration());
        assert_eq!(fs::read(&path).unwrap(), before);

        let mut reloaded = Audio::default();
        synchronizer(&path).load(&mut reloaded).unwrap();
        assert_eq!(reloaded.volume, 80);
    }

    /// Declares Volume as i32 but reports it as a string
    #[derive(Debug, Default)]
    struct Mislabelled {
        gain: f64,
    }

    impl Settings for Mislabelled {
        fn properties() -> Result<Vec<SettingProperty>> {
            Ok(vec![
                SettingProperty::builder::<f64>("Gain", "Audio").default(0.5).build()?,
                SettingProperty::builder::<i32>("Volume", "Audio").default(50).build()?,
            ])
        }

        fn get_value(&self, property: &str) -> Option<Value> {
            match property {
                "Gain" => Some(Value::F64(self.gain)),
                "Volume" => Some(Value::String("loud".to_string())),
                _ => None,
            }
        }

        fn set_value(&mut self, property: &str, value: Value) -> Result<()> {
            assign(&mut self.gain, property, value)
        }
    }

    #[test]
    fn test_mistyped_value_fails_save_without_touching_the_tree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.xml");
        let text = r#"<App><Category Name="Audio"><Key Name="Gain" Value="0.25" /></Category></App>"#;
        fs::write(&path, text).unwrap();

        let mut sync = synchronizer(&path);
        sync.load(&mut Audio::default()).unwrap();

        let err = sync.save(&Mislabelled { gain: 0.9 }).unwrap_err();
        assert!(matches!(err, SettingsError::Conversion { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), text);

        let guard = sync.document.lock().unwrap();
        let document = guard.as_ref().unwrap();
        assert_eq!(document.value("Audio", "Gain"), Some("0.25"));
        assert_eq!(document.value("Audio", "Volume"), None);
    }

    #[test]
    fn test_concurrent_saves_produce_a_complete_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.xml");
        let mut sync = synchronizer(&path);
        let mut audio = Audio::default();
        sync.load(&mut audio).unwrap();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| sync.save(&audio).unwrap());
            }
        });

        let document = Document::parse(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(document.value("Audio", "Volume"), Some("50"));
        assert_eq!(document.value("Output", "Device"), Some("default"));
    }
}
