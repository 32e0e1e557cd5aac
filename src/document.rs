//! In-memory settings document tree
//!
//! ```xml
//! <App>
//!   <Category Name="Audio">
//!     <Key Name="Volume" Value="50" />
//!   </Category>
//! </App>
//! ```

use crate::error::{Result, SettingsError};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

const CATEGORY: &str = "Category";
const KEY: &str = "Key";
const NAME: &str = "Name";
const VALUE: &str = "Value";

// NameStartChar and NameChar from the XML 1.0 (fifth edition) Name production,
// without the colon: a prefixed root would need a namespace declaration
const NAME_START: &str = r"A-Z_a-z\x{C0}-\x{D6}\x{D8}-\x{F6}\x{F8}-\x{2FF}\x{370}-\x{37D}\x{37F}-\x{1FFF}\x{200C}-\x{200D}\x{2070}-\x{218F}\x{2C00}-\x{2FEF}\x{3001}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFFD}\x{10000}-\x{EFFFF}";
const NAME_REST: &str = r"\-.0-9\x{B7}\x{300}-\x{36F}\x{203F}-\x{2040}";

static XML_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^[{NAME_START}][{NAME_START}{NAME_REST}]*$"))
        .expect("XML name pattern is valid")
});

/// Check if `name` is an unprefixed XML name (an NCName)
pub fn is_xml_name(name: &str) -> bool {
    XML_NAME.is_match(name)
}

/// Check if every character of `text` is allowed in an XML 1.0 document
pub fn is_xml_text(text: &str) -> bool {
    text.chars().all(|c| match c {
        '\t' | '\n' | '\r' => true,
        '\u{FFFE}' | '\u{FFFF}' => false,
        c => c >= '\u{20}',
    })
}

/// Fail with a configuration error unless `name` can be a root element
pub fn validate_root_element(name: &str) -> Result<()> {
    if is_xml_name(name) {
        Ok(())
    } else {
        Err(SettingsError::InvalidRootElement(name.to_string()))
    }
}

/// A single setting inside a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    name: String,
    value: String,
}

impl Key {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw invariant text; empty when the attribute was missing
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }
}

/// A named group of keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    name: String,
    keys: Vec<Key>,
}

impl Category {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            keys: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Keys in insertion order
    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn key(&self, name: &str) -> Option<&Key> {
        self.keys.iter().find(|k| k.name == name)
    }

    /// Find a key by name, appending an empty one if missing
    pub fn key_or_insert(&mut self, name: &str) -> &mut Key {
        let index = match self.keys.iter().position(|k| k.name == name) {
            Some(index) => index,
            None => {
                self.keys.push(Key {
                    name: name.to_string(),
                    value: String::new(),
                });
                self.keys.len() - 1
            }
        };
        &mut self.keys[index]
    }

    pub fn remove_key(&mut self, name: &str) -> bool {
        let before = self.keys.len();
        self.keys.retain(|k| k.name != name);
        self.keys.len() != before
    }
}

/// A settings document: a root element holding uniquely named categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: String,
    categories: Vec<Category>,
}

impl Document {
    /// Create an empty document carrying only the root element
    pub fn new(root: &str) -> Self {
        Self {
            root: root.to_string(),
            categories: Vec::new(),
        }
    }

    /// Parse a document from XML text
    ///
    /// Only `Category` children of the root and `Key` children of a category
    /// are kept. Elements without a `Name` are skipped, and when a name repeats
    /// the first occurrence wins.
    pub fn parse(text: &str) -> std::result::Result<Self, roxmltree::Error> {
        let doc = roxmltree::Document::parse(text)?;
        let root = doc.root_element();
        let mut document = Document::new(root.tag_name().name());

        for node in root.children().filter(|n| n.has_tag_name(CATEGORY)) {
            let Some(category_name) = node.attribute(NAME) else {
                warn!("Skipping Category element without a Name attribute");
                continue;
            };
            if document.category(category_name).is_some() {
                warn!("Ignoring duplicate Category '{}'", category_name);
                continue;
            }

            let mut category = Category::new(category_name);
            for key_node in node.children().filter(|n| n.has_tag_name(KEY)) {
                let Some(key_name) = key_node.attribute(NAME) else {
                    warn!("Skipping Key element without a Name attribute in '{}'", category_name);
                    continue;
                };
                if category.key(key_name).is_some() {
                    warn!("Ignoring duplicate Key '{}' in Category '{}'", key_name, category_name);
                    continue;
                }
                category.keys.push(Key {
                    name: key_name.to_string(),
                    value: key_node.attribute(VALUE).unwrap_or_default().to_string(),
                });
            }
            document.categories.push(category);
        }

        debug!(
            "Parsed settings document <{}> with {} categories",
            document.root,
            document.categories.len()
        );
        Ok(document)
    }

    /// Root element name as read or created
    pub fn root_name(&self) -> &str {
        &self.root
    }

    /// Categories in insertion order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Find a category by name, appending an empty one if missing
    pub fn category_or_insert(&mut self, name: &str) -> &mut Category {
        let index = match self.categories.iter().position(|c| c.name == name) {
            Some(index) => index,
            None => {
                self.categories.push(Category::new(name));
                self.categories.len() - 1
            }
        };
        &mut self.categories[index]
    }

    /// Raw value of a key, or None if the category, key or value is absent
    pub fn value(&self, category: &str, key: &str) -> Option<&str> {
        self.category(category)
            .and_then(|c| c.key(key))
            .map(Key::value)
            .filter(|value| !value.is_empty())
    }

    /// Set a key's value, creating the category and key as needed
    pub fn set_value(&mut self, category: &str, key: &str, value: impl Into<String>) {
        self.category_or_insert(category).key_or_insert(key).set_value(value);
    }

    pub fn remove_category(&mut self, name: &str) -> bool {
        let before = self.categories.len();
        self.categories.retain(|c| c.name != name);
        self.categories.len() != before
    }

    pub fn remove_key(&mut self, category: &str, key: &str) -> bool {
        self.categories
            .iter_mut()
            .find(|c| c.name == category)
            .is_some_and(|c| c.remove_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<App>
	<Category Name="Audio">
		<Key Name="Volume" Value="80" />
		<Key Name="Muted" Value="" />
		<Key Name="Device" />
		<Key Name="Volume" Value="10" />
	</Category>
	<!-- hand-written comment -->
	<Category Name="Video">
		<Key Name="Quality" Value="High" />
	</Category>
	<Category Name="Audio">
		<Key Name="Balance" Value="0" />
	</Category>
	<Category>
		<Key Name="Orphan" Value="1" />
	</Category>
</App>
"#;

    #[test]
    fn test_xml_names() {
        assert!(is_xml_name("App"));
        assert!(is_xml_name("_settings"));
        assert!(is_xml_name("my-app.v2"));
        assert!(is_xml_name("Überblick"));
        assert!(is_xml_name("a"));

        assert!(!is_xml_name(""));
        assert!(!is_xml_name("1bad"));
        assert!(!is_xml_name("-app"));
        assert!(!is_xml_name("has space"));
        assert!(!is_xml_name("a<b"));
        assert!(!is_xml_name("ns:App"));
        assert!(!is_xml_name(":App"));
    }

    #[test]
    fn test_xml_text() {
        assert!(is_xml_text(""));
        assert!(is_xml_text("tab\there\r\nnext"));
        assert!(is_xml_text("Überblick → 🎧"));
        assert!(is_xml_text("\u{FFFD}"));

        assert!(!is_xml_text("bell\u{7}"));
        assert!(!is_xml_text("\0"));
        assert!(!is_xml_text("form\u{C}feed"));
        assert!(!is_xml_text("\u{1F}"));
        assert!(!is_xml_text("\u{FFFE}"));
        assert!(!is_xml_text("\u{FFFF}"));
    }

    #[test]
    fn test_validate_root_element() {
        assert!(validate_root_element("App").is_ok());
        let err = validate_root_element("1bad").unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(err, SettingsError::InvalidRootElement(name) if name == "1bad"));

        let err = validate_root_element("ns:App").unwrap_err();
        assert!(matches!(err, SettingsError::InvalidRootElement(name) if name == "ns:App"));
    }

    #[test]
    fn test_parse_sample() {
        let document = Document::parse(SAMPLE).unwrap();
        assert_eq!(document.root_name(), "App");

        let names: Vec<_> = document.categories().iter().map(Category::name).collect();
        assert_eq!(names, vec!["Audio", "Video"]);

        assert_eq!(document.value("Audio", "Volume"), Some("80"));
        assert_eq!(document.value("Video", "Quality"), Some("High"));
    }

    #[test]
    fn test_empty_and_missing_values_are_absent() {
        let document = Document::parse(SAMPLE).unwrap();
        assert_eq!(document.value("Audio", "Muted"), None);
        assert_eq!(document.value("Audio", "Device"), None);
        assert_eq!(document.value("Audio", "Missing"), None);
        assert_eq!(document.value("Network", "Proxy"), None);
        assert!(document.category("Audio").unwrap().key("Device").is_some());
    }

    #[test]
    fn test_duplicates_first_wins() {
        let document = Document::parse(SAMPLE).unwrap();
        let audio = document.category("Audio").unwrap();
        assert_eq!(audio.keys().len(), 3);
        assert!(audio.key("Balance").is_none());
    }

    #[test]
    fn test_malformed_xml_is_an_error() {
        assert!(Document::parse("<App><Category Name=\"Audio\"></App>").is_err());
        assert!(Document::parse("").is_err());
    }

    #[test]
    fn test_find_or_create_appends_in_first_seen_order() {
        let mut document = Document::new("App");
        document.set_value("Video", "Quality", "Low");
        document.set_value("Audio", "Volume", "50");
        document.set_value("Video", "Fullscreen", "True");
        document.set_value("Video", "Quality", "High");

        let names: Vec<_> = document.categories().iter().map(Category::name).collect();
        assert_eq!(names, vec!["Video", "Audio"]);

        let video = document.category("Video").unwrap();
        let keys: Vec<_> = video.keys().iter().map(Key::name).collect();
        assert_eq!(keys, vec!["Quality", "Fullscreen"]);
        assert_eq!(document.value("Video", "Quality"), Some("High"));
    }

    #[test]
    fn test_remove() {
        let mut document = Document::parse(SAMPLE).unwrap();
        assert!(document.remove_key("Audio", "Volume"));
        assert!(!document.remove_key("Audio", "Volume"));
        assert!(!document.remove_key("Nope", "Volume"));
        assert!(document.remove_category("Video"));
        assert!(!document.remove_category("Video"));
        assert_eq!(document.categories().len(), 1);
    }
}
