//! Canonical rendering and atomic writing of settings documents

use crate::document::{is_xml_text, Category, Document, Key};
use crate::error::{Result, SettingsError};
use log::{debug, info};
use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Writer;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

/// Render a document as canonical XML text
///
/// Categories are ordered by name and keys by name within their category
/// (ordinal comparison), indented with tabs under an XML declaration. The
/// output does not end with a newline.
///
/// Returns a render error if a name or value holds a character XML 1.0 cannot
/// represent, since the result would not parse.
pub fn canonicalize(document: &Document, root: &str) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b'\t', 1);

    write_event(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    write_event(&mut writer, Event::Start(BytesStart::new(root)))?;

    let mut categories: Vec<&Category> = document.categories().iter().collect();
    categories.sort_by(|a, b| a.name().cmp(b.name()));

    for category in categories {
        let mut start = BytesStart::new("Category");
        start.push_attribute(attribute("Name", category.name())?);
        write_event(&mut writer, Event::Start(start))?;

        let mut keys: Vec<&Key> = category.keys().iter().collect();
        keys.sort_by(|a, b| a.name().cmp(b.name()));

        for key in keys {
            let mut element = BytesStart::new("Key");
            element.push_attribute(attribute("Name", key.name())?);
            element.push_attribute(attribute("Value", key.value())?);
            write_event(&mut writer, Event::Empty(element))?;
        }

        write_event(&mut writer, Event::End(BytesEnd::new("Category")))?;
    }

    write_event(&mut writer, Event::End(BytesEnd::new(root)))?;

    String::from_utf8(writer.into_inner()).map_err(|e| SettingsError::Render(e.to_string()))
}

/// Canonicalize `document` and replace the file at `path` with it
///
/// The text is written to a sibling temporary file which is then renamed over
/// the target, so the previous content is either fully replaced or untouched.
pub fn write_document(path: &Path, document: &Document, root: &str) -> Result<()> {
    let mut text = canonicalize(document, root)?;
    text.push('\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| SettingsError::io(parent, e))?;
            debug!("Created settings directory: {:?}", parent);
        }
    }

    let temp_path = temp_path(path);
    fs::write(&temp_path, text.as_bytes()).map_err(|e| SettingsError::io(&temp_path, e))?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(SettingsError::io(path, e));
    }

    info!("Saved settings document {:?} ({} bytes)", path, text.len());
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| SettingsError::Render(e.to_string()))
}

// Tabs and line breaks are written as character references so they survive
// attribute-value normalisation when the file is read back.
fn attribute<'a>(name: &'a str, value: &str) -> Result<Attribute<'a>> {
    if !is_xml_text(value) {
        return Err(SettingsError::Render(format!(
            "{} {:?} contains a character that XML cannot represent",
            name, value
        )));
    }
    let escaped = escape(value)
        .replace('\t', "&#9;")
        .replace('\n', "&#10;")
        .replace('\r', "&#13;");
    Ok(Attribute {
        key: QName(name.as_bytes()),
        value: Cow::Owned(escaped.into_bytes()),
    })
}
