//! Command handlers for editing settings documents without a typed schema

use super::app::{Cli, Commands};
use anyhow::{Context, Result};
use colored::*;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use xml_settings::document::{validate_root_element, Document};
use xml_settings::{paths, writer};

/// Dispatch a parsed command line
pub fn run(cli: Cli) -> Result<()> {
    let Cli { app, command } = cli;
    let resolve = |file: PathBuf| resolve_file(app.as_deref(), file, None);

    match command {
        Commands::Show { file } => show_command(&resolve(file)?),
        Commands::Categories { file } => categories_command(&resolve(file)?),
        Commands::Get { file, category, key } => get_command(&resolve(file)?, &category, &key),
        Commands::Set {
            file,
            category,
            key,
            value,
            root,
        } => set_command(&resolve(file)?, &category, &key, value, root.as_deref()),
        Commands::Remove { file, category, key } => {
            remove_command(&resolve(file)?, &category, key.as_deref())
        }
        Commands::Format { file, root } => format_command(&resolve(file)?, root.as_deref()),
    }
}

/// Resolve FILE inside the config directory of `app`, if one was given
///
/// `base` overrides the per-user config location.
fn resolve_file(app: Option<&str>, file: PathBuf, base: Option<&Path>) -> Result<PathBuf> {
    let Some(app) = app else {
        return Ok(file);
    };
    let dir = match base {
        Some(base) => paths::config_dir_in(base, app)?,
        None => paths::config_dir(app)?,
    };
    Ok(dir.join(file))
}

/// Print every category and key of a document
fn show_command(path: &Path) -> Result<()> {
    let document = read_document(path)?;

    if document.categories().is_empty() {
        println!("  {}", "No settings stored".bright_yellow().bold());
        return Ok(());
    }

    println!("{}", format!("<{}>", document.root_name()).bright_white().bold());
    for category in document.categories() {
        println!("  {}", category.name().bright_cyan().bold());
        for key in category.keys() {
            println!("    {} = {}", key.name().bright_green(), key.value());
        }
    }
    Ok(())
}

fn categories_command(path: &Path) -> Result<()> {
    for name in category_names(path)? {
        println!("{}", name);
    }
    Ok(())
}

fn get_command(path: &Path, category: &str, key: &str) -> Result<()> {
    println!("{}", get_value(path, category, key)?);
    Ok(())
}

fn set_command(
    path: &Path,
    category: &str,
    key: &str,
    value: String,
    root: Option<&str>,
) -> Result<()> {
    set_value(path, category, key, value, root)?;
    println!(
        "{} Set {}/{}",
        "✓".bright_green().bold(),
        category.bright_green().bold(),
        key.bright_green().bold()
    );
    Ok(())
}

fn remove_command(path: &Path, category: &str, key: Option<&str>) -> Result<()> {
    remove_entry(path, category, key)?;
    println!("{} Removed", "✓".bright_green().bold());
    Ok(())
}

fn format_command(path: &Path, root: Option<&str>) -> Result<()> {
    format_document(path, root)?;
    println!("{} Formatted {:?}", "✓".bright_green().bold(), path);
    Ok(())
}

/// Category names in document order
fn category_names(path: &Path) -> Result<Vec<String>> {
    let document = read_document(path)?;
    Ok(document
        .categories()
        .iter()
        .map(|c| c.name().to_string())
        .collect())
}

/// Raw value of a key
fn get_value(path: &Path, category: &str, key: &str) -> Result<String> {
    let document = read_document(path)?;
    let found = document
        .category(category)
        .and_then(|c| c.key(key))
        .with_context(|| format!("No key '{}' in category '{}'", key, category))?;
    Ok(found.value().to_string())
}

/// Set the raw value of a key, creating the document when it is missing
fn set_value(
    path: &Path,
    category: &str,
    key: &str,
    value: String,
    root: Option<&str>,
) -> Result<()> {
    info!("Setting {}/{} to {}", category, key, value);

    let mut document = if path.exists() {
        read_document(path)?
    } else {
        let root = root.with_context(|| {
            format!("{:?} does not exist; pass --root to create it", path)
        })?;
        validate_root_element(root)?;
        Document::new(root)
    };

    document.set_value(category, key, value);
    write(path, &document, root)
}

/// Remove a key, or a whole category when no key is given
fn remove_entry(path: &Path, category: &str, key: Option<&str>) -> Result<()> {
    let mut document = read_document(path)?;

    let removed = match key {
        Some(key) => document.remove_key(category, key),
        None => document.remove_category(category),
    };
    if !removed {
        anyhow::bail!(
            "Nothing to remove: '{}' not found",
            key.map_or_else(|| category.to_string(), |key| format!("{}/{}", category, key))
        );
    }

    write(path, &document, None)
}

/// Rewrite a document in canonical form, optionally renaming its root
fn format_document(path: &Path, root: Option<&str>) -> Result<()> {
    let document = read_document(path)?;
    write(path, &document, root)
}

fn read_document(path: &Path) -> Result<Document> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings document: {:?}", path))?;

    Document::parse(&text)
        .map_err(|e| anyhow::anyhow!("Failed to parse settings document {:?}: {}", path, e))
}

fn write(path: &Path, document: &Document, root: Option<&str>) -> Result<()> {
    let root = root.unwrap_or(document.root_name());
    validate_root_element(root)?;
    writer::write_document(path, document, root)?;
    Ok(())
}
