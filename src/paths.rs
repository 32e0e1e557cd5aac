//! Per-user locations for settings documents

use crate::error::{Result, SettingsError};
use log::info;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Directory holding an application's settings, created if missing
///
/// Uses the XDG config directory on Linux and a dot-directory in the home
/// directory elsewhere.
pub fn config_dir(app: &str) -> Result<PathBuf> {
    let base = if cfg!(target_os = "linux") {
        dirs::config_dir()
    } else {
        dirs::home_dir()
    }
    .ok_or_else(|| {
        SettingsError::io(
            app,
            io::Error::new(io::ErrorKind::NotFound, "no configuration directory on this platform"),
        )
    })?;

    config_dir_in(&base, app)
}

/// Application directory under `base`, created if missing
pub fn config_dir_in(base: &Path, app: &str) -> Result<PathBuf> {
    let config_dir = if cfg!(target_os = "linux") {
        base.join(app)
    } else {
        base.join(format!(".{}", app))
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir).map_err(|e| SettingsError::io(&config_dir, e))?;
        info!("Created config directory: {:?}", config_dir);
    }

    Ok(config_dir)
}

/// Path of a settings document inside the application's config directory
pub fn config_file(app: &str, file_name: &str) -> Result<PathBuf> {
    Ok(config_dir(app)?.join(file_name))
}
