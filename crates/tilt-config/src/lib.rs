mod types;

pub use types::*;

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Per-user `tilt-app` directory under the OS config root, created on first
/// use (e.g. `~/.config/tilt-app` on Linux).
pub fn config_dir() -> Result<PathBuf> {
    let dir = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
        .join("tilt-app");
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// `config.toml` inside [`config_dir`].
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Load config from the default location, or return defaults if not found.
pub fn load_config() -> Result<AppConfig> {
    load_config_from(&config_path()?)
}

/// Load config from `path`, or return defaults if the file does not exist.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if path.exists() {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        info!(?path, "Loaded config");
        Ok(config)
    } else {
        info!("No config found, using defaults");
        Ok(AppConfig::default())
    }
}

/// Save config to the default location.
pub fn save_config(config: &AppConfig) -> Result<()> {
    save_config_to(config, &config_path()?)
}

pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<()> {
    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    info!(?path, "Saved config");
    Ok(())
}
