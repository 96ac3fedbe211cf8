//! Optional user configuration.
//!
//! Read once at startup from `config.toml` in the app's config directory
//! (`$XDG_CONFIG_HOME/tram8map` or `~/.config/tram8map`). Every field has
//! a default, so the file itself is optional; command-line flags take
//! precedence over it.

use std::path::PathBuf;
use std::sync::OnceLock;

use serde::Deserialize;

static CONFIG: OnceLock<Config> = OnceLock::new();

#[derive(Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path of the saved table file.
    pub table: Option<PathBuf>,
    /// Substring filter used to pick the MIDI output port.
    pub midi_port: Option<String>,
}

/// The app's config directory. Falls back to the current directory when
/// neither XDG_CONFIG_HOME nor HOME is set.
pub fn config_dir() -> PathBuf {
    std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tram8map")
}

pub fn init() {
    let path = config_dir().join("config.toml");
    let config = match std::fs::read_to_string(&path) {
        Ok(text) => match toml::from_str(&text) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring invalid config {}: {e}", path.display());
                Config::default()
            }
        },
        Err(_) => Config::default(),
    };
    CONFIG.set(config).ok();
}

/// Where the table is saved: configured path, or `table.json` in the
/// config directory.
pub fn table_path() -> PathBuf {
    CONFIG
        .get()
        .and_then(|c| c.table.clone())
        .unwrap_or_else(|| config_dir().join("table.json"))
}

pub fn midi_port() -> Option<&'static str> {
    CONFIG.get().and_then(|c| c.midi_port.as_deref())
}
