//! Configuration loading and root folder resolution
//!
//! Missing or unreadable configuration never stops startup: every value has a
//! compiled default, and problems with the TOML file are logged as warnings.

use crate::{Error, Result, Wpm};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "RSVP_ROOT_FOLDER";

/// Default HTTP port for the reader service
pub const DEFAULT_PORT: u16 = 5750;

/// Number of clipboard history entries scanned at session start
pub const DEFAULT_CLIPBOARD_SCAN_DEPTH: usize = 6;

/// Minimum word count for a clipboard entry to become a document
pub const DEFAULT_MIN_WORDS: usize = 10;

/// Optional settings read from `config.toml`
///
/// Every field may be absent; see [`ReaderSettings::from_toml`] for defaults.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub port: Option<u16>,
    pub default_wpm: Option<u32>,
    pub clipboard_dir: Option<PathBuf>,
    pub clipboard_scan_depth: Option<usize>,
    pub min_words: Option<usize>,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// Parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
    }

    /// Load the config file if there is one, falling back to defaults
    ///
    /// `explicit` comes from the command line and wins over the platform path.
    /// A file that cannot be used yields the defaults and a warning for the
    /// caller to log; callers may not have logging set up yet.
    pub fn load_or_default(explicit: Option<&Path>) -> (Self, Option<String>) {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => return (Self::default(), None),
            },
        };

        match Self::load(&path) {
            Ok(config) => (config, None),
            Err(e) => (
                Self::default(),
                Some(format!("Ignoring config file {}: {}", path.display(), e)),
            ),
        }
    }
}

/// Reader tunables after defaults and validation are applied
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderSettings {
    pub default_wpm: Wpm,
    pub clipboard_scan_depth: usize,
    pub min_words: usize,
}

impl ReaderSettings {
    pub fn from_toml(config: &TomlConfig) -> Self {
        let default_wpm = match config.default_wpm {
            Some(value) => Wpm::new(value).unwrap_or_else(|e| {
                warn!("{}; using {}", e, Wpm::DEFAULT);
                Wpm::DEFAULT
            }),
            None => Wpm::DEFAULT,
        };

        Self {
            default_wpm,
            clipboard_scan_depth: config
                .clipboard_scan_depth
                .unwrap_or(DEFAULT_CLIPBOARD_SCAN_DEPTH),
            min_words: config.min_words.unwrap_or(DEFAULT_MIN_WORDS),
        }
    }
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self::from_toml(&TomlConfig::default())
    }
}

/// Root folder resolution, in priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    config: &TomlConfig,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// Platform config file location (`<config_dir>/rsvp/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("rsvp").join("config.toml"))
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/rsvp
        dirs::data_local_dir()
            .map(|d| d.join("rsvp"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/rsvp"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/rsvp
        dirs::data_dir()
            .map(|d| d.join("rsvp"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/rsvp"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\rsvp
        dirs::data_local_dir()
            .map(|d| d.join("rsvp"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\rsvp"))
    } else {
        PathBuf::from("./rsvp_data")
    }
}
