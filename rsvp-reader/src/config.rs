//! rsvp-reader specific configuration

use rsvp_common::config::ReaderSettings;
use std::path::PathBuf;

/// Reader service configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub root_folder: PathBuf,
    pub db_path: PathBuf,
    pub clipboard_dir: PathBuf,
    pub port: u16,
    pub settings: ReaderSettings,
}

impl Config {
    /// Database and clipboard locations derived from the root folder
    pub fn for_root(root_folder: PathBuf, port: u16, settings: ReaderSettings) -> Self {
        Self {
            db_path: root_folder.join("rsvp.db"),
            clipboard_dir: root_folder.join("clipboard"),
            root_folder,
            port,
            settings,
        }
    }
}
