//! Clipboard history sources
//!
//! The reader only needs to enumerate recent clipboard entries as plain text
//! and to put a text back on the clipboard. How the history is captured is up
//! to the host.

use crate::{Error, Result};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::SystemTime;
use tracing::debug;

/// Host clipboard history
pub trait ClipboardSource: Send + Sync {
    /// Up to `max_count` entries as raw text, most recent first
    fn read_entries(&self, max_count: usize) -> Result<Vec<String>>;

    /// Place `text` on the clipboard as the newest entry
    fn write_text(&self, text: &str) -> Result<()>;
}

/// Clipboard history kept in a directory, one entry per file
///
/// Entries are ordered by modification time, newest first. Files that are not
/// valid UTF-8 are skipped.
#[derive(Debug, Clone)]
pub struct DirectoryClipboard {
    dir: PathBuf,
}

impl DirectoryClipboard {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn entry_files(&self) -> Result<Vec<(SystemTime, PathBuf)>> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            files.push((modified, entry.path()));
        }
        // Newest first; name breaks ties so equal mtimes stay deterministic
        files.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));
        Ok(files)
    }
}

impl ClipboardSource for DirectoryClipboard {
    fn read_entries(&self, max_count: usize) -> Result<Vec<String>> {
        let files = self.entry_files().map_err(|e| {
            Error::Clipboard(format!("Cannot read {}: {}", self.dir.display(), e))
        })?;

        let mut entries = Vec::new();
        for (_, path) in files.into_iter().take(max_count) {
            match std::fs::read_to_string(&path) {
                Ok(text) => entries.push(text),
                Err(e) => debug!("Skipping clipboard entry {}: {}", path.display(), e),
            }
        }
        Ok(entries)
    }

    fn write_text(&self, text: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.6f");
        let path = self.dir.join(format!("copied-{}.txt", stamp));
        std::fs::write(&path, text)?;
        debug!("Wrote clipboard entry {}", path.display());
        Ok(())
    }
}

/// In-memory clipboard history
#[derive(Debug, Default)]
pub struct StaticClipboard {
    entries: Mutex<Vec<String>>,
}

impl StaticClipboard {
    /// `entries` are given most recent first
    pub fn new(entries: Vec<String>) -> Self {
        Self {
            entries: Mutex::new(entries),
        }
    }

    /// Snapshot of the current entries, most recent first
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

impl ClipboardSource for StaticClipboard {
    fn read_entries(&self, max_count: usize) -> Result<Vec<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| Error::Clipboard("Clipboard lock poisoned".to_string()))?;
        Ok(entries.iter().take(max_count).cloned().collect())
    }

    fn write_text(&self, text: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| Error::Clipboard("Clipboard lock poisoned".to_string()))?;
        entries.insert(0, text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;

    fn write_with_mtime(dir: &Path, name: &str, text: &str, secs: u64) {
        let path = dir.join(name);
        std::fs::write(&path, text).unwrap();
        let file = std::fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
    }

    #[test]
    fn test_directory_entries_newest_first() {
        let dir = TempDir::new().unwrap();
        write_with_mtime(dir.path(), "a.txt", "oldest", 1_000);
        write_with_mtime(dir.path(), "b.txt", "newest", 3_000);
        write_with_mtime(dir.path(), "c.txt", "middle", 2_000);

        let clipboard = DirectoryClipboard::new(dir.path());
        let entries = clipboard.read_entries(10).unwrap();

        assert_eq!(entries, vec!["newest", "middle", "oldest"]);
        assert_eq!(clipboard.read_entries(2).unwrap(), vec!["newest", "middle"]);
    }

    #[test]
    fn test_directory_skips_subdirectories() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        write_with_mtime(dir.path(), "only.txt", "only entry", 1_000);

        let clipboard = DirectoryClipboard::new(dir.path());
        assert_eq!(clipboard.read_entries(6).unwrap(), vec!["only entry"]);
    }

    #[test]
    fn test_missing_directory_is_clipboard_error() {
        let dir = TempDir::new().unwrap();
        let clipboard = DirectoryClipboard::new(dir.path().join("absent"));

        assert!(matches!(
            clipboard.read_entries(6),
            Err(Error::Clipboard(_))
        ));
    }

    #[test]
    fn test_directory_write_text_adds_entry() {
        let dir = TempDir::new().unwrap();
        let clipboard = DirectoryClipboard::new(dir.path().join("history"));

        clipboard.write_text("copied words").unwrap();

        let entries = clipboard.read_entries(6).unwrap();
        assert_eq!(entries, vec!["copied words"]);
    }

    #[test]
    fn test_static_clipboard() {
        let clipboard = StaticClipboard::new(vec!["b".to_string(), "a".to_string()]);
        clipboard.write_text("c").unwrap();

        assert_eq!(clipboard.read_entries(2).unwrap(), vec!["c", "b"]);
        assert_eq!(clipboard.entries(), vec!["c", "b", "a"]);
    }
}
