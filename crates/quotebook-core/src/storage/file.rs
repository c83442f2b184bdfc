//! File-backed key-value storage
//!
//! Each key is stored as its own file inside a directory.
//! Uses atomic writes (write to temp file, then rename) to prevent corruption.
//!
//! Storage location: `~/.local/share/quotebook/` (configurable via `Config`)

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StorageError, StorageResult};

/// Extension of the in-progress file an atomic write renames into place
const TEMP_EXTENSION: &str = "tmp";

/// Key-value storage rooted at a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

/// Size information about a storage directory
#[derive(Debug, Clone, Default)]
pub struct StorageStats {
    /// Number of stored entries
    pub entries: usize,
    /// Total size of all entries in bytes
    pub total_size: u64,
}

impl StorageStats {
    /// Human-readable total size
    pub fn total_size_human(&self) -> String {
        let size = self.total_size as f64;
        if size < 1024.0 {
            format!("{} B", self.total_size)
        } else if size < 1024.0 * 1024.0 {
            format!("{:.1} KB", size / 1024.0)
        } else {
            format!("{:.1} MB", size / (1024.0 * 1024.0))
        }
    }
}

impl FileStorage {
    /// Create a storage rooted at `dir`
    ///
    /// The directory is created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the entries
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Count and size the entries currently on disk
    ///
    /// Leftover temp files and log files sharing the directory are skipped.
    pub fn stats(&self) -> StorageStats {
        let mut stats = StorageStats::default();
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return stats;
        };

        for entry in entries.flatten() {
            if !is_entry_file(&entry.path()) {
                continue;
            }
            if let Ok(meta) = entry.metadata() {
                if meta.is_file() {
                    stats.entries += 1;
                    stats.total_size += meta.len();
                }
            }
        }

        stats
    }
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                Err(StorageError::PermissionDenied { path, source: e })
            }
            Err(e) => Err(StorageError::Read { path, source: e }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        atomic_write(&self.path_for(key), value.as_bytes())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::from_io(e, path)),
        }
    }
}

/// Whether `path` holds a stored entry rather than a temp or log file
fn is_entry_file(path: &Path) -> bool {
    !matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some(TEMP_EXTENSION) | Some("log")
    )
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".");
    temp_name.push(TEMP_EXTENSION);
    let temp_path = path.with_file_name(temp_name);

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    // Sync to disk before rename
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::Rename {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_and_get() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(temp_dir.path());

        assert!(storage.get("quotes.json").unwrap().is_none());

        storage.set("quotes.json", "[]").unwrap();
        assert_eq!(storage.get("quotes.json").unwrap().as_deref(), Some("[]"));
        assert!(storage.path_for("quotes.json").exists());
    }

    #[test]
    fn test_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(temp_dir.path());

        storage.set("last_filter", "Programming").unwrap();
        storage.set("last_filter", "all").unwrap();
        assert_eq!(storage.get("last_filter").unwrap().as_deref(), Some("all"));
    }

    #[test]
    fn test_remove() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(temp_dir.path());

        storage.set("last_filter", "Mindset").unwrap();
        storage.remove("last_filter").unwrap();
        assert!(storage.get("last_filter").unwrap().is_none());

        // Removing again is fine
        storage.remove("last_filter").unwrap();
    }

    #[test]
    fn test_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let mut storage = FileStorage::new(&nested);

        storage.set("quotes.json", "[]").unwrap();
        assert!(nested.join("quotes.json").exists());
        assert!(!nested.join("quotes.json.tmp").exists());
    }

    #[test]
    fn test_stats() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(temp_dir.path());

        assert_eq!(storage.stats().entries, 0);

        storage.set("quotes.json", "[]").unwrap();
        storage.set("last_filter", "all").unwrap();

        let stats = storage.stats();
        assert_eq!(stats.entries, 2);
        assert_eq!(stats.total_size, 5);
        assert_eq!(stats.total_size_human(), "5 B");
    }

    #[test]
    fn test_stats_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("missing"));
        assert_eq!(storage.stats().entries, 0);
    }

    #[test]
    fn test_stats_skips_temp_and_log_files() {
        let temp_dir = TempDir::new().unwrap();
        let mut storage = FileStorage::new(temp_dir.path());

        storage.set("quotes.json", "[]").unwrap();
        fs::write(temp_dir.path().join("quotes.json.tmp"), "[{\"partial").unwrap();
        fs::write(temp_dir.path().join("debug.log"), "DEBUG loaded 5 quotes\n").unwrap();

        let stats = storage.stats();
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.total_size, 2);
    }
}
