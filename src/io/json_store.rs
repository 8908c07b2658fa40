use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use tempfile::NamedTempFile;

use crate::io::storage::{Storage, StorageError};
use crate::model::{Task, ThemeMode};

const TASKS_FILE: &str = "tasks.json";
const THEME_FILE: &str = "theme.json";

/// File-backed storage: one directory holding `tasks.json` and `theme.json`.
///
/// Writes are atomic (temp file + rename into place), so a crash mid-write
/// leaves the previous state intact rather than a truncated file.
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: &Path) -> Result<JsonStore, StorageError> {
        fs::create_dir_all(dir).map_err(|e| StorageError::WriteError {
            path: dir.to_path_buf(),
            source: e,
        })?;
        Ok(JsonStore {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn tasks_path(&self) -> PathBuf {
        self.dir.join(TASKS_FILE)
    }

    fn theme_path(&self) -> PathBuf {
        self.dir.join(THEME_FILE)
    }

    /// Write `content` to `path` atomically via a temp file in the same
    /// directory.
    fn write_atomic(&self, path: &Path, content: &str) -> Result<(), StorageError> {
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|e| StorageError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| StorageError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        tmp.persist(path).map_err(|e| StorageError::WriteError {
            path: path.to_path_buf(),
            source: e.error,
        })?;
        debug!("wrote {}", path.display());
        Ok(())
    }

    /// What exists on disk, for `stats --storage`.
    pub fn storage_info(&self) -> StorageInfo {
        let mut files = Vec::new();
        for name in [TASKS_FILE, THEME_FILE] {
            if let Ok(meta) = fs::metadata(self.dir.join(name)) {
                files.push((name.to_string(), meta.len()));
            }
        }
        StorageInfo {
            dir: self.dir.clone(),
            files,
        }
    }
}

/// Per-file sizes of whatever the store has written.
#[derive(Debug)]
pub struct StorageInfo {
    pub dir: PathBuf,
    /// (file name, size in bytes) for each file present
    pub files: Vec<(String, u64)>,
}

impl Storage for JsonStore {
    fn load_tasks(&self) -> Result<Vec<Task>, StorageError> {
        let path = self.tasks_path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(_) => return Ok(Vec::new()),
        };
        match serde_json::from_str::<Vec<Task>>(&content) {
            Ok(tasks) => Ok(tasks),
            Err(e) => {
                warn!("could not parse {}: {}; starting empty", path.display(), e);
                Ok(Vec::new())
            }
        }
    }

    fn save_tasks(&self, tasks: &[Task]) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(tasks)?;
        self.write_atomic(&self.tasks_path(), &content)
    }

    fn load_theme(&self) -> ThemeMode {
        let content = match fs::read_to_string(self.theme_path()) {
            Ok(content) => content,
            Err(_) => return ThemeMode::default(),
        };
        match serde_json::from_str(&content) {
            Ok(mode) => mode,
            Err(_) => {
                warn!("unrecognized theme value; falling back to auto");
                ThemeMode::default()
            }
        }
    }

    fn save_theme(&self, theme: ThemeMode) -> Result<(), StorageError> {
        let content = serde_json::to_string(&theme)?;
        self.write_atomic(&self.theme_path(), &content)
    }

    fn clear_all(&self) -> Result<(), StorageError> {
        for path in [self.tasks_path(), self.theme_path()] {
            if let Err(e) = fs::remove_file(&path)
                && e.kind() != std::io::ErrorKind::NotFound
            {
                return Err(StorageError::WriteError { path, source: e });
            }
        }
        Ok(())
    }
}

/// Resolve the default data directory from XDG_DATA_HOME, falling back to
/// ~/.local/share.
pub fn default_data_dir() -> PathBuf {
    let data_home = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".local").join("share"));
    data_home.join("slate")
}

fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}
