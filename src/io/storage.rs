use std::path::PathBuf;

use crate::model::{Task, ThemeMode};

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not serialize state: {0}")]
    SerializeError(#[from] serde_json::Error),
    #[error("storage rejected the operation: {0}")]
    Rejected(String),
}

/// Durable key-value storage for the task list and theme preference.
///
/// Implementations own only the serialized mirror of the in-memory state.
/// Every `save_*` call is a full overwrite of the stored value, never an
/// incremental patch, so callers must always pass the complete desired
/// state.
pub trait Storage {
    /// Load the stored task list. A missing, unreadable, or unparseable
    /// store reads as empty; only implementations with injectable faults
    /// return `Err`.
    fn load_tasks(&self) -> Result<Vec<Task>, StorageError>;

    /// Overwrite the stored task list.
    fn save_tasks(&self, tasks: &[Task]) -> Result<(), StorageError>;

    /// Load the stored theme; an invalid or missing value reads as `Auto`.
    fn load_theme(&self) -> ThemeMode;

    /// Overwrite the stored theme preference.
    fn save_theme(&self, theme: ThemeMode) -> Result<(), StorageError>;

    /// Remove every key owned by this store. Reset/testing only.
    fn clear_all(&self) -> Result<(), StorageError>;
}
