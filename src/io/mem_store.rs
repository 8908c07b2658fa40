use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::io::storage::{Storage, StorageError};
use crate::model::{Task, ThemeMode};

/// In-memory storage with switchable fault injection.
///
/// This is the test double for everything that exercises the repository's
/// rollback contract: flip `fail_writes` and every subsequent save is
/// rejected the way a full disk or quota would reject it.
#[derive(Default)]
pub struct MemStore {
    tasks: Mutex<Vec<Task>>,
    theme: Mutex<ThemeMode>,
    fail_writes: AtomicBool,
    fail_loads: AtomicBool,
    saves: AtomicUsize,
}

impl MemStore {
    pub fn new() -> MemStore {
        MemStore::default()
    }

    /// Make every subsequent write fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent load fail.
    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `save_tasks` calls so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl Storage for MemStore {
    fn load_tasks(&self) -> Result<Vec<Task>, StorageError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StorageError::Rejected("injected load failure".into()));
        }
        Ok(self.tasks.lock().unwrap().clone())
    }

    fn save_tasks(&self, tasks: &[Task]) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Rejected("injected write failure".into()));
        }
        *self.tasks.lock().unwrap() = tasks.to_vec();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn load_theme(&self) -> ThemeMode {
        *self.theme.lock().unwrap()
    }

    fn save_theme(&self, theme: ThemeMode) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Rejected("injected write failure".into()));
        }
        *self.theme.lock().unwrap() = theme;
        Ok(())
    }

    fn clear_all(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Rejected("injected write failure".into()));
        }
        self.tasks.lock().unwrap().clear();
        *self.theme.lock().unwrap() = ThemeMode::default();
        Ok(())
    }
}
