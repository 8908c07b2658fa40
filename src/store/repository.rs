use std::sync::Mutex;

use log::warn;

use crate::io::storage::{Storage, StorageError};
use crate::model::{Task, TaskDraft, TaskPatch};

/// The authoritative in-memory task list, mirrored to a [`Storage`].
///
/// Every mutation applies in memory first, then persists the full
/// collection. When the durable write fails, the in-memory change is
/// rolled back to exactly its pre-call state and the error is returned to
/// the caller. The state mutex is held across the write, so the persisted
/// snapshot always equals the in-memory state at write time even when
/// callers overlap; the last write to complete determines the durable
/// value.
pub struct TaskRepository<S: Storage> {
    storage: S,
    state: Mutex<RepoState>,
}

#[derive(Default)]
struct RepoState {
    /// Newest-created first
    tasks: Vec<Task>,
    /// True only while the initial load is in flight
    loading: bool,
}

impl<S: Storage> TaskRepository<S> {
    pub fn new(storage: S) -> TaskRepository<S> {
        TaskRepository {
            storage,
            state: Mutex::new(RepoState::default()),
        }
    }

    /// Replace in-memory state with the stored task list.
    ///
    /// A load failure is logged and reads as an empty list; a fresh store
    /// and a broken one are indistinguishable here.
    pub fn load_tasks(&self) {
        let mut state = self.state.lock().unwrap();
        state.loading = true;
        state.tasks = match self.storage.load_tasks() {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!("failed to load tasks: {}", e);
                Vec::new()
            }
        };
        state.loading = false;
    }

    /// Create a task from `draft` and prepend it, making it the most
    /// recent entry regardless of any due date. Returns the created task.
    pub fn add_task(&self, draft: TaskDraft) -> Result<Task, StorageError> {
        let task = Task::from_draft(draft);
        let created = task.clone();
        self.mutate(move |tasks| tasks.insert(0, task))?;
        Ok(created)
    }

    /// Shallow-merge `patch` into the task with `id`. An unknown id is a
    /// no-op that still persists the (unchanged) collection.
    pub fn update_task(&self, id: &str, patch: TaskPatch) -> Result<(), StorageError> {
        self.mutate(|tasks| {
            if let Some(task) = tasks.iter_mut().find(|t| t.id == id) {
                task.apply_patch(&patch);
            }
        })
    }

    /// Remove the task with `id` if present.
    pub fn delete_task(&self, id: &str) -> Result<(), StorageError> {
        self.mutate(|tasks| tasks.retain(|t| t.id != id))
    }

    /// Flip the completed flag on the task with `id` if present.
    pub fn toggle_task(&self, id: &str) -> Result<(), StorageError> {
        self.mutate(|tasks| {
            if let Some(task) = tasks.iter_mut().find(|t| t.id == id) {
                task.completed = !task.completed;
            }
        })
    }

    /// Remove every completed task in one persisted operation. Returns
    /// how many were removed.
    pub fn clear_completed(&self) -> Result<usize, StorageError> {
        let mut removed = 0;
        self.mutate(|tasks| {
            let before = tasks.len();
            tasks.retain(|t| !t.completed);
            removed = before - tasks.len();
        })?;
        Ok(removed)
    }

    /// Snapshot of the current task list.
    pub fn tasks(&self) -> Vec<Task> {
        self.state.lock().unwrap().tasks.clone()
    }

    /// Snapshot of one task by id.
    pub fn find_task(&self, id: &str) -> Option<Task> {
        self.state
            .lock()
            .unwrap()
            .tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }

    /// True while the initial load is running.
    pub fn loading(&self) -> bool {
        self.state.lock().unwrap().loading
    }

    /// Apply a change to the task list, then persist the result. The lock
    /// is held across the durable write; on failure the list is restored
    /// to its exact pre-call state and the error propagates.
    fn mutate<F>(&self, apply: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut Vec<Task>),
    {
        let mut state = self.state.lock().unwrap();
        let before = state.tasks.clone();
        apply(&mut state.tasks);
        match self.storage.save_tasks(&state.tasks) {
            Ok(()) => Ok(()),
            Err(e) => {
                state.tasks = before;
                Err(e)
            }
        }
    }
}
