use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single to-do record, the sole persisted entity.
///
/// On the wire this is a JSON object with camelCase keys and RFC-3339
/// timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Opaque unique ID, fixed at creation
    pub id: String,
    /// Short title; validated non-empty before it gets here
    pub title: String,
    /// Optional longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Completion flag
    #[serde(default)]
    pub completed: bool,
    /// Creation instant, fixed at creation
    pub created_at: DateTime<Utc>,
    /// Optional due instant; may be in the past
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl Task {
    /// Create a task from a draft, stamping a fresh ID and creation time.
    pub fn from_draft(draft: TaskDraft) -> Self {
        Task {
            id: generate_id(),
            title: draft.title,
            description: draft.description,
            completed: false,
            created_at: Utc::now(),
            due_date: draft.due_date,
        }
    }

    /// Merge a patch into this task. Unset patch fields keep their prior
    /// values; `id` and `created_at` are not expressible in a patch.
    pub fn apply_patch(&mut self, patch: &TaskPatch) {
        if let Some(ref title) = patch.title {
            self.title = title.clone();
        }
        if let Some(ref description) = patch.description {
            self.description = description.clone();
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
    }
}

/// Input for creating a task: a [`Task`] without `id`/`created_at`.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Field-wise update for a task. `None` leaves a field untouched; the
/// double-`Option` fields can also clear a stored value with `Some(None)`.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl TaskPatch {
    /// True if applying this patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.completed.is_none()
            && self.due_date.is_none()
    }
}

/// Generate a unique task ID: millisecond timestamp plus a random suffix.
pub fn generate_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", millis, &suffix[..9])
}

/// Which tasks the visible list keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TaskFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskFilter::All => "all",
            TaskFilter::Active => "active",
            TaskFilter::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<TaskFilter> {
        match s {
            "all" => Some(TaskFilter::All),
            "active" => Some(TaskFilter::Active),
            "completed" => Some(TaskFilter::Completed),
            _ => None,
        }
    }
}

/// How the visible list is ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskSort {
    /// Most recently created first
    #[default]
    Date,
    /// Soonest due first; tasks without a due date sort last
    DueDate,
    /// Ascending case-folded title
    Alphabetical,
}

impl TaskSort {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskSort::Date => "date",
            TaskSort::DueDate => "due",
            TaskSort::Alphabetical => "alpha",
        }
    }

    pub fn from_str(s: &str) -> Option<TaskSort> {
        match s {
            "date" => Some(TaskSort::Date),
            "due" | "due-date" | "duedate" => Some(TaskSort::DueDate),
            "alpha" | "alphabetical" => Some(TaskSort::Alphabetical),
            _ => None,
        }
    }
}

/// Theme preference, persisted alongside the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    /// Follow the host environment
    #[default]
    Auto,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::Auto => "auto",
        }
    }

    pub fn from_str(s: &str) -> Option<ThemeMode> {
        match s {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            "auto" => Some(ThemeMode::Auto),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> Task {
        Task {
            id: "1700000000000-abc123def".into(),
            title: "Buy milk".into(),
            description: Some("two liters".into()),
            completed: false,
            created_at: "2025-06-01T10:00:00Z".parse().unwrap(),
            due_date: Some("2025-06-03T00:00:00Z".parse().unwrap()),
        }
    }

    #[test]
    fn from_draft_sets_defaults() {
        let task = Task::from_draft(TaskDraft {
            title: "Water plants".into(),
            ..Default::default()
        });
        assert!(!task.completed);
        assert!(task.description.is_none());
        assert!(task.due_date.is_none());
        assert!(!task.id.is_empty());
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
    }

    #[test]
    fn patch_merges_only_set_fields() {
        let mut task = sample_task();
        let before = task.clone();
        task.apply_patch(&TaskPatch {
            title: Some("Buy oat milk".into()),
            ..Default::default()
        });
        assert_eq!(task.title, "Buy oat milk");
        assert_eq!(task.id, before.id);
        assert_eq!(task.created_at, before.created_at);
        assert_eq!(task.description, before.description);
        assert_eq!(task.due_date, before.due_date);
    }

    #[test]
    fn patch_clears_optional_fields() {
        let mut task = sample_task();
        task.apply_patch(&TaskPatch {
            description: Some(None),
            due_date: Some(None),
            ..Default::default()
        });
        assert!(task.description.is_none());
        assert!(task.due_date.is_none());
    }

    #[test]
    fn empty_patch_is_empty() {
        assert!(TaskPatch::default().is_empty());
        assert!(!TaskPatch {
            completed: Some(true),
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn task_serializes_with_camel_case_keys() {
        let json = serde_json::to_string(&sample_task()).unwrap();
        assert!(json.contains("\"createdAt\":\"2025-06-01T10:00:00Z\""));
        assert!(json.contains("\"dueDate\""));
        assert!(!json.contains("\"due_date\""));
    }

    #[test]
    fn task_deserializes_without_optional_fields() {
        let task: Task = serde_json::from_str(
            r#"{"id":"x","title":"t","createdAt":"2025-06-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert!(!task.completed);
        assert!(task.description.is_none());
        assert!(task.due_date.is_none());
    }

    #[test]
    fn theme_mode_round_trips_through_strings() {
        for mode in [ThemeMode::Light, ThemeMode::Dark, ThemeMode::Auto] {
            assert_eq!(ThemeMode::from_str(mode.as_str()), Some(mode));
        }
        assert_eq!(ThemeMode::from_str("solarized"), None);
    }

    #[test]
    fn sort_mode_accepts_aliases() {
        assert_eq!(TaskSort::from_str("due-date"), Some(TaskSort::DueDate));
        assert_eq!(TaskSort::from_str("alphabetical"), Some(TaskSort::Alphabetical));
        assert_eq!(TaskSort::from_str("random"), None);
    }
}
