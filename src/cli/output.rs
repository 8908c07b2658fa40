use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::io::json_store::StorageInfo;
use crate::model::{Task, ThemeMode};
use crate::ops::view::{self, TaskStats};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub overdue: bool,
}

#[derive(Serialize)]
pub struct StatsJson {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub overdue: usize,
}

#[derive(Serialize)]
pub struct StatsReportJson {
    #[serde(flatten)]
    pub stats: StatsJson,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageInfoJson>,
}

#[derive(Serialize)]
pub struct StorageInfoJson {
    pub dir: String,
    pub files: Vec<StorageFileJson>,
}

#[derive(Serialize)]
pub struct StorageFileJson {
    pub name: String,
    pub size: u64,
}

#[derive(Serialize)]
pub struct ThemeJson {
    pub theme: &'static str,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        id: task.id.clone(),
        title: task.title.clone(),
        description: task.description.clone(),
        completed: task.completed,
        created_at: task.created_at.to_rfc3339(),
        due_date: task.due_date.map(|d| d.to_rfc3339()),
        overdue: view::is_overdue(task),
    }
}

pub fn stats_to_json(stats: &TaskStats) -> StatsJson {
    StatsJson {
        total: stats.total,
        active: stats.active,
        completed: stats.completed,
        overdue: stats.overdue,
    }
}

pub fn storage_info_to_json(info: &StorageInfo) -> StorageInfoJson {
    StorageInfoJson {
        dir: info.dir.display().to_string(),
        files: info
            .files
            .iter()
            .map(|(name, size)| StorageFileJson {
                name: name.clone(),
                size: *size,
            })
            .collect(),
    }
}

pub fn theme_to_json(mode: ThemeMode) -> ThemeJson {
    ThemeJson {
        theme: mode.as_str(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Format a single task as a one-line summary. `title_width` pads the
/// title column so due dates line up across a list.
pub fn format_task_line(task: &Task, title_width: usize) -> String {
    let mark = if task.completed { 'x' } else { ' ' };
    let pad = " ".repeat(title_width.saturating_sub(task.title.width()));
    let mut line = format!("[{}] {} {}{}", mark, task.id, task.title, pad);
    if let Some(due) = task.due_date {
        line.push_str(&format!("  due {}", due.format("%Y-%m-%d")));
        if view::is_overdue(task) {
            line.push_str("  (overdue)");
        }
    }
    line.trim_end().to_string()
}

/// Format a task list with aligned columns
pub fn format_task_list(tasks: &[Task]) -> Vec<String> {
    let title_width = tasks.iter().map(|t| t.title.width()).max().unwrap_or(0);
    tasks
        .iter()
        .map(|t| format_task_line(t, title_width))
        .collect()
}

/// Format detailed task view
pub fn format_task_detail(task: &Task) -> Vec<String> {
    let mut lines = vec![
        task.title.clone(),
        format!("  id:       {}", task.id),
        format!(
            "  status:   {}",
            if task.completed { "completed" } else { "open" }
        ),
        format!("  created:  {}", task.created_at.format("%Y-%m-%d %H:%M UTC")),
    ];
    if let Some(due) = task.due_date {
        let overdue = if view::is_overdue(task) { "  (overdue)" } else { "" };
        lines.push(format!("  due:      {}{}", due.format("%Y-%m-%d"), overdue));
    }
    if let Some(ref description) = task.description {
        lines.push(format!("  note:     {}", description));
    }
    lines
}

/// Format the stats block
pub fn format_stats(stats: &TaskStats) -> Vec<String> {
    vec![
        format!("total      {}", stats.total),
        format!("active     {}", stats.active),
        format!("completed  {}", stats.completed),
        format!("overdue    {}", stats.overdue),
    ]
}

/// Format the storage report for `stats --storage`
pub fn format_storage_info(info: &StorageInfo) -> Vec<String> {
    let mut lines = vec![format!("data dir   {}", info.dir.display())];
    if info.files.is_empty() {
        lines.push("           (nothing stored yet)".to_string());
    }
    for (name, size) in &info.files {
        lines.push(format!("           {}  {} bytes", name, size));
    }
    lines
}
