use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::capture::{ReaderSource, ScriptedSource, TranscriptSource};
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::json_store::{self, JsonStore};
use crate::io::lock::DirLock;
use crate::io::storage::Storage;
use crate::model::{AppConfig, TaskDraft, TaskFilter, TaskPatch, TaskSort, ThemeMode};
use crate::ops::{segment, validate, view};
use crate::store::TaskRepository;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;
    let config = config_io::read_config()?;
    let data_dir = resolve_data_dir(cli.data_dir.as_deref(), &config);

    match cli.command {
        // Write commands
        Commands::Add(args) => cmd_add(args, &data_dir, json),
        Commands::Edit(args) => cmd_edit(args, &data_dir),
        Commands::Toggle(args) => cmd_toggle(args, &data_dir),
        Commands::Rm(args) => cmd_rm(args, &data_dir),
        Commands::Clear => cmd_clear(&data_dir),
        Commands::Dictate(args) => cmd_dictate(args, &data_dir, json),

        // Read commands
        Commands::List(args) => cmd_list(args, &data_dir, &config, json),
        Commands::Show(args) => cmd_show(args, &data_dir, json),
        Commands::Stats(args) => cmd_stats(args, &data_dir, json),

        // Preferences and maintenance
        Commands::Theme(args) => cmd_theme(args, &data_dir, json),
        Commands::Reset(args) => cmd_reset(args, &data_dir),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Precedence: -C flag, then config.toml, then the XDG default.
fn resolve_data_dir(flag: Option<&str>, config: &AppConfig) -> PathBuf {
    match flag {
        Some(dir) => PathBuf::from(dir),
        None => config
            .data_dir
            .clone()
            .unwrap_or_else(json_store::default_data_dir),
    }
}

/// Open the store and load the repository without taking the lock.
/// Read-only commands derive views from this snapshot.
fn open_repository(data_dir: &Path) -> Result<TaskRepository<JsonStore>, Box<dyn std::error::Error>> {
    let store = JsonStore::open(data_dir)?;
    let repo = TaskRepository::new(store);
    repo.load_tasks();
    Ok(repo)
}

/// Open the store under the directory lock, so the whole
/// load-mutate-persist cycle is serialized against other processes.
fn open_repository_locked(
    data_dir: &Path,
) -> Result<(DirLock, TaskRepository<JsonStore>), Box<dyn std::error::Error>> {
    let store = JsonStore::open(data_dir)?;
    let lock = DirLock::acquire_default(data_dir)?;
    let repo = TaskRepository::new(store);
    repo.load_tasks();
    Ok((lock, repo))
}

/// Accepts YYYY-MM-DD (read as midnight UTC) or a full RFC-3339 instant.
fn parse_due_date(s: &str) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| format!("invalid due date '{}': use YYYY-MM-DD or RFC-3339", s).into())
}

fn parse_filter(s: &str) -> Result<TaskFilter, String> {
    TaskFilter::from_str(s)
        .ok_or_else(|| format!("unknown filter: {} (expected all, active, or completed)", s))
}

fn parse_sort(s: &str) -> Result<TaskSort, String> {
    TaskSort::from_str(s).ok_or_else(|| format!("unknown sort: {} (expected date, due, or alpha)", s))
}

fn parse_theme(s: &str) -> Result<ThemeMode, String> {
    ThemeMode::from_str(s)
        .ok_or_else(|| format!("unknown theme: {} (expected light, dark, or auto)", s))
}

/// Error out early so unknown IDs read as a user mistake instead of a
/// silent no-op.
fn require_task(repo: &TaskRepository<JsonStore>, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    if repo.find_task(id).is_none() {
        return Err(format!("task not found: {}", id).into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, data_dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    // The validation gate runs before anything reaches the repository
    let title = validate::validate_title(&args.title)?;
    let description = match args.desc.as_deref() {
        Some(d) => validate::validate_description(d)?,
        None => None,
    };
    let due_date = args.due.as_deref().map(parse_due_date).transpose()?;

    let (_lock, repo) = open_repository_locked(data_dir)?;
    let task = repo.add_task(TaskDraft {
        title,
        description,
        due_date,
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(&task))?);
    } else {
        println!("{}", task.id);
    }
    Ok(())
}

fn cmd_edit(args: EditArgs, data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut patch = TaskPatch::default();
    if let Some(ref title) = args.title {
        patch.title = Some(validate::validate_title(title)?);
    }
    if args.clear_desc {
        patch.description = Some(None);
    } else if let Some(ref desc) = args.desc {
        patch.description = Some(validate::validate_description(desc)?);
    }
    if args.clear_due {
        patch.due_date = Some(None);
    } else if let Some(ref due) = args.due {
        patch.due_date = Some(Some(parse_due_date(due)?));
    }
    if patch.is_empty() {
        return Err(
            "nothing to change (pass --title, --desc, --due, --clear-desc, or --clear-due)".into(),
        );
    }

    let (_lock, repo) = open_repository_locked(data_dir)?;
    require_task(&repo, &args.id)?;
    repo.update_task(&args.id, patch)?;
    println!("updated {}", args.id);
    Ok(())
}

fn cmd_toggle(args: ToggleArgs, data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (_lock, repo) = open_repository_locked(data_dir)?;
    require_task(&repo, &args.id)?;
    repo.toggle_task(&args.id)?;

    match repo.find_task(&args.id) {
        Some(task) if task.completed => println!("completed {}", args.id),
        _ => println!("reopened {}", args.id),
    }
    Ok(())
}

fn cmd_rm(args: RmArgs, data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (_lock, repo) = open_repository_locked(data_dir)?;
    require_task(&repo, &args.id)?;
    repo.delete_task(&args.id)?;
    println!("deleted {}", args.id);
    Ok(())
}

fn cmd_clear(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (_lock, repo) = open_repository_locked(data_dir)?;
    let removed = repo.clear_completed()?;
    println!(
        "cleared {} completed task{}",
        removed,
        if removed == 1 { "" } else { "s" }
    );
    Ok(())
}

fn cmd_dictate(
    args: DictateArgs,
    data_dir: &Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut source: Box<dyn TranscriptSource> = if args.text.is_empty() {
        Box::new(ReaderSource::new(io::stdin().lock()))
    } else {
        Box::new(ScriptedSource::new(args.text.join(" ")))
    };

    // A cancelled capture performs no mutation at all
    let utterance = match source.capture()? {
        Some(utterance) => utterance,
        None => {
            println!("no speech detected");
            return Ok(());
        }
    };

    let titles = segment::segment_transcript(&utterance);
    if titles.is_empty() {
        println!("no speech detected");
        return Ok(());
    }

    // Validate every draft before the first create, so an oversized
    // fragment aborts the whole batch instead of half-applying it
    let mut drafts = Vec::new();
    for title in titles {
        drafts.push(TaskDraft {
            title: validate::validate_title(&title)?,
            ..Default::default()
        });
    }

    let (_lock, repo) = open_repository_locked(data_dir)?;
    let mut created = Vec::new();
    for draft in drafts {
        created.push(repo.add_task(draft)?);
    }

    if json {
        let out: Vec<TaskJson> = created.iter().map(task_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!(
            "added {} task{}",
            created.len(),
            if created.len() == 1 { "" } else { "s" }
        );
        for task in &created {
            println!("  {} {}", task.id, task.title);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_list(
    args: ListArgs,
    data_dir: &Path,
    config: &AppConfig,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let filter = match args.filter.as_deref() {
        Some(s) => parse_filter(s)?,
        None => config.default_filter,
    };
    let sort = match args.sort.as_deref() {
        Some(s) => parse_sort(s)?,
        None => config.default_sort,
    };
    let query = args.search.as_deref().unwrap_or("");

    let repo = open_repository(data_dir)?;
    let visible = view::visible_tasks(&repo.tasks(), filter, query, sort);

    if json {
        let out: Vec<TaskJson> = visible.iter().map(task_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if visible.is_empty() {
        println!("no tasks");
    } else {
        for line in format_task_list(&visible) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_show(args: ShowArgs, data_dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let repo = open_repository(data_dir)?;
    let task = repo
        .find_task(&args.id)
        .ok_or_else(|| format!("task not found: {}", args.id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(&task))?);
    } else {
        for line in format_task_detail(&task) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_stats(args: StatsArgs, data_dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = JsonStore::open(data_dir)?;
    let info = args.storage.then(|| store.storage_info());
    let repo = TaskRepository::new(store);
    repo.load_tasks();
    let stats = view::task_stats(&repo.tasks());

    if json {
        let report = StatsReportJson {
            stats: stats_to_json(&stats),
            storage: info.as_ref().map(storage_info_to_json),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for line in format_stats(&stats) {
            println!("{}", line);
        }
        if let Some(ref info) = info {
            for line in format_storage_info(info) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Preferences and maintenance
// ---------------------------------------------------------------------------

fn cmd_theme(args: ThemeArgs, data_dir: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = JsonStore::open(data_dir)?;
    match args.mode.as_deref() {
        None => {
            let mode = store.load_theme();
            if json {
                println!("{}", serde_json::to_string_pretty(&theme_to_json(mode))?);
            } else {
                println!("{}", mode.as_str());
            }
        }
        Some(s) => {
            let mode = parse_theme(s)?;
            store.save_theme(mode)?;
            println!("theme set to {}", mode.as_str());
        }
    }
    Ok(())
}

fn cmd_reset(args: ResetArgs, data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !args.yes {
        print!("delete all slate data in {}? [y/N] ", data_dir.display());
        io::stdout().flush()?;
        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            println!("aborted");
            return Ok(());
        }
    }

    let store = JsonStore::open(data_dir)?;
    let _lock = DirLock::acquire_default(data_dir)?;
    store.clear_all()?;
    println!("cleared all data in {}", data_dir.display());
    Ok(())
}
