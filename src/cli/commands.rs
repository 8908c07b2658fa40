use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "slate", about = concat!("slate v", env!("CARGO_PKG_VERSION"), " - your tasks stay on this machine"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different data directory
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task
    Add(AddArgs),
    /// List tasks
    List(ListArgs),
    /// Show task details
    Show(ShowArgs),
    /// Edit a task's fields
    Edit(EditArgs),
    /// Toggle a task between open and completed
    Toggle(ToggleArgs),
    /// Delete a task
    Rm(RmArgs),
    /// Remove all completed tasks
    Clear,
    /// Show task statistics
    Stats(StatsArgs),
    /// Split a dictated utterance into tasks and add them all
    Dictate(DictateArgs),
    /// Show or set the theme preference
    Theme(ThemeArgs),
    /// Delete all stored data
    Reset(ResetArgs),
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
    /// Longer description
    #[arg(long)]
    pub desc: Option<String>,
    /// Due date (YYYY-MM-DD or RFC-3339)
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: String,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New description
    #[arg(long, conflicts_with = "clear_desc")]
    pub desc: Option<String>,
    /// Remove the description
    #[arg(long)]
    pub clear_desc: bool,
    /// New due date (YYYY-MM-DD or RFC-3339)
    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<String>,
    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,
}

#[derive(Args)]
pub struct ToggleArgs {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct RmArgs {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct DictateArgs {
    /// Utterance text (if omitted, one line is read from stdin)
    pub text: Vec<String>,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Filter by status (all, active, completed)
    #[arg(long)]
    pub filter: Option<String>,
    /// Case-insensitive search over title and description
    #[arg(long)]
    pub search: Option<String>,
    /// Sort order (date, due, alpha)
    #[arg(long)]
    pub sort: Option<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Task ID to show
    pub id: String,
}

#[derive(Args)]
pub struct StatsArgs {
    /// Also report where data lives on disk
    #[arg(long)]
    pub storage: bool,
}

// ---------------------------------------------------------------------------
// Preferences and maintenance
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ThemeArgs {
    /// New mode (light, dark, auto); omit to show the current one
    pub mode: Option<String>,
}

#[derive(Args)]
pub struct ResetArgs {
    /// Skip confirmation prompt
    #[arg(long)]
    pub yes: bool,
}
