use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::model::task::{TaskFilter, TaskSort};

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Filter applied when `list` is run without --filter
    #[serde(default)]
    pub default_filter: TaskFilter,
    /// Sort applied when `list` is run without --sort
    #[serde(default)]
    pub default_sort: TaskSort,
    /// Override for the data directory (default: XDG data dir)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}
