use serde_json::Value;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use todo_core::config::{Config, Palette};
use todo_core::model::{Task, TaskStatus};
use todo_core::task_service::StatusCounts;

/// Description column cap for the interactive menu's task view.
pub const MENU_DESCRIPTION_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLabels {
    /// `complete` / `incomplete`
    Plain,
    /// `[Complete]` / `[Incomplete]`
    Bracketed,
}

/// Display settings for task tables, derived from the loaded config.
#[derive(Debug, Clone)]
pub struct ListView {
    pub title_width: usize,
    pub description_width: usize,
    pub status_labels: StatusLabels,
    pub palette: Palette,
}

impl ListView {
    pub fn from_config(config: &Config) -> Self {
        Self {
            title_width: config.title_width,
            description_width: config.description_width,
            status_labels: StatusLabels::Plain,
            palette: config.palette(),
        }
    }

    /// Settings for the menu's view: bracketed labels and a narrower
    /// description column, never wider than the configured one.
    pub fn for_menu(&self) -> Self {
        Self {
            description_width: self.description_width.min(MENU_DESCRIPTION_WIDTH),
            status_labels: StatusLabels::Bracketed,
            ..self.clone()
        }
    }
}

impl Default for ListView {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Description")]
    description: String,
}

pub fn status_label(status: TaskStatus, labels: StatusLabels) -> &'static str {
    match (labels, status) {
        (StatusLabels::Plain, _) => status.as_str(),
        (StatusLabels::Bracketed, TaskStatus::Complete) => "[Complete]",
        (StatusLabels::Bracketed, TaskStatus::Incomplete) => "[Incomplete]",
    }
}

pub fn status_mark(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Complete => "✔",
        TaskStatus::Incomplete => "✖",
    }
}

/// Cuts `text` to `width` characters, ending in `..` when shortened.
pub fn truncate_title(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(2)).collect();
    format!("{kept}..")
}

pub fn truncate_description(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

pub fn task_table(tasks: &[&Task], view: &ListView) -> String {
    let rows = tasks.iter().map(|task| TaskRow {
        id: task.id(),
        status: status_label(task.status(), view.status_labels),
        title: truncate_title(task.title(), view.title_width),
        description: truncate_description(task.description(), view.description_width),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    table.to_string()
}

pub fn counts_summary(counts: StatusCounts) -> String {
    format!(
        "Total tasks: {}\n  - Complete: {}\n  - Incomplete: {}",
        counts.total, counts.complete, counts.incomplete
    )
}

pub fn task_json(task: &Task) -> Value {
    Value::Object(task.to_fields())
}

pub fn tasks_json(tasks: &[&Task]) -> Value {
    Value::Array(tasks.iter().map(|task| task_json(task)).collect())
}
