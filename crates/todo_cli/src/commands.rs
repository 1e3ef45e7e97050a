use crate::cli::Command;
use crate::render::{self, ListView};
use std::io::Write;
use todo_core::error::AppError;
use todo_core::model::Task;
use todo_core::task_service::{TaskService, TaskUpdate};

/// How results are written to the output stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

/// Runs one command against `service`, writing its success output to `out`.
///
/// Validation failures and missing tasks come back as errors; the caller
/// reports them and picks the exit code.
pub fn run_command<W: Write>(
    service: &mut TaskService,
    command: Command,
    format: OutputFormat,
    view: &ListView,
    out: &mut W,
) -> Result<(), AppError> {
    match command {
        Command::Add { title, description } => {
            let task = service.add(title, description.unwrap_or_default())?;
            write_task(out, format, task, |task| {
                format!("Task added successfully (ID: {})", task.id())
            })?;
        }
        Command::List => {
            let tasks = service.list();
            match format {
                OutputFormat::Json => writeln!(out, "{}", render::tasks_json(&tasks))?,
                OutputFormat::Text if tasks.is_empty() => writeln!(
                    out,
                    "{}",
                    view.palette
                        .mutedize("No tasks found. Add a task with 'todo add <title>'")
                )?,
                OutputFormat::Text => writeln!(out, "{}", render::task_table(&tasks, view))?,
            }
        }
        Command::Update {
            id,
            title,
            description,
        } => {
            let changes = TaskUpdate { title, description };
            if changes.is_empty() {
                return Err(AppError::invalid_input(
                    "must specify --title and/or --description",
                ));
            }
            let task = service
                .update(id, changes)?
                .ok_or_else(|| AppError::not_found(id))?;
            write_task(out, format, task, |task| {
                format!("Task {} updated successfully.", task.id())
            })?;
        }
        Command::Delete { id } => {
            if !service.delete(id) {
                return Err(AppError::not_found(id));
            }
            match format {
                OutputFormat::Json => writeln!(
                    out,
                    "{}",
                    serde_json::json!({ "id": id, "deleted": true })
                )?,
                OutputFormat::Text => writeln!(out, "Task {id} deleted successfully.")?,
            }
        }
        Command::Complete { id } => {
            let task = service
                .mark_complete(id)
                .ok_or_else(|| AppError::not_found(id))?;
            write_task(out, format, task, |task| {
                format!("Task {} marked as complete.", task.id())
            })?;
        }
        Command::Incomplete { id } => {
            let task = service
                .mark_incomplete(id)
                .ok_or_else(|| AppError::not_found(id))?;
            write_task(out, format, task, |task| {
                format!("Task {} marked as incomplete.", task.id())
            })?;
        }
    }

    Ok(())
}

fn write_task<W, F>(out: &mut W, format: OutputFormat, task: &Task, text: F) -> Result<(), AppError>
where
    W: Write,
    F: FnOnce(&Task) -> String,
{
    match format {
        OutputFormat::Json => writeln!(out, "{}", render::task_json(task))?,
        OutputFormat::Text => writeln!(out, "{}", text(task))?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{OutputFormat, run_command};
    use crate::cli::Command;
    use crate::render::ListView;
    use todo_core::model::TaskStatus;
    use todo_core::task_service::TaskService;

    fn run(service: &mut TaskService, command: Command, format: OutputFormat) -> String {
        let mut out = Vec::new();
        run_command(service, command, format, &ListView::default(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn seeded() -> TaskService {
        let mut service = TaskService::new();
        service.add("Buy milk", "").unwrap();
        service.add("Walk dog", "around the park").unwrap();
        service
    }

    #[test]
    fn add_reports_new_id() {
        let mut service = seeded();
        let output = run(
            &mut service,
            Command::Add {
                title: "Call mom".into(),
                description: Some("Sunday".into()),
            },
            OutputFormat::Text,
        );

        assert_eq!(output, "Task added successfully (ID: 3)\n");
        assert_eq!(service.get(3).unwrap().description(), "Sunday");
    }

    #[test]
    fn add_rejects_blank_title() {
        let mut service = TaskService::new();
        let mut out = Vec::new();
        let err = run_command(
            &mut service,
            Command::Add {
                title: String::new(),
                description: None,
            },
            OutputFormat::Text,
            &ListView::default(),
            &mut out,
        )
        .unwrap_err();

        assert_eq!(err.code(), "invalid_input");
        assert!(out.is_empty());
        assert!(service.is_empty());
    }

    #[test]
    fn list_reports_empty_store() {
        let mut service = TaskService::new();
        let output = run(&mut service, Command::List, OutputFormat::Text);
        assert!(output.contains("No tasks found"));
    }

    #[test]
    fn list_json_outputs_array() {
        let mut service = seeded();
        let output = run(&mut service, Command::List, OutputFormat::Json);

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[1]["description"], "around the park");
    }

    #[test]
    fn update_requires_a_field() {
        let mut service = seeded();
        let mut out = Vec::new();
        let err = run_command(
            &mut service,
            Command::Update {
                id: 1,
                title: None,
                description: None,
            },
            OutputFormat::Text,
            &ListView::default(),
            &mut out,
        )
        .unwrap_err();

        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn update_reports_missing_task() {
        let mut service = seeded();
        let mut out = Vec::new();
        let err = run_command(
            &mut service,
            Command::Update {
                id: 999,
                title: Some("x".into()),
                description: None,
            },
            OutputFormat::Text,
            &ListView::default(),
            &mut out,
        )
        .unwrap_err();

        assert_eq!(err.code(), "not_found");
        assert!(err.message().contains("999"));
    }

    #[test]
    fn update_json_prints_task_fields() {
        let mut service = seeded();
        let output = run(
            &mut service,
            Command::Update {
                id: 1,
                title: Some("Buy oat milk".into()),
                description: None,
            },
            OutputFormat::Json,
        );

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["title"], "Buy oat milk");
        assert_eq!(parsed["status"], "incomplete");
    }

    #[test]
    fn delete_and_status_commands_report_success() {
        let mut service = seeded();

        let output = run(&mut service, Command::Complete { id: 2 }, OutputFormat::Text);
        assert_eq!(output, "Task 2 marked as complete.\n");
        assert_eq!(service.get(2).unwrap().status(), TaskStatus::Complete);

        let output = run(&mut service, Command::Incomplete { id: 2 }, OutputFormat::Text);
        assert_eq!(output, "Task 2 marked as incomplete.\n");

        let output = run(&mut service, Command::Delete { id: 1 }, OutputFormat::Text);
        assert_eq!(output, "Task 1 deleted successfully.\n");
        assert!(service.get(1).is_none());
    }

    #[test]
    fn delete_missing_task_is_not_found() {
        let mut service = seeded();
        let mut out = Vec::new();
        let err = run_command(
            &mut service,
            Command::Delete { id: 7 },
            OutputFormat::Text,
            &ListView::default(),
            &mut out,
        )
        .unwrap_err();

        assert_eq!(err.code(), "not_found");
    }
}
