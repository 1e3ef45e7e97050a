//! Numbered interactive menu over a single in-memory [`TaskService`].
//!
//! The session reads from any `BufRead` and writes to any `Write`, so it runs
//! the same against a terminal or a scripted buffer. End of input at any
//! prompt closes the session.

use crate::render::{self, ListView};
use std::io::{BufRead, Write};
use todo_core::error::AppError;
use todo_core::model::{Task, TaskStatus, validate_title};
use todo_core::task_service::{TaskService, TaskUpdate};
use tracing::debug;

const RULE_WIDTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Quit,
}

enum Selection {
    Task(u64),
    Missing,
    Closed,
}

pub fn run_menu<R, W>(
    service: &mut TaskService,
    view: &ListView,
    input: R,
    output: W,
) -> Result<(), AppError>
where
    R: BufRead,
    W: Write,
{
    MenuSession {
        service,
        view,
        input,
        output,
    }
    .run()
}

struct MenuSession<'a, R, W> {
    service: &'a mut TaskService,
    view: &'a ListView,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> MenuSession<'_, R, W> {
    fn run(&mut self) -> Result<(), AppError> {
        loop {
            self.display_menu()?;
            let Some(choice) = self.read_choice("Enter your choice (1-6): ", 6)? else {
                break;
            };
            debug!(choice, "menu selection");

            let step = match choice {
                1 => self.add_task()?,
                2 => self.view_tasks()?,
                3 => self.update_task()?,
                4 => self.delete_task()?,
                5 => self.toggle_status()?,
                _ => {
                    self.say_goodbye()?;
                    break;
                }
            };

            if step == Step::Quit || self.prompt("\nPress Enter to continue...")?.is_none() {
                break;
            }
        }

        self.output.flush()?;
        Ok(())
    }

    fn display_menu(&mut self) -> Result<(), AppError> {
        let rule = "=".repeat(RULE_WIDTH);
        let title = self.view.palette.accentize("          CLI TODO APPLICATION");
        writeln!(self.output, "{rule}\n{title}\n{rule}\n")?;
        writeln!(self.output, "1. Add Task")?;
        writeln!(self.output, "2. View Tasks")?;
        writeln!(self.output, "3. Update Task")?;
        writeln!(self.output, "4. Delete Task")?;
        writeln!(self.output, "5. Mark Task Complete / Incomplete")?;
        writeln!(self.output, "6. Exit\n")?;
        writeln!(self.output, "{}", "-".repeat(RULE_WIDTH))?;
        Ok(())
    }

    fn say_goodbye(&mut self) -> Result<(), AppError> {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(self.output, "\n{rule}")?;
        writeln!(self.output, "          Thank you for using Todo App!")?;
        writeln!(self.output, "                   Goodbye!")?;
        writeln!(self.output, "{rule}")?;
        Ok(())
    }

    fn heading(&mut self, text: &str) -> Result<(), AppError> {
        let heading = self.view.palette.accentize(&format!("--- {text} ---"));
        writeln!(self.output, "\n{heading}")?;
        Ok(())
    }

    /// Writes `text` and reads one line; `None` once input is exhausted.
    fn prompt(&mut self, text: &str) -> Result<Option<String>, AppError> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn read_choice(&mut self, text: &str, max: u32) -> Result<Option<u32>, AppError> {
        loop {
            let Some(raw) = self.prompt(text)? else {
                return Ok(None);
            };
            match raw.parse::<u32>() {
                Ok(choice) if (1..=max).contains(&choice) => return Ok(Some(choice)),
                Ok(_) => writeln!(
                    self.output,
                    "Invalid choice. Please enter a number between 1 and {max}."
                )?,
                Err(_) => writeln!(self.output, "Invalid input. Please enter a number.")?,
            }
        }
    }

    /// Reads a task id and confirms it exists through the service.
    fn read_task_id(&mut self, text: &str) -> Result<Selection, AppError> {
        loop {
            let Some(raw) = self.prompt(text)? else {
                return Ok(Selection::Closed);
            };
            let digits = raw.strip_prefix('-').unwrap_or(raw.as_str());
            if digits.is_empty() || !digits.chars().all(|ch| ch.is_ascii_digit()) {
                writeln!(self.output, "Invalid input. Please enter a number.")?;
                continue;
            }
            if raw.starts_with('-') || digits.chars().all(|ch| ch == '0') {
                writeln!(self.output, "Task ID must be a positive number.")?;
                continue;
            }

            // Too large for any assigned id.
            let Ok(id) = digits.parse::<u64>() else {
                writeln!(self.output, "Task with ID {digits} not found")?;
                return Ok(Selection::Missing);
            };

            if self.service.get(id).is_none() {
                writeln!(self.output, "{}", AppError::not_found(id).message())?;
                return Ok(Selection::Missing);
            }
            return Ok(Selection::Task(id));
        }
    }

    fn read_title(&mut self) -> Result<Option<String>, AppError> {
        loop {
            let Some(title) = self.prompt("Enter task title: ")? else {
                return Ok(None);
            };
            match validate_title(&title) {
                Ok(()) => return Ok(Some(title)),
                Err(err) => writeln!(self.output, "{}.", err.message())?,
            }
        }
    }

    fn write_task_lines<'t>(
        &mut self,
        tasks: impl IntoIterator<Item = &'t Task>,
        with_mark: bool,
    ) -> Result<(), AppError> {
        for task in tasks {
            if with_mark {
                let mark = render::status_mark(task.status());
                writeln!(self.output, "  {}. [{mark}] {}", task.id(), task.title())?;
            } else {
                writeln!(self.output, "  {}. {}", task.id(), task.title())?;
            }
        }
        Ok(())
    }

    fn add_task(&mut self) -> Result<Step, AppError> {
        self.heading("ADD TASK")?;
        let Some(title) = self.read_title()? else {
            return Ok(Step::Quit);
        };
        let Some(description) =
            self.prompt("Enter task description (optional, press Enter to skip): ")?
        else {
            return Ok(Step::Quit);
        };

        match self.service.add(title, description) {
            Ok(task) => {
                let id = task.id();
                writeln!(self.output, "\nTask added successfully! (ID: {id})")?;
            }
            Err(err) => writeln!(self.output, "\nError: {}", err.message())?,
        }
        Ok(Step::Continue)
    }

    fn view_tasks(&mut self) -> Result<Step, AppError> {
        self.heading("VIEW TASKS")?;
        let tasks = self.service.list();
        if tasks.is_empty() {
            writeln!(self.output, "\nNo tasks found. Add a task to get started!")?;
            return Ok(Step::Continue);
        }

        let table = render::task_table(&tasks, &self.view.for_menu());
        let summary = self
            .view
            .palette
            .mutedize(&render::counts_summary(self.service.counts()));
        writeln!(self.output, "\n{table}\n\n{summary}")?;
        Ok(Step::Continue)
    }

    fn update_task(&mut self) -> Result<Step, AppError> {
        self.heading("UPDATE TASK")?;
        if self.service.is_empty() {
            writeln!(self.output, "\nNo tasks to update. Add a task first!")?;
            return Ok(Step::Continue);
        }

        writeln!(self.output, "\nCurrent tasks:")?;
        let tasks: Vec<Task> = self.service.list().into_iter().cloned().collect();
        self.write_task_lines(&tasks, true)?;

        let id = match self.read_task_id("\nEnter task ID to update: ")? {
            Selection::Task(id) => id,
            Selection::Missing => return Ok(Step::Continue),
            Selection::Closed => return Ok(Step::Quit),
        };

        if let Some(task) = self.service.get(id).cloned() {
            writeln!(self.output, "\nCurrent: {}", task.title())?;
            if !task.description().is_empty() {
                writeln!(self.output, "         {}", task.description())?;
            }
        }

        writeln!(self.output, "\nLeave fields empty to keep current value.")?;
        let Some(title) = self.prompt("Enter new title (or press Enter to keep): ")? else {
            return Ok(Step::Quit);
        };
        let Some(description) =
            self.prompt("Enter new description (or press Enter to keep): ")?
        else {
            return Ok(Step::Quit);
        };

        let changes = TaskUpdate {
            title: Some(title).filter(|value| !value.is_empty()),
            description: Some(description).filter(|value| !value.is_empty()),
        };
        match self.service.update(id, changes) {
            Ok(Some(_)) => writeln!(self.output, "\nTask {id} updated successfully!")?,
            Ok(None) => writeln!(self.output, "\n{}", AppError::not_found(id).message())?,
            Err(err) => writeln!(self.output, "\nError: {}", err.message())?,
        }
        Ok(Step::Continue)
    }

    fn delete_task(&mut self) -> Result<Step, AppError> {
        self.heading("DELETE TASK")?;
        if self.service.is_empty() {
            writeln!(self.output, "\nNo tasks to delete. Add a task first!")?;
            return Ok(Step::Continue);
        }

        writeln!(self.output, "\nCurrent tasks:")?;
        let tasks: Vec<Task> = self.service.list().into_iter().cloned().collect();
        self.write_task_lines(&tasks, true)?;

        let id = match self.read_task_id("\nEnter task ID to delete: ")? {
            Selection::Task(id) => id,
            Selection::Missing => return Ok(Step::Continue),
            Selection::Closed => return Ok(Step::Quit),
        };

        let title = self
            .service
            .get(id)
            .map(|task| task.title().to_string())
            .unwrap_or_default();
        let Some(confirm) = self.prompt(&format!("\nDelete task '{title}'? (y/n): "))? else {
            return Ok(Step::Quit);
        };

        if confirm.eq_ignore_ascii_case("y") {
            if self.service.delete(id) {
                writeln!(self.output, "\nTask {id} deleted successfully!")?;
            } else {
                writeln!(self.output, "\nError: Could not delete task {id}.")?;
            }
        }
        Ok(Step::Continue)
    }

    fn toggle_status(&mut self) -> Result<Step, AppError> {
        loop {
            self.heading("MARK TASK STATUS")?;
            writeln!(self.output, "1. Mark task as complete")?;
            writeln!(self.output, "2. Mark task as incomplete")?;
            writeln!(self.output, "3. Back to main menu")?;

            let Some(raw) = self.prompt("\nEnter choice (1-3): ")? else {
                return Ok(Step::Quit);
            };
            match raw.parse::<u32>() {
                Ok(1) => return self.change_status(TaskStatus::Complete),
                Ok(2) => return self.change_status(TaskStatus::Incomplete),
                Ok(3) => return Ok(Step::Continue),
                Ok(_) => writeln!(self.output, "Invalid choice. Please enter 1, 2, or 3.")?,
                Err(_) => writeln!(self.output, "Invalid input. Please enter a number.")?,
            }
        }
    }

    fn change_status(&mut self, target: TaskStatus) -> Result<Step, AppError> {
        let (heading, listing, none_left) = match target {
            TaskStatus::Complete => (
                "MARK TASK COMPLETE",
                "Incomplete tasks:",
                "All tasks are already complete!",
            ),
            TaskStatus::Incomplete => (
                "MARK TASK INCOMPLETE",
                "Complete tasks:",
                "No complete tasks to mark as incomplete!",
            ),
        };
        self.heading(heading)?;

        if self.service.is_empty() {
            writeln!(self.output, "\nNo tasks. Add a task first!")?;
            return Ok(Step::Continue);
        }

        let candidates: Vec<Task> = self
            .service
            .list()
            .into_iter()
            .filter(|task| task.status() != target)
            .cloned()
            .collect();
        if candidates.is_empty() {
            writeln!(self.output, "\n{none_left}")?;
            return Ok(Step::Continue);
        }

        writeln!(self.output, "\n{listing}")?;
        self.write_task_lines(&candidates, false)?;

        let id = match self.read_task_id(&format!("\nEnter task ID to mark as {target}: "))? {
            Selection::Task(id) => id,
            Selection::Missing => return Ok(Step::Continue),
            Selection::Closed => return Ok(Step::Quit),
        };

        if self.service.get(id).map(Task::status) == Some(target) {
            writeln!(self.output, "\nTask {id} is already {target}.")?;
            return Ok(Step::Continue);
        }

        let changed = match target {
            TaskStatus::Complete => self.service.mark_complete(id).is_some(),
            TaskStatus::Incomplete => self.service.mark_incomplete(id).is_some(),
        };
        if changed {
            let mark = render::status_mark(target);
            writeln!(self.output, "\nTask {id} marked as {target}! {mark}")?;
        }
        Ok(Step::Continue)
    }
}
