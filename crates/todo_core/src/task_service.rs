use crate::error::AppError;
use crate::model::{Task, TaskStatus};
use std::collections::BTreeMap;
use tracing::debug;

/// Fields to change on an existing task. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl TaskUpdate {
    pub fn title<T: Into<String>>(mut self, title: T) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description<D: Into<String>>(mut self, description: D) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: usize,
    pub complete: usize,
    pub incomplete: usize,
}

/// In-memory task repository. Identifiers start at 1 and are never reused.
#[derive(Debug)]
pub struct TaskService {
    tasks: BTreeMap<u64, Task>,
    next_id: u64,
}

impl Default for TaskService {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskService {
    pub fn new() -> Self {
        Self {
            tasks: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn add<T, D>(&mut self, title: T, description: D) -> Result<&Task, AppError>
    where
        T: Into<String>,
        D: Into<String>,
    {
        let id = self.next_id;
        let task = Task::with_details(id, title, description, TaskStatus::Incomplete)?;
        self.next_id += 1;
        debug!(task_id = id, "task added");

        let stored: &Task = self.tasks.entry(id).or_insert(task);
        Ok(stored)
    }

    /// All tasks, ascending by identifier.
    pub fn list(&self) -> Vec<&Task> {
        self.tasks.values().collect()
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.get(&id)
    }

    /// Applies `changes` to the task with `id`.
    ///
    /// Returns `Ok(None)` when no such task exists. A rejected title leaves
    /// every field of the task as it was.
    pub fn update(&mut self, id: u64, changes: TaskUpdate) -> Result<Option<&Task>, AppError> {
        let Some(task) = self.tasks.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            task.set_title(title)?;
        }
        if let Some(description) = changes.description {
            task.set_description(description);
        }
        debug!(task_id = id, "task updated");

        Ok(Some(&*task))
    }

    pub fn delete(&mut self, id: u64) -> bool {
        let removed = self.tasks.remove(&id).is_some();
        if removed {
            debug!(task_id = id, "task deleted");
        }
        removed
    }

    pub fn mark_complete(&mut self, id: u64) -> Option<&Task> {
        self.set_status(id, TaskStatus::Complete)
    }

    pub fn mark_incomplete(&mut self, id: u64) -> Option<&Task> {
        self.set_status(id, TaskStatus::Incomplete)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn counts(&self) -> StatusCounts {
        let complete = self.tasks.values().filter(|task| task.is_complete()).count();
        StatusCounts {
            total: self.tasks.len(),
            complete,
            incomplete: self.tasks.len() - complete,
        }
    }

    fn set_status(&mut self, id: u64, status: TaskStatus) -> Option<&Task> {
        let task = self.tasks.get_mut(&id)?;
        task.set_status(status);
        debug!(task_id = id, %status, "task status changed");
        Some(&*task)
    }
}
