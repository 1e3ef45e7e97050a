//! Thread-safe handle around a [`TaskService`].
//!
//! Each call takes the lock once and holds it for the whole operation, so the
//! read-counter/insert/increment sequence of `add` cannot interleave.

use crate::error::AppError;
use crate::model::Task;
use crate::task_service::{StatusCounts, TaskService, TaskUpdate};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Default)]
pub struct SharedTaskService {
    inner: Arc<Mutex<TaskService>>,
}

impl SharedTaskService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_service(service: TaskService) -> Self {
        Self {
            inner: Arc::new(Mutex::new(service)),
        }
    }

    pub fn add<T, D>(&self, title: T, description: D) -> Result<Task, AppError>
    where
        T: Into<String>,
        D: Into<String>,
    {
        self.lock().add(title, description).cloned()
    }

    pub fn list(&self) -> Vec<Task> {
        self.lock().list().into_iter().cloned().collect()
    }

    pub fn get(&self, id: u64) -> Option<Task> {
        self.lock().get(id).cloned()
    }

    pub fn update(&self, id: u64, changes: TaskUpdate) -> Result<Option<Task>, AppError> {
        Ok(self.lock().update(id, changes)?.cloned())
    }

    pub fn delete(&self, id: u64) -> bool {
        self.lock().delete(id)
    }

    pub fn mark_complete(&self, id: u64) -> Option<Task> {
        self.lock().mark_complete(id).cloned()
    }

    pub fn mark_incomplete(&self, id: u64) -> Option<Task> {
        self.lock().mark_incomplete(id).cloned()
    }

    pub fn counts(&self) -> StatusCounts {
        self.lock().counts()
    }

    // Every operation is all-or-nothing, so state behind a poisoned lock is
    // still consistent.
    fn lock(&self) -> MutexGuard<'_, TaskService> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
