pub mod config;
pub mod error;
pub mod model;
pub mod shared;
pub mod task_service;

pub use error::AppError;
pub use model::{Task, TaskStatus};
pub use shared::SharedTaskService;
pub use task_service::{StatusCounts, TaskService, TaskUpdate};
