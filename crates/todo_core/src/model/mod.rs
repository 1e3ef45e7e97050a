mod task;

pub use task::{MAX_TITLE_LENGTH, MIN_TITLE_LENGTH, Task, TaskStatus, validate_title};
