use crate::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

pub const MIN_TITLE_LENGTH: usize = 1;
pub const MAX_TITLE_LENGTH: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Incomplete,
    Complete,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete",
            Self::Complete => "complete",
        }
    }

    pub fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "incomplete" => Ok(Self::Incomplete),
            "complete" => Ok(Self::Complete),
            _ => Err(AppError::invalid_input(
                "Task status must be 'incomplete' or 'complete'",
            )),
        }
    }
}

/// A single to-do item.
///
/// Fields are private so every mutation goes through a validating setter.
/// Equality and hashing consider only the identifier.
#[derive(Debug, Clone, Serialize)]
pub struct Task {
    id: u64,
    title: String,
    description: String,
    status: TaskStatus,
}

impl Task {
    pub fn new<T: Into<String>>(id: u64, title: T) -> Result<Self, AppError> {
        Self::with_details(id, title, String::new(), TaskStatus::Incomplete)
    }

    pub fn with_details<T, D>(
        id: u64,
        title: T,
        description: D,
        status: TaskStatus,
    ) -> Result<Self, AppError>
    where
        T: Into<String>,
        D: Into<String>,
    {
        if id == 0 {
            return Err(AppError::invalid_input("Task ID must be a positive integer"));
        }

        let title = title.into();
        validate_title(&title)?;

        Ok(Self {
            id,
            title,
            description: description.into(),
            status,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn is_complete(&self) -> bool {
        self.status.is_complete()
    }

    /// Replaces the title, leaving the task untouched when validation fails.
    pub fn set_title<T: Into<String>>(&mut self, value: T) -> Result<(), AppError> {
        let value = value.into();
        validate_title(&value)?;
        self.title = value;
        Ok(())
    }

    pub fn set_description<D: Into<String>>(&mut self, value: D) {
        self.description = value.into();
    }

    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    /// Plain `{id, title, description, status}` mapping of the current values.
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("id".to_string(), Value::from(self.id));
        fields.insert("title".to_string(), Value::from(self.title.as_str()));
        fields.insert(
            "description".to_string(),
            Value::from(self.description.as_str()),
        );
        fields.insert("status".to_string(), Value::from(self.status.as_str()));
        fields
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Task {}

impl Hash for Task {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

pub fn validate_title(title: &str) -> Result<(), AppError> {
    let length = title.chars().count();
    if length < MIN_TITLE_LENGTH {
        return Err(AppError::invalid_input("Task title cannot be empty"));
    }
    if length > MAX_TITLE_LENGTH {
        return Err(AppError::invalid_input(format!(
            "Task title must be {MAX_TITLE_LENGTH} characters or less"
        )));
    }
    Ok(())
}
