// Form layer: validates user input before it reaches the todo store

use crate::models::{TodoDraft, TodoStatus};
use thiserror::Error;

pub const MAX_TITLE_CHARS: usize = 100;
pub const MAX_DESCRIPTION_CHARS: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title cannot be empty")]
    EmptyTitle,

    #[error("title cannot exceed 100 characters (got {0})")]
    TitleTooLong(usize),

    #[error("description cannot exceed 500 characters (got {0})")]
    DescriptionTooLong(usize),

    #[error("end time must be later than start time")]
    EndNotAfterStart,
}

/// Every problem found in one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<ValidationError>);

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let messages: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    pub fn contains(&self, error: &ValidationError) -> bool {
        self.0.contains(error)
    }
}

/// Raw form fields as the user typed them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoForm {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub status: TodoStatus,
}

impl TodoForm {
    /// Check the fields and produce a trimmed draft ready for the store
    ///
    /// Blank subtitle and description become `None`.
    pub fn validate(&self) -> Result<TodoDraft, ValidationErrors> {
        let mut errors = Vec::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.push(ValidationError::EmptyTitle);
        } else {
            let len = title.chars().count();
            if len > MAX_TITLE_CHARS {
                errors.push(ValidationError::TitleTooLong(len));
            }
        }

        let description = self.description.trim();
        let len = description.chars().count();
        if len > MAX_DESCRIPTION_CHARS {
            errors.push(ValidationError::DescriptionTooLong(len));
        }

        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if end <= start {
                errors.push(ValidationError::EndNotAfterStart);
            }
        }

        if !errors.is_empty() {
            return Err(ValidationErrors(errors));
        }

        Ok(TodoDraft {
            title: title.to_string(),
            subtitle: non_blank(&self.subtitle),
            description: non_blank(description),
            start_time: self.start_time,
            end_time: self.end_time,
            status: self.status,
        })
    }
}

impl From<&crate::models::Todo> for TodoForm {
    /// Pre-fill the editor with an existing todo
    fn from(todo: &crate::models::Todo) -> Self {
        Self {
            title: todo.title.clone(),
            subtitle: todo.subtitle.clone().unwrap_or_default(),
            description: todo.description.clone().unwrap_or_default(),
            start_time: todo.start_time,
            end_time: todo.end_time,
            status: todo.status,
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
