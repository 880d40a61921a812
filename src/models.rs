// Data models for TodoStore

use serde::{Deserialize, Serialize};

/// A single to-do record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    #[serde(default)]
    pub status: TodoStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Todo {
    /// Build a stored record from a draft, stamping id and both timestamps
    pub fn from_draft(id: String, draft: TodoDraft, now: i64) -> Self {
        Self {
            id,
            title: draft.title,
            subtitle: draft.subtitle,
            description: draft.description,
            start_time: draft.start_time,
            end_time: draft.end_time,
            status: draft.status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Past its end time and not yet done. An end time equal to `now_ms` is not overdue.
    pub fn is_overdue(&self, now_ms: i64) -> bool {
        self.status != TodoStatus::Done && self.end_time.is_some_and(|end| end < now_ms)
    }

    /// Merge a patch into this record. `id` and `created_at` are never touched.
    pub fn apply(&mut self, patch: TodoPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(subtitle) = patch.subtitle {
            self.subtitle = subtitle;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(start_time) = patch.start_time {
            self.start_time = start_time;
        }
        if let Some(end_time) = patch.end_time {
            self.end_time = end_time;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

/// Payload for creating a todo (everything except id and timestamps)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoDraft {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    #[serde(default)]
    pub status: TodoStatus,
}

impl TodoDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Partial update for a todo
///
/// `None` leaves a field alone. For the optional fields, `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub subtitle: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub start_time: Option<Option<i64>>,
    pub end_time: Option<Option<i64>>,
    pub status: Option<TodoStatus>,
}

impl TodoPatch {
    pub fn status(status: TodoStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<TodoDraft> for TodoPatch {
    /// Full replacement of every user-editable field, as the edit form submits it
    fn from(draft: TodoDraft) -> Self {
        Self {
            title: Some(draft.title),
            subtitle: Some(draft.subtitle),
            description: Some(draft.description),
            start_time: Some(draft.start_time),
            end_time: Some(draft.end_time),
            status: Some(draft.status),
        }
    }
}

/// Workflow stage of a todo
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoStatus {
    #[default]
    Waiting,
    Progress,
    Done,
}

impl TodoStatus {
    pub const ALL: [TodoStatus; 3] = [TodoStatus::Waiting, TodoStatus::Progress, TodoStatus::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::Waiting => "waiting",
            TodoStatus::Progress => "progress",
            TodoStatus::Done => "done",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            TodoStatus::Waiting => "Waiting",
            TodoStatus::Progress => "In progress",
            TodoStatus::Done => "Done",
        }
    }

    /// Precedence used by status sorting: waiting < progress < done
    pub fn rank(&self) -> u8 {
        match self {
            TodoStatus::Waiting => 0,
            TodoStatus::Progress => 1,
            TodoStatus::Done => 2,
        }
    }
}

impl std::fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TodoStatus {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "waiting" => Ok(TodoStatus::Waiting),
            "progress" => Ok(TodoStatus::Progress),
            "done" => Ok(TodoStatus::Done),
            other => Err(eyre::eyre!(
                "Invalid status: {} (expected waiting, progress or done)",
                other
            )),
        }
    }
}

/// Active comparator for the sorted view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortMode {
    #[default]
    Title,
    StartTime,
    Status,
    /// Newest first. Unknown persisted values land here.
    CreatedAt,
}

impl<'de> Deserialize<'de> for SortMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(SortMode::from_name(&raw))
    }
}

impl SortMode {
    /// Lenient lookup; anything unrecognised is the default newest-first ordering
    pub fn from_name(name: &str) -> Self {
        match name {
            "title" => SortMode::Title,
            "startTime" => SortMode::StartTime,
            "status" => SortMode::Status,
            _ => SortMode::CreatedAt,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Title => "title",
            SortMode::StartTime => "startTime",
            SortMode::Status => "status",
            SortMode::CreatedAt => "createdAt",
        }
    }
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-status tallies plus the total
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub waiting: usize,
    pub progress: usize,
    pub done: usize,
    pub total: usize,
}

impl StatusCounts {
    /// Tally a collection in a single pass
    pub fn tally<'a>(todos: impl IntoIterator<Item = &'a Todo>) -> Self {
        todos.into_iter().fold(Self::default(), |mut counts, todo| {
            match todo.status {
                TodoStatus::Waiting => counts.waiting += 1,
                TodoStatus::Progress => counts.progress += 1,
                TodoStatus::Done => counts.done += 1,
            }
            counts.total += 1;
            counts
        })
    }

    pub fn get(&self, status: TodoStatus) -> usize {
        match status {
            TodoStatus::Waiting => self.waiting,
            TodoStatus::Progress => self.progress,
            TodoStatus::Done => self.done,
        }
    }
}

/// Colour scheme of the UI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Helper function to get current timestamp in milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
