// TodoStore - Single-user to-do list state with local key-value persistence

pub mod form;
pub mod models;
pub mod random;
pub mod slice;
pub mod sort;
pub mod storage;
pub mod theme;
pub mod todo_store;

// Re-export main types for convenience
pub use form::{TodoForm, ValidationError, ValidationErrors};
pub use models::{SortMode, StatusCounts, Theme, Todo, TodoDraft, TodoPatch, TodoStatus, now_ms};
pub use slice::Slice;
pub use storage::{MemoryStorage, SqliteStorage, Storage};
pub use theme::{DocumentRoot, ThemeApplier, ThemeSlice, ThemeStore};
pub use todo_store::{TodoSlice, TodoStore};
