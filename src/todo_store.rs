// Todo store: the single source of truth for the todo collection

use crate::models::{SortMode, StatusCounts, Todo, TodoDraft, TodoPatch, TodoStatus, now_ms};
use crate::random;
use crate::slice::{self, Slice};
use crate::sort;
use crate::storage::Storage;
use eyre::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// The persisted part of the todo store
///
/// Selection and editing state are session-only and deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoSlice {
    #[serde(default)]
    pub todos: Vec<Todo>,
    #[serde(default)]
    pub sort_by: SortMode,
}

impl Slice for TodoSlice {
    fn storage_key() -> &'static str {
        "todo-storage"
    }
}

/// Todo collection plus view configuration, persisted after every mutation
///
/// Mutations never validate their input: callers check titles, descriptions and
/// time windows (see [`crate::form`]) before calling `add` or `update`.
/// Operations on an unknown id are silent no-ops.
pub struct TodoStore<S: Storage> {
    storage: S,
    state: TodoSlice,
    selected: Option<String>,
    editing: bool,
}

impl<S: Storage> TodoStore<S> {
    /// Create an empty store that writes to `storage` without reading it first
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            state: TodoSlice::default(),
            selected: None,
            editing: false,
        }
    }

    /// Restore the persisted slice from `storage`, or start empty if there is none
    pub fn rehydrate(storage: S) -> Result<Self> {
        let state: TodoSlice = slice::load_or_default(&storage)?;
        info!(
            count = state.todos.len(),
            sort_by = %state.sort_by,
            "Rehydrated todo store"
        );
        Ok(Self {
            storage,
            state,
            selected: None,
            editing: false,
        })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Append a new todo built from `draft` and return its id
    pub fn add(&mut self, draft: TodoDraft) -> String {
        let id = self.next_id();
        let todo = Todo::from_draft(id.clone(), draft, now_ms());
        debug!(id = %todo.id, title = %todo.title, "Adding todo");

        self.state.todos.push(todo);
        self.persist();
        id
    }

    /// Merge `patch` into the todo with `id`. Returns whether a todo matched.
    pub fn update(&mut self, id: &str, patch: TodoPatch) -> bool {
        let Some(todo) = self.state.todos.iter_mut().find(|t| t.id == id) else {
            debug!(id, "update: no such todo, ignoring");
            return false;
        };

        todo.apply(patch);
        todo.updated_at = now_ms().max(todo.updated_at);
        self.persist();
        true
    }

    /// Move the todo with `id` to another workflow stage
    pub fn update_status(&mut self, id: &str, status: TodoStatus) -> bool {
        self.update(id, TodoPatch::status(status))
    }

    /// Remove the todo with `id`, clearing the selection if it pointed there
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.state.todos.len();
        self.state.todos.retain(|t| t.id != id);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }

        let removed = self.state.todos.len() != before;
        if removed {
            debug!(id, "Deleted todo");
            self.persist();
        }
        removed
    }

    /// Drop every todo and the selection
    pub fn clear_all(&mut self) {
        info!(count = self.state.todos.len(), "Clearing all todos");
        self.state.todos.clear();
        self.selected = None;
        self.persist();
    }

    /// Add a randomly generated todo
    pub fn add_random(&mut self) -> String {
        self.add_random_with(&mut rand::rng())
    }

    /// Add a randomly generated todo drawing from `rng`
    pub fn add_random_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> String {
        let draft = random::generate(rng);
        self.add(draft)
    }

    /// Add `count` randomly generated todos, returning their ids in insertion order
    pub fn add_random_batch(&mut self, count: usize) -> Vec<String> {
        let mut rng = rand::rng();
        random::generate_batch(&mut rng, count)
            .into_iter()
            .map(|draft| self.add(draft))
            .collect()
    }

    pub fn set_sort_mode(&mut self, mode: SortMode) {
        self.state.sort_by = mode;
        self.persist();
    }

    pub fn set_selected(&mut self, id: Option<&str>) {
        self.selected = id.map(str::to_string);
    }

    pub fn set_editing(&mut self, editing: bool) {
        self.editing = editing;
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Todos in insertion order
    pub fn todos(&self) -> &[Todo] {
        &self.state.todos
    }

    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.state.todos.iter().find(|t| t.id == id)
    }

    pub fn sort_mode(&self) -> SortMode {
        self.state.sort_by
    }

    /// The todo currently open in the editor, if it still exists
    pub fn selected(&self) -> Option<&Todo> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    /// All todos ordered by the current sort mode, as a fresh copy
    pub fn sorted_view(&self) -> Vec<Todo> {
        sort::sorted(&self.state.todos, self.state.sort_by)
    }

    pub fn counts(&self) -> StatusCounts {
        StatusCounts::tally(&self.state.todos)
    }

    /// Write the persisted slice now, surfacing any storage error
    pub fn flush(&mut self) -> Result<()> {
        slice::save(&mut self.storage, &self.state)
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    fn next_id(&self) -> String {
        loop {
            let id = Uuid::now_v7().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.flush() {
            warn!(error = ?e, "Failed to persist todo store");
        }
    }
}
