use std::cell::RefCell;
use std::rc::Rc;
use tempfile::TempDir;
use todostore::{
    DocumentRoot, SortMode, SqliteStorage, Storage, Theme, ThemeStore, TodoDraft, TodoForm, TodoStatus,
    TodoStore,
};

#[test]
fn test_todos_and_theme_survive_reopen() {
    let temp = TempDir::new().unwrap();

    let (id, expected) = {
        let storage = Rc::new(RefCell::new(SqliteStorage::open(temp.path()).unwrap()));
        let mut todos = TodoStore::rehydrate(Rc::clone(&storage)).unwrap();
        let mut themes = ThemeStore::rehydrate(Rc::clone(&storage), DocumentRoot::default()).unwrap();

        let draft = TodoForm {
            title: "  Ship release  ".to_string(),
            description: "tag and publish".to_string(),
            start_time: Some(1_704_067_200_000),
            end_time: Some(1_704_153_600_000),
            ..Default::default()
        }
        .validate()
        .unwrap();

        let id = todos.add(draft);
        todos.add_random_batch(3);
        todos.update_status(&id, TodoStatus::Progress);
        todos.set_sort_mode(SortMode::StartTime);
        themes.set_theme(Theme::Dark);

        (id, todos.todos().to_vec())
    };

    let storage = Rc::new(RefCell::new(SqliteStorage::open(temp.path()).unwrap()));
    let todos = TodoStore::rehydrate(Rc::clone(&storage)).unwrap();
    let themes = ThemeStore::rehydrate(Rc::clone(&storage), DocumentRoot::default()).unwrap();

    assert_eq!(todos.todos(), expected.as_slice());
    assert_eq!(todos.sort_mode(), SortMode::StartTime);
    assert_eq!(todos.counts().total, 4);

    let shipped = todos.get(&id).unwrap();
    assert_eq!(shipped.title, "Ship release");
    assert_eq!(shipped.status, TodoStatus::Progress);

    assert_eq!(themes.theme(), Theme::Dark);
    assert!(themes.applier().contains("dark"));
}

#[test]
fn test_slices_are_stored_under_separate_keys() {
    let temp = TempDir::new().unwrap();
    let storage = Rc::new(RefCell::new(SqliteStorage::open(temp.path()).unwrap()));

    let mut todos = TodoStore::new(Rc::clone(&storage));
    todos.add(TodoDraft::new("One"));
    let mut themes = ThemeStore::rehydrate(Rc::clone(&storage), DocumentRoot::default()).unwrap();
    themes.toggle_theme();

    assert_eq!(
        storage.borrow().keys().unwrap(),
        vec!["theme-storage".to_string(), "todo-storage".to_string()]
    );

    let raw = storage.get_item("todo-storage").unwrap().unwrap();
    assert!(raw.starts_with("{\"state\":{\"todos\":["));
    assert!(raw.ends_with("\"version\":0}"));
}

#[test]
fn test_clear_all_is_persisted() {
    let temp = TempDir::new().unwrap();
    {
        let mut todos = TodoStore::rehydrate(SqliteStorage::open(temp.path()).unwrap()).unwrap();
        todos.add(TodoDraft::new("A"));
        todos.add(TodoDraft::new("B"));
        todos.clear_all();
    }

    let todos = TodoStore::rehydrate(SqliteStorage::open(temp.path()).unwrap()).unwrap();
    assert!(todos.todos().is_empty());
}
