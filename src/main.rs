use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use clap::{Parser, Subcommand, ValueEnum};
use colored::{ColoredString, Colorize};
use eyre::{Result, eyre};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use todostore::{
    DocumentRoot, SortMode, SqliteStorage, Theme, ThemeStore, Todo, TodoForm, TodoStatus, TodoStore, now_ms,
};
use tracing_subscriber::EnvFilter;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Parser)]
#[command(name = "todostore")]
#[command(about = "TodoStore CLI - Single-user to-do list with local persistence")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to the store directory (default: platform data directory)
    #[arg(short, long)]
    store_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or change the theme
    Theme {
        #[arg(value_enum)]
        action: Option<ThemeAction>,
    },

    #[command(flatten)]
    Todo(TodoCommand),
}

#[derive(Subcommand)]
enum TodoCommand {
    /// Add a todo
    Add {
        title: String,
        #[arg(long)]
        subtitle: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// Start time, "YYYY-MM-DD HH:MM" local time
        #[arg(long, value_parser = parse_time)]
        start: Option<i64>,
        /// End time, "YYYY-MM-DD HH:MM" local time
        #[arg(long, value_parser = parse_time)]
        end: Option<i64>,
        #[arg(long, value_enum, default_value_t = StatusArg::Waiting)]
        status: StatusArg,
    },

    /// Edit fields of an existing todo
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        subtitle: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long, value_parser = parse_time, conflicts_with = "no_start")]
        start: Option<i64>,
        #[arg(long, value_parser = parse_time, conflicts_with = "no_end")]
        end: Option<i64>,
        /// Remove the start time
        #[arg(long)]
        no_start: bool,
        /// Remove the end time
        #[arg(long)]
        no_end: bool,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },

    /// Move a todo to another status
    Status {
        id: String,
        #[arg(value_enum)]
        status: StatusArg,
    },

    /// Delete a todo
    Delete {
        id: String,
        /// Confirm the deletion
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete every todo (irreversible)
    Clear {
        /// Confirm clearing everything
        #[arg(short, long)]
        yes: bool,
    },

    /// Add randomly generated todos
    Random {
        #[arg(short, long, default_value_t = 1)]
        count: usize,
    },

    /// List todos in the current sort order
    List {
        /// Change the sort mode
        #[arg(long, value_enum)]
        sort: Option<SortArg>,
    },

    /// Show counts per status
    Counts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ThemeAction {
    Light,
    Dark,
    Toggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StatusArg {
    Waiting,
    Progress,
    Done,
}

impl From<StatusArg> for TodoStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Waiting => TodoStatus::Waiting,
            StatusArg::Progress => TodoStatus::Progress,
            StatusArg::Done => TodoStatus::Done,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortArg {
    Title,
    #[value(name = "startTime")]
    StartTime,
    Status,
    #[value(name = "createdAt")]
    CreatedAt,
}

impl From<SortArg> for SortMode {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Title => SortMode::Title,
            SortArg::StartTime => SortMode::StartTime,
            SortArg::Status => SortMode::Status,
            SortArg::CreatedAt => SortMode::CreatedAt,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store_path = cli.store_path.unwrap_or_else(default_store_path);

    let storage = Rc::new(RefCell::new(SqliteStorage::open(&store_path)?));

    match cli.command {
        Commands::Theme { action } => run_theme(storage, action),
        Commands::Todo(command) => run_todos(storage, command),
    }
}

fn run_theme(storage: Rc<RefCell<SqliteStorage>>, action: Option<ThemeAction>) -> Result<()> {
    let mut themes = ThemeStore::rehydrate(storage, DocumentRoot::default())?;
    match action {
        None => {}
        Some(ThemeAction::Toggle) => {
            themes.toggle_theme();
        }
        Some(ThemeAction::Light) => themes.set_theme(Theme::Light),
        Some(ThemeAction::Dark) => themes.set_theme(Theme::Dark),
    }
    println!("Theme: {}", themes.theme());
    Ok(())
}

fn run_todos(storage: Rc<RefCell<SqliteStorage>>, command: TodoCommand) -> Result<()> {
    let mut store = TodoStore::rehydrate(storage)?;

    match command {
        TodoCommand::Add {
            title,
            subtitle,
            description,
            start,
            end,
            status,
        } => {
            let form = TodoForm {
                title,
                subtitle: subtitle.unwrap_or_default(),
                description: description.unwrap_or_default(),
                start_time: start,
                end_time: end,
                status: status.into(),
            };
            let draft = form.validate()?;
            let id = store.add(draft);
            store.flush()?;
            println!("Added {}", id);
        }
        TodoCommand::Edit {
            id,
            title,
            subtitle,
            description,
            start,
            end,
            no_start,
            no_end,
            status,
        } => {
            let existing = store.get(&id).ok_or_else(|| eyre!("No todo with id {}", id))?;
            let mut form = TodoForm::from(existing);
            if let Some(title) = title {
                form.title = title;
            }
            if let Some(subtitle) = subtitle {
                form.subtitle = subtitle;
            }
            if let Some(description) = description {
                form.description = description;
            }
            if start.is_some() || no_start {
                form.start_time = start;
            }
            if end.is_some() || no_end {
                form.end_time = end;
            }
            if let Some(status) = status {
                form.status = status.into();
            }

            store.set_selected(Some(&id));
            store.set_editing(true);
            let outcome = form.validate().map(|draft| store.update(&id, draft.into()));
            store.set_selected(None);
            store.set_editing(false);

            outcome?;
            store.flush()?;
            println!("Updated {}", id);
        }
        TodoCommand::Status { id, status } => {
            let status = TodoStatus::from(status);
            if store.update_status(&id, status) {
                store.flush()?;
                println!("{} -> {}", id, badge(status));
            } else {
                println!("No todo with id {}", id);
            }
        }
        TodoCommand::Delete { id, yes } => {
            if !yes {
                return Err(eyre!("Refusing to delete {} without --yes", id));
            }
            store.delete(&id);
            store.flush()?;
            println!("Deleted {}", id);
        }
        TodoCommand::Clear { yes } => {
            if !yes {
                return Err(eyre!("Refusing to clear all todos without --yes"));
            }
            let total = store.counts().total;
            store.clear_all();
            store.flush()?;
            println!("Cleared {} todos", total);
        }
        TodoCommand::Random { count } => {
            let ids = store.add_random_batch(count);
            store.flush()?;
            for id in ids {
                if let Some(todo) = store.get(&id) {
                    print_todo(todo, now_ms());
                }
            }
        }
        TodoCommand::List { sort } => {
            if let Some(mode) = sort {
                store.set_sort_mode(mode.into());
                store.flush()?;
            }
            let view = store.sorted_view();
            if view.is_empty() {
                println!("No todos");
            }
            let now = now_ms();
            for todo in &view {
                print_todo(todo, now);
            }
        }
        TodoCommand::Counts => {
            let counts = store.counts();
            for status in TodoStatus::ALL {
                println!("{:<12} {}", badge(status), counts.get(status));
            }
            println!("{:<12} {}", "Total".bold(), counts.total);
        }
    }

    Ok(())
}

fn default_store_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("todostore"))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn badge(status: TodoStatus) -> ColoredString {
    match status {
        TodoStatus::Waiting => status.label().dimmed(),
        TodoStatus::Progress => status.label().blue(),
        TodoStatus::Done => status.label().green(),
    }
}

/// First line of a listed todo: id, title, status badge and an overdue marker
fn todo_header(todo: &Todo, now: i64) -> String {
    let mut header = format!("{}  {}  [{}]", todo.id.dimmed(), todo.title.bold(), badge(todo.status));
    if todo.is_overdue(now) {
        header.push_str(&format!("  {}", "overdue".red().bold()));
    }
    header
}

fn print_todo(todo: &Todo, now: i64) {
    println!("{}", todo_header(todo, now));
    if let Some(subtitle) = &todo.subtitle {
        println!("    {}", subtitle.italic());
    }
    if let Some(description) = &todo.description {
        println!("    {}", description);
    }
    if let Some(start) = todo.start_time {
        println!("    start: {}", format_time(start));
    }
    if let Some(end) = todo.end_time {
        println!("    end:   {}", format_time(end));
    }
}

fn format_time(ms: i64) -> String {
    Local
        .timestamp_millis_opt(ms)
        .single()
        .map(|dt: DateTime<Local>| dt.format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| ms.to_string())
}

fn parse_time(s: &str) -> Result<i64, String> {
    let naive = NaiveDateTime::parse_from_str(s, TIME_FORMAT)
        .map_err(|e| format!("expected \"YYYY-MM-DD HH:MM\": {}", e))?;
    naive
        .and_local_timezone(Local)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .ok_or_else(|| format!("{} does not exist in the local time zone", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("todostore").chain(args.iter().copied())).unwrap()
    }

    fn todo(status: TodoStatus, end_time: Option<i64>) -> Todo {
        Todo {
            id: "t1".to_string(),
            title: "Report".to_string(),
            subtitle: None,
            description: None,
            start_time: None,
            end_time,
            status,
            created_at: 1000,
            updated_at: 1000,
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_theme_actions_parse() {
        for (arg, expected) in [
            ("light", ThemeAction::Light),
            ("dark", ThemeAction::Dark),
            ("toggle", ThemeAction::Toggle),
        ] {
            match parse(&["theme", arg]).command {
                Commands::Theme { action } => assert_eq!(action, Some(expected)),
                Commands::Todo(_) => panic!("theme routed to todo commands"),
            }
        }

        assert!(matches!(parse(&["theme"]).command, Commands::Theme { action: None }));
        assert!(Cli::try_parse_from(["todostore", "theme", "sepia"]).is_err());
    }

    #[test]
    fn test_todo_commands_route_to_todo_enum() {
        assert!(matches!(
            parse(&["counts"]).command,
            Commands::Todo(TodoCommand::Counts)
        ));
        assert!(matches!(
            parse(&["status", "abc", "progress"]).command,
            Commands::Todo(TodoCommand::Status { status: StatusArg::Progress, .. })
        ));
    }

    #[test]
    fn test_sort_values_parse() {
        match parse(&["list", "--sort", "startTime"]).command {
            Commands::Todo(TodoCommand::List { sort }) => {
                assert_eq!(sort.map(SortMode::from), Some(SortMode::StartTime));
            }
            _ => panic!("expected list command"),
        }
        match parse(&["list", "--sort", "createdAt"]).command {
            Commands::Todo(TodoCommand::List { sort }) => {
                assert_eq!(sort.map(SortMode::from), Some(SortMode::CreatedAt));
            }
            _ => panic!("expected list command"),
        }
        assert!(Cli::try_parse_from(["todostore", "list", "--sort", "priority"]).is_err());
    }

    #[test]
    fn test_header_flags_overdue_todos() {
        assert!(todo_header(&todo(TodoStatus::Waiting, Some(5000)), 6000).contains("overdue"));
        assert!(!todo_header(&todo(TodoStatus::Done, Some(5000)), 6000).contains("overdue"));
        assert!(!todo_header(&todo(TodoStatus::Waiting, None), 6000).contains("overdue"));
        assert!(!todo_header(&todo(TodoStatus::Progress, Some(6000)), 6000).contains("overdue"));
    }
}
