// Key-value storage backends for persisted state

use eyre::{Context, Result, eyre};
use fs2::FileExt;
use rusqlite::{Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, info};

const CURRENT_VERSION: u32 = 1;

/// String key-value storage, shaped like the browser's `localStorage`
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    fn remove_item(&mut self, key: &str) -> Result<()>;
}

/// Several stores can share one backend within a single thread of control.
impl<S: Storage> Storage for Rc<RefCell<S>> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.borrow().get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.borrow_mut().set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.borrow_mut().remove_item(key)
    }
}

/// Volatile storage; contents vanish with the value
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
}

/// On-disk storage backed by a SQLite key-value table
///
/// Holds an exclusive lock on the store directory for as long as it is open,
/// so only one process writes at a time.
pub struct SqliteStorage {
    base_path: PathBuf,
    db: Connection,
    _lock: File,
}

impl SqliteStorage {
    /// Open or create storage at the given path
    ///
    /// The storage will be created in a `.todostore` subdirectory of the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let base_path = path.as_ref().join(".todostore");

        // Create directory if it doesn't exist
        fs::create_dir_all(&base_path).context("Failed to create store directory")?;

        let lock_path = base_path.join("todostore.lock");
        let lock = File::create(&lock_path).context("Failed to create lock file")?;
        lock.try_lock_exclusive()
            .map_err(|e| eyre!("Store at {:?} is in use by another process: {}", base_path, e))?;

        let db_path = base_path.join("todostore.db");
        let db = Connection::open(&db_path).context("Failed to open SQLite database")?;

        let storage = Self {
            base_path,
            db,
            _lock: lock,
        };

        storage.create_schema()?;
        storage.create_gitignore()?;
        storage.write_version()?;

        info!(path = ?storage.base_path, "Opened storage");
        Ok(storage)
    }

    /// Get the base path of this storage
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Keys currently stored, in lexical order
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self.db.prepare("SELECT key FROM items ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut keys = Vec::new();
        for row in rows {
            keys.push(row?);
        }
        Ok(keys)
    }

    fn create_schema(&self) -> Result<()> {
        debug!("Creating database schema");

        self.db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        Ok(())
    }

    fn create_gitignore(&self) -> Result<()> {
        let gitignore_path = self.base_path.join(".gitignore");
        if !gitignore_path.exists() {
            fs::write(
                gitignore_path,
                "todostore.db\ntodostore.db-shm\ntodostore.db-wal\ntodostore.lock\n",
            )?;
        }
        Ok(())
    }

    fn write_version(&self) -> Result<()> {
        let version_path = self.base_path.join(".version");
        if !version_path.exists() {
            fs::write(version_path, CURRENT_VERSION.to_string())?;
        }
        Ok(())
    }

    fn validate_key(key: &str) -> Result<()> {
        if key.trim().is_empty() {
            return Err(eyre!("Storage key cannot be empty or whitespace-only"));
        }
        if key.len() > 256 {
            return Err(eyre!("Storage key too long: {} chars (max 256)", key.len()));
        }
        Ok(())
    }
}

impl Storage for SqliteStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .db
            .query_row("SELECT value FROM items WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
            .with_context(|| format!("Failed to read storage key {}", key))?;
        Ok(value)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        Self::validate_key(key)?;
        self.db
            .execute(
                "INSERT OR REPLACE INTO items (key, value, updated_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![key, value, crate::now_ms()],
            )
            .with_context(|| format!("Failed to write storage key {}", key))?;
        debug!(key, bytes = value.len(), "Stored item");
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.db
            .execute("DELETE FROM items WHERE key = ?1", [key])
            .with_context(|| format!("Failed to remove storage key {}", key))?;
        Ok(())
    }
}
