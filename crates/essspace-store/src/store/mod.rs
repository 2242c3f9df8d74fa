//! Note store implementation using SQLite.
//!
//! Provides persistent storage for notes using rusqlite. Older databases are
//! upgraded in place; see [`SCHEMA_VERSION`] for the current layout.

mod note_ops;

use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags, params};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Result, StoreError};

// ─────────────────────────────────────────────────────────────────────────────
// Schema Version
// ─────────────────────────────────────────────────────────────────────────────

/// Current schema version for migrations.
pub const SCHEMA_VERSION: i32 = 4;

// ─────────────────────────────────────────────────────────────────────────────
// Note Store
// ─────────────────────────────────────────────────────────────────────────────

/// Note store backed by SQLite.
///
/// Uses WAL mode for better concurrent read performance. All access goes
/// through a single connection guarded by a mutex, so the store can be shared
/// across threads behind an `Arc`.
pub struct NoteStore {
    pub(crate) conn: Mutex<Connection>,
}

impl std::fmt::Debug for NoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteStore").finish_non_exhaustive()
    }
}

/// Summary counts for a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub note_count: usize,
    pub with_photo: usize,
    pub with_audio: usize,
    pub with_summary: usize,
    pub schema_version: i32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Initialization
// ─────────────────────────────────────────────────────────────────────────────

impl NoteStore {
    /// Open or create a note store at the given path.
    ///
    /// Creates the parent directory and the database file if needed, then
    /// brings the schema up to date.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                    path: parent.display().to_string(),
                    source,
                })?;
            }
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_FULL_MUTEX,
        )?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;

        info!("Note store opened at {:?}", path);
        Ok(store)
    }

    /// Create an in-memory store (useful for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;

        debug!("In-memory note store created");
        Ok(store)
    }

    /// Initialize the database with schema and pragmas.
    fn initialize(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        create_schema(&conn)
    }

    /// Schema version recorded in the database file.
    pub fn schema_version(&self) -> Result<i32> {
        let conn = self.conn.lock();
        Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
    }
}

/// Create the schema or upgrade an older one.
fn create_schema(conn: &Connection) -> Result<()> {
    let current_version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if current_version > SCHEMA_VERSION {
        return Err(StoreError::Migration(format!(
            "database schema version {current_version} is newer than supported version {SCHEMA_VERSION}"
        )));
    }

    if current_version == SCHEMA_VERSION {
        debug!("Schema up to date (version {})", current_version);
        return Ok(());
    }

    info!(
        "Migrating schema from version {} to {}",
        current_version, SCHEMA_VERSION
    );

    // Version 1 layout; later columns are added by the migrations below.
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS notes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            photo_path TEXT,
            audio_path TEXT,
            text TEXT,
            created_at INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS meta (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#,
    )?;

    if current_version < 2 {
        migrate_v2(conn)?;
    }
    if current_version < 3 {
        migrate_v3(conn)?;
    }
    if current_version < 4 {
        migrate_v4(conn)?;
    }

    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

    info!("Schema ready (version {})", SCHEMA_VERSION);
    Ok(())
}

fn has_column(conn: &Connection, column: &str) -> bool {
    conn.prepare(&format!("SELECT {column} FROM notes LIMIT 0"))
        .is_ok()
}

/// Add `column` to `notes` unless it is already there.
fn add_column(conn: &Connection, column: &str, definition: &str) -> Result<()> {
    if !has_column(conn, column) {
        conn.execute_batch(&format!(
            "ALTER TABLE notes ADD COLUMN {column} {definition};"
        ))
        .map_err(|e| StoreError::Migration(format!("adding column {column}: {e}")))?;
    }
    Ok(())
}

/// Migration v2: note titles.
fn migrate_v2(conn: &Connection) -> Result<()> {
    info!("Running migration v2: adding title column");
    add_column(conn, "title", "TEXT")
}

/// Migration v3: keep OCR and transcript text separately from the body.
fn migrate_v3(conn: &Connection) -> Result<()> {
    info!("Running migration v3: adding transcribed_text and ocr_text columns");
    add_column(conn, "transcribed_text", "TEXT")?;
    add_column(conn, "ocr_text", "TEXT")
}

/// Migration v4: summary, tags, links, markdown flag and modification time.
fn migrate_v4(conn: &Connection) -> Result<()> {
    info!("Running migration v4: adding summary, tags, links, is_markdown, last_modified");
    add_column(conn, "summary", "TEXT")?;
    add_column(conn, "tags", "TEXT NOT NULL DEFAULT '[]'")?;
    add_column(conn, "links", "TEXT NOT NULL DEFAULT '[]'")?;
    add_column(conn, "is_markdown", "INTEGER NOT NULL DEFAULT 1")?;
    add_column(conn, "last_modified", "INTEGER NOT NULL DEFAULT 0")?;

    conn.execute(
        "UPDATE notes SET last_modified = created_at WHERE last_modified = 0",
        [],
    )?;
    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_notes_created_at ON notes(created_at);",
    )?;

    info!("Migration v4 complete");
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Transactions
// ─────────────────────────────────────────────────────────────────────────────

impl NoteStore {
    /// Execute a function within a transaction.
    ///
    /// If the closure returns an error, all changes are rolled back.
    ///
    /// # Example
    ///
    /// ```ignore
    /// store.with_transaction(|conn| {
    ///     // Multiple operations here are atomic
    ///     Ok(())
    /// })?;
    /// ```
    pub fn with_transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        // Dropping an uncommitted transaction rolls it back.
        let result = f(&tx)?;
        tx.commit()?;
        Ok(result)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Utility Operations
// ─────────────────────────────────────────────────────────────────────────────

impl NoteStore {
    /// Get a metadata value.
    pub fn get_meta(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock();

        let mut stmt = conn.prepare("SELECT value FROM meta WHERE key = ?1")?;
        let mut rows = stmt.query(params![key])?;

        if let Some(row) = rows.next()? {
            Ok(Some(row.get(0)?))
        } else {
            Ok(None)
        }
    }

    /// Set a metadata value.
    pub fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;

        Ok(())
    }

    /// Get database statistics.
    pub fn stats(&self) -> Result<StoreStats> {
        let conn = self.conn.lock();

        let (note_count, with_photo, with_audio, with_summary): (i64, i64, i64, i64) = conn
            .query_row(
                r#"
                SELECT COUNT(*),
                       COUNT(photo_path),
                       COUNT(audio_path),
                       COUNT(summary)
                FROM notes
                "#,
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )?;

        Ok(StoreStats {
            note_count: note_count as usize,
            with_photo: with_photo as usize,
            with_audio: with_audio as usize,
            with_summary: with_summary as usize,
            schema_version: SCHEMA_VERSION,
        })
    }
}
