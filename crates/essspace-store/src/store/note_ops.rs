//! Note CRUD, search, and tag operations.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::types::{Note, NoteId};

use super::NoteStore;

const NOTE_COLUMNS: &str = "id, title, photo_path, audio_path, text, ocr_text, \
     transcribed_text, summary, tags, links, is_markdown, created_at, last_modified";

impl NoteStore {
    /// Insert a note and return its id.
    ///
    /// An unsaved note ([`NoteId::UNSAVED`]) gets a fresh id. A note that
    /// already carries an id replaces any existing row with that id.
    pub fn insert_note(&self, note: &Note) -> Result<NoteId> {
        let conn = self.conn.lock();

        let tags_json = serde_json::to_string(&note.tags)?;
        let links_json = serde_json::to_string(&note.links)?;
        let id = (note.id.is_saved()).then_some(note.id.0);

        conn.execute(
            r#"
            INSERT OR REPLACE INTO notes (id, title, photo_path, audio_path, text, ocr_text,
                transcribed_text, summary, tags, links, is_markdown, created_at, last_modified)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                id,
                note.title,
                note.photo_path,
                note.audio_path,
                note.text,
                note.ocr_text,
                note.transcribed_text,
                note.summary,
                tags_json,
                links_json,
                note.is_markdown,
                note.created_at.timestamp_millis(),
                note.last_modified.timestamp_millis(),
            ],
        )?;

        let id = NoteId(conn.last_insert_rowid());
        debug!("Inserted note {}", id);
        Ok(id)
    }

    /// Get a note by ID.
    pub fn get_note(&self, id: NoteId) -> Result<Option<Note>> {
        let conn = self.conn.lock();

        let mut stmt = conn.prepare(&format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1"))?;
        let mut rows = stmt.query(params![id.0])?;

        if let Some(row) = rows.next()? {
            Ok(Some(Self::row_to_note(row)?))
        } else {
            Ok(None)
        }
    }

    /// Update every column of an existing note.
    pub fn update_note(&self, note: &Note) -> Result<()> {
        let conn = self.conn.lock();

        let tags_json = serde_json::to_string(&note.tags)?;
        let links_json = serde_json::to_string(&note.links)?;

        let rows_affected = conn.execute(
            r#"
            UPDATE notes
            SET title = ?2, photo_path = ?3, audio_path = ?4, text = ?5, ocr_text = ?6,
                transcribed_text = ?7, summary = ?8, tags = ?9, links = ?10,
                is_markdown = ?11, created_at = ?12, last_modified = ?13
            WHERE id = ?1
            "#,
            params![
                note.id.0,
                note.title,
                note.photo_path,
                note.audio_path,
                note.text,
                note.ocr_text,
                note.transcribed_text,
                note.summary,
                tags_json,
                links_json,
                note.is_markdown,
                note.created_at.timestamp_millis(),
                note.last_modified.timestamp_millis(),
            ],
        )?;

        if rows_affected == 0 {
            return Err(StoreError::NotFound(format!("Note {}", note.id)));
        }

        debug!("Updated note {}", note.id);
        Ok(())
    }

    /// Delete a note by ID. Returns whether a row was removed.
    pub fn delete_note(&self, id: NoteId) -> Result<bool> {
        let conn = self.conn.lock();

        let rows_affected = conn.execute("DELETE FROM notes WHERE id = ?1", params![id.0])?;

        Ok(rows_affected > 0)
    }

    /// List notes, newest first.
    pub fn list_notes(&self, limit: usize, offset: usize) -> Result<Vec<Note>> {
        let conn = self.conn.lock();
        query_notes(
            &conn,
            &format!(
                "SELECT {NOTE_COLUMNS} FROM notes ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2"
            ),
            params![limit as i64, offset as i64],
        )
    }

    /// Every note, newest first.
    pub fn all_notes(&self) -> Result<Vec<Note>> {
        let conn = self.conn.lock();
        query_notes(
            &conn,
            &format!("SELECT {NOTE_COLUMNS} FROM notes ORDER BY created_at DESC, id DESC"),
            [],
        )
    }

    /// Search notes whose title or any text column contains `query`.
    ///
    /// Matching is case-insensitive for ASCII, as with SQLite `LIKE`.
    pub fn search_notes(&self, query: &str, limit: usize) -> Result<Vec<Note>> {
        let conn = self.conn.lock();

        let pattern = format!("%{}%", escape_like(query));

        query_notes(
            &conn,
            &format!(
                r#"
                SELECT {NOTE_COLUMNS}
                FROM notes
                WHERE title LIKE ?1 ESCAPE '\'
                   OR text LIKE ?1 ESCAPE '\'
                   OR ocr_text LIKE ?1 ESCAPE '\'
                   OR transcribed_text LIKE ?1 ESCAPE '\'
                   OR summary LIKE ?1 ESCAPE '\'
                ORDER BY created_at DESC, id DESC
                LIMIT ?2
                "#
            ),
            params![pattern, limit as i64],
        )
    }

    /// List notes that carry a specific tag, newest first, with pagination.
    pub fn list_notes_by_tag(&self, tag: &str, limit: usize, offset: usize) -> Result<Vec<Note>> {
        let conn = self.conn.lock();

        // Match the JSON-encoded tag so "rust" does not match "rustacean".
        let encoded = serde_json::to_string(tag)?;
        let pattern = format!("%{}%", escape_like(&encoded));

        query_notes(
            &conn,
            &format!(
                r#"
                SELECT {NOTE_COLUMNS}
                FROM notes
                WHERE tags LIKE ?1 ESCAPE '\'
                ORDER BY created_at DESC, id DESC
                LIMIT ?2 OFFSET ?3
                "#
            ),
            params![pattern, limit as i64, offset as i64],
        )
    }

    /// Total number of notes.
    pub fn count_notes(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Convert a database row to a Note struct.
    pub(crate) fn row_to_note(row: &rusqlite::Row) -> Result<Note> {
        let tags_json: Option<String> = row.get(8)?;
        let links_json: Option<String> = row.get(9)?;
        let is_markdown: Option<bool> = row.get(10)?;
        let created_at: i64 = row.get(11)?;
        let last_modified: Option<i64> = row.get(12)?;

        let created_at = millis_to_datetime(created_at)?;
        let last_modified = match last_modified {
            Some(ms) if ms > 0 => millis_to_datetime(ms)?,
            _ => created_at,
        };

        Ok(Note {
            id: NoteId(row.get(0)?),
            title: row.get(1)?,
            photo_path: row.get(2)?,
            audio_path: row.get(3)?,
            text: row.get(4)?,
            ocr_text: row.get(5)?,
            transcribed_text: row.get(6)?,
            summary: row.get(7)?,
            tags: parse_string_list(tags_json)?,
            links: parse_string_list(links_json)?,
            is_markdown: is_markdown.unwrap_or(true),
            created_at,
            last_modified,
        })
    }
}

fn query_notes(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Note>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;

    let mut notes = Vec::new();
    while let Some(row) = rows.next()? {
        notes.push(NoteStore::row_to_note(row)?);
    }

    Ok(notes)
}

/// A NULL or empty JSON array column reads as an empty list.
fn parse_string_list(json: Option<String>) -> Result<Vec<String>> {
    match json.as_deref().map(str::trim) {
        None | Some("") => Ok(Vec::new()),
        Some(json) => Ok(serde_json::from_str(json)?),
    }
}

fn millis_to_datetime(ms: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms)
        .ok_or_else(|| StoreError::InvalidData(format!("timestamp out of range: {ms}")))
}

fn escape_like(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
