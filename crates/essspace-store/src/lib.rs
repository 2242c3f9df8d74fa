//! Note storage for Essspace.
//!
//! This crate persists captured notes in a single SQLite table. Each note
//! carries the paths of its media (photo, audio), the text derived from them
//! (OCR, transcript, combined body, summary), free-form tags and the links
//! found in its body.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  NoteStore                                                              │
//! │  - Single SQLite file with WAL mode                                     │
//! │  - notes table (integer ids, JSON tag/link arrays)                      │
//! │  - meta table for store metadata                                        │
//! │  - In-place upgrades via PRAGMA user_version                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use essspace_store::{Note, NoteStore};
//!
//! let store = NoteStore::open("/tmp/essspace/notes.db")?;
//!
//! let note = Note::new()
//!     .with_title("Receipt")
//!     .with_photo_path("/tmp/essspace/photos/receipt.jpg")
//!     .with_text("Total 12.50")
//!     .with_tag("expenses");
//! let id = store.insert_note(&note)?;
//!
//! let fetched = store.get_note(id)?.expect("just inserted");
//! assert_eq!(fetched.title.as_deref(), Some("Receipt"));
//! # Ok::<(), essspace_store::StoreError>(())
//! ```

pub mod error;
pub mod store;
pub mod types;

pub use error::{Result, StoreError};
pub use store::{NoteStore, StoreStats};
pub use types::{Note, NoteId};
