//! Domain facade for Essspace.
//!
//! This crate sits between the hosts (the CLI, or a UI shell) and the
//! infrastructure crates. It provides:
//!
//! - **Note operations**: async CRUD over the note store with link extraction,
//!   summaries and change notifications ([`NoteService`])
//! - **Capture view-state**: the paths and text carried between the steps of a
//!   capture flow, and the notes built from them ([`CaptureSession`])
//!
//! # Example
//!
//! ```ignore
//! use essspace_domain::{CaptureSession, DomainServices};
//!
//! let services = DomainServices::new(store, summarizer);
//!
//! let mut session = CaptureSession::new();
//! session.set_captured_data(Some(photo_path), ocr_text, None);
//! let note = session.build_capture_note(Some("remember to pay"));
//! let id = services.notes().insert_note(note).await?;
//! ```

mod error;
pub mod services;
pub mod session;

pub use error::{DomainError, Result};
pub use services::DomainServices;
pub use services::notes::{NoteEvent, NoteService};
pub use session::{CaptureSession, ScreenshotPrompt};

// Re-export key types from infrastructure crates for convenience
pub use essspace_store::{Note, NoteId, NoteStore};
pub use essspace_summarize::{SummarizationService, SummarizerPreference};
