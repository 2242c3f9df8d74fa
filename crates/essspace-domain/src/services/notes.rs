//! Note service for the domain layer.
//!
//! Wraps the synchronous [`NoteStore`] for async callers. Every store call
//! runs on the blocking pool. Writes go through here so that links are
//! extracted from the body before it is persisted and so that subscribers
//! hear about every change.

use std::sync::Arc;

use essspace_store::{Note, NoteId, NoteStore, StoreError, StoreStats};
use essspace_summarize::{SummarizationService, SummarizerPreference};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::error::{DomainError, Result};

/// Buffered change events per subscriber.
const EVENT_CAPACITY: usize = 64;

/// Emitted after a note is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteEvent {
    Inserted(NoteId),
    Updated(NoteId),
    Deleted(NoteId),
}

impl NoteEvent {
    pub fn id(&self) -> NoteId {
        match self {
            NoteEvent::Inserted(id) | NoteEvent::Updated(id) | NoteEvent::Deleted(id) => *id,
        }
    }
}

/// Domain service for note operations.
#[derive(Clone)]
pub struct NoteService {
    store: Arc<NoteStore>,
    summarizer: SummarizationService,
    events: broadcast::Sender<NoteEvent>,
}

impl NoteService {
    /// Create a new note service.
    pub fn new(store: Arc<NoteStore>, summarizer: SummarizationService) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            summarizer,
            events,
        }
    }

    /// Get the underlying store.
    pub fn store(&self) -> &Arc<NoteStore> {
        &self.store
    }

    /// Receive every [`NoteEvent`] sent after this call.
    ///
    /// Receivers that fall more than a few dozen events behind miss the
    /// oldest ones; re-list the notes when that happens.
    pub fn subscribe(&self) -> broadcast::Receiver<NoteEvent> {
        self.events.subscribe()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────────────────

    /// Insert a note after extracting the links in its body.
    pub async fn insert_note(&self, mut note: Note) -> Result<NoteId> {
        note.links = links_in(&note);
        let title = note.title.clone();
        let link_count = note.links.len();

        let id = self.blocking(move |store| store.insert_note(&note)).await?;

        info!(id = %id, title = ?title, links = link_count, "Note inserted");
        self.publish(NoteEvent::Inserted(id));
        Ok(id)
    }

    /// Replace a stored note, re-extracting the links in its body.
    pub async fn update_note(&self, mut note: Note) -> Result<()> {
        if !note.id.is_saved() {
            return Err(DomainError::InvalidInput(
                "cannot update a note that was never saved".to_string(),
            ));
        }
        note.links = links_in(&note);
        let id = note.id;

        self.blocking(move |store| store.update_note(&note))
            .await
            .map_err(|e| match e {
                DomainError::Store(StoreError::NotFound(_)) => DomainError::NotFound(id),
                other => other,
            })?;

        debug!(id = %id, "Note updated");
        self.publish(NoteEvent::Updated(id));
        Ok(())
    }

    /// Replace the body of a note and bump its modification time.
    ///
    /// Blank text clears the body.
    pub async fn edit_text(&self, id: NoteId, text: Option<String>) -> Result<Note> {
        let mut note = self.require_note(id).await?;
        note.set_text(text.filter(|t| !t.trim().is_empty()));
        note.links = links_in(&note);

        self.update_note(note.clone()).await?;
        Ok(note)
    }

    /// Delete a note. Returns `false` if it did not exist.
    pub async fn delete_note(&self, id: NoteId) -> Result<bool> {
        let deleted = self.blocking(move |store| store.delete_note(id)).await?;
        if deleted {
            info!(id = %id, "Note deleted");
            self.publish(NoteEvent::Deleted(id));
        }
        Ok(deleted)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────

    pub async fn get_note(&self, id: NoteId) -> Result<Option<Note>> {
        self.blocking(move |store| store.get_note(id)).await
    }

    /// Get a note, failing with [`DomainError::NotFound`] if it is missing.
    pub async fn require_note(&self, id: NoteId) -> Result<Note> {
        self.get_note(id).await?.ok_or(DomainError::NotFound(id))
    }

    /// Notes, newest first.
    pub async fn list_notes(&self, limit: usize, offset: usize) -> Result<Vec<Note>> {
        self.blocking(move |store| store.list_notes(limit, offset))
            .await
    }

    pub async fn all_notes(&self) -> Result<Vec<Note>> {
        self.blocking(|store| store.all_notes()).await
    }

    pub async fn search_notes(&self, query: &str, limit: usize) -> Result<Vec<Note>> {
        let query = query.to_string();
        self.blocking(move |store| store.search_notes(&query, limit))
            .await
    }

    pub async fn list_notes_by_tag(
        &self,
        tag: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Note>> {
        let tag = tag.to_string();
        self.blocking(move |store| store.list_notes_by_tag(&tag, limit, offset))
            .await
    }

    pub async fn count_notes(&self) -> Result<usize> {
        self.blocking(|store| store.count_notes()).await
    }

    pub async fn stats(&self) -> Result<StoreStats> {
        self.blocking(|store| store.stats()).await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Summaries
    // ─────────────────────────────────────────────────────────────────────

    /// Summarize `text` and store the result as the note's summary.
    ///
    /// Fails with [`DomainError::NothingToSummarize`] for blank text, before
    /// any summarizer is called.
    pub async fn summarize_note(
        &self,
        id: NoteId,
        text: &str,
        preference: SummarizerPreference,
        api_key: Option<&str>,
    ) -> Result<String> {
        if text.trim().is_empty() {
            return Err(DomainError::NothingToSummarize);
        }
        let mut note = self.require_note(id).await?;

        let summary = self
            .summarizer
            .get_summary(text, preference, api_key)
            .await?;
        info!(id = %id, %preference, chars = summary.chars().count(), "Note summarized");

        note.summary = Some(summary.clone());
        note.touch();
        self.update_note(note).await?;
        Ok(summary)
    }

    /// Store a bullet-point rendering of the note's body as its summary.
    pub async fn bulletize_note(&self, id: NoteId) -> Result<String> {
        let mut note = self.require_note(id).await?;
        let text = note.text.as_deref().unwrap_or_default();
        if text.trim().is_empty() {
            return Err(DomainError::NothingToSummarize);
        }

        let bullets = essspace_text::summarize_and_bullet(text);
        note.summary = Some(bullets.clone());
        note.touch();
        self.update_note(note).await?;
        Ok(bullets)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────

    async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&NoteStore) -> essspace_store::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        Ok(tokio::task::spawn_blocking(move || f(&store)).await??)
    }

    fn publish(&self, event: NoteEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

fn links_in(note: &Note) -> Vec<String> {
    note.text
        .as_deref()
        .map(essspace_text::extract_links)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use essspace_summarize::{MockSummarizer, StaticConnectivity};

    fn service_with(cloud: Arc<MockSummarizer>, online: bool) -> NoteService {
        let store = Arc::new(NoteStore::open_in_memory().unwrap());
        let summarizer =
            SummarizationService::with_cloud(cloud, Arc::new(StaticConnectivity::new(online)));
        NoteService::new(store, summarizer)
    }

    fn service() -> NoteService {
        service_with(Arc::new(MockSummarizer::new(Vec::new())), false)
    }

    #[tokio::test]
    async fn test_insert_extracts_links() {
        let notes = service();
        let mut events = notes.subscribe();

        let note = Note::new()
            .with_title("Reading")
            .with_text("See www.example.com/a and https://example.org");
        let id = notes.insert_note(note).await.unwrap();

        let stored = notes.require_note(id).await.unwrap();
        assert_eq!(
            stored.links,
            vec!["http://www.example.com/a", "https://example.org"]
        );
        assert_eq!(events.recv().await.unwrap(), NoteEvent::Inserted(id));
    }

    #[tokio::test]
    async fn test_update_reextracts_links() {
        let notes = service();
        let id = notes
            .insert_note(Note::new().with_text("https://old.example.com"))
            .await
            .unwrap();

        let mut note = notes.require_note(id).await.unwrap();
        note.text = Some("moved to https://new.example.com".to_string());
        notes.update_note(note).await.unwrap();

        let stored = notes.require_note(id).await.unwrap();
        assert_eq!(stored.links, vec!["https://new.example.com"]);
    }

    #[tokio::test]
    async fn test_update_missing_or_unsaved_note() {
        let notes = service();

        let err = notes.update_note(Note::new()).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));

        let mut ghost = Note::new();
        ghost.id = NoteId(42);
        let err = notes.update_note(ghost).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(NoteId(42))));
    }

    #[tokio::test]
    async fn test_edit_text_bumps_last_modified() {
        let notes = service();
        let id = notes
            .insert_note(Note::new().with_text("draft"))
            .await
            .unwrap();
        let before = notes.require_note(id).await.unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let edited = notes
            .edit_text(id, Some("final at example.com".to_string()))
            .await
            .unwrap();

        assert_eq!(edited.text.as_deref(), Some("final at example.com"));
        assert!(edited.last_modified > before.last_modified);
        assert_eq!(edited.created_at, before.created_at);

        let stored = notes.require_note(id).await.unwrap();
        assert_eq!(stored.links, vec!["http://example.com"]);

        let cleared = notes.edit_text(id, Some("   ".to_string())).await.unwrap();
        assert!(cleared.text.is_none());
        assert!(cleared.links.is_empty());
    }

    #[tokio::test]
    async fn test_delete_publishes_only_when_removed() {
        let notes = service();
        let id = notes.insert_note(Note::new().with_text("x")).await.unwrap();
        let mut events = notes.subscribe();

        assert!(notes.delete_note(id).await.unwrap());
        assert!(!notes.delete_note(id).await.unwrap());
        assert_eq!(events.recv().await.unwrap(), NoteEvent::Deleted(id));
        assert!(events.try_recv().is_err());
        assert!(notes.get_note(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_and_search() {
        let notes = service();
        notes
            .insert_note(Note::new().with_title("Groceries").with_text("milk"))
            .await
            .unwrap();
        notes
            .insert_note(Note::new().with_title("Work").with_text("quarterly report"))
            .await
            .unwrap();

        assert_eq!(notes.count_notes().await.unwrap(), 2);
        assert_eq!(notes.list_notes(10, 0).await.unwrap().len(), 2);
        assert_eq!(notes.all_notes().await.unwrap().len(), 2);

        let found = notes.search_notes("report", 10).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title.as_deref(), Some("Work"));
    }

    #[tokio::test]
    async fn test_summarize_blank_text_is_rejected() {
        let cloud = Arc::new(MockSummarizer::with_summary("unused"));
        let notes = service_with(cloud.clone(), true);
        let id = notes.insert_note(Note::new()).await.unwrap();

        let err = notes
            .summarize_note(id, "  \n ", SummarizerPreference::Auto, Some("key"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NothingToSummarize));
        assert_eq!(cloud.request_count(), 0);
    }

    #[tokio::test]
    async fn test_summarize_stores_summary() {
        let cloud = Arc::new(MockSummarizer::with_summary("Short version."));
        let notes = service_with(cloud.clone(), true);
        let id = notes
            .insert_note(Note::new().with_text("a long body"))
            .await
            .unwrap();
        let mut events = notes.subscribe();

        let summary = notes
            .summarize_note(id, "a long body", SummarizerPreference::Cloud, Some("key"))
            .await
            .unwrap();

        assert_eq!(summary, "Short version.");
        assert_eq!(cloud.requests(), vec!["a long body"]);
        let stored = notes.require_note(id).await.unwrap();
        assert_eq!(stored.summary.as_deref(), Some("Short version."));
        assert_eq!(events.recv().await.unwrap(), NoteEvent::Updated(id));
    }

    #[tokio::test]
    async fn test_summarize_cloud_offline_fails() {
        let notes = service_with(Arc::new(MockSummarizer::with_summary("x")), false);
        let id = notes.insert_note(Note::new().with_text("body")).await.unwrap();

        let err = notes
            .summarize_note(id, "body", SummarizerPreference::Cloud, Some("key"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::Summarize(essspace_summarize::SummarizeError::Offline)
        ));
        assert!(notes.require_note(id).await.unwrap().summary.is_none());
    }

    #[tokio::test]
    async fn test_summarize_missing_note() {
        let notes = service();
        let err = notes
            .summarize_note(NoteId(7), "text", SummarizerPreference::OnDevice, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(NoteId(7))));
    }

    #[tokio::test]
    async fn test_bulletize_note() {
        let notes = service();
        let id = notes
            .insert_note(Note::new().with_text("Buy milk. Call mom.\nDone"))
            .await
            .unwrap();

        let bullets = notes.bulletize_note(id).await.unwrap();
        assert_eq!(bullets, "* Buy milk\n* Call mom\n* Done");
        let stored = notes.require_note(id).await.unwrap();
        assert_eq!(stored.summary.as_deref(), Some(bullets.as_str()));

        let empty = notes.insert_note(Note::new()).await.unwrap();
        assert!(matches!(
            notes.bulletize_note(empty).await,
            Err(DomainError::NothingToSummarize)
        ));
    }
}
