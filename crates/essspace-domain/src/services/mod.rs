//! Domain services.
//!
//! This module contains the services that hosts call to work with notes.

pub mod notes;

use std::sync::Arc;

use essspace_store::NoteStore;
use essspace_summarize::SummarizationService;
use tracing::info;

/// Domain services facade.
///
/// Provides unified access to all domain services. This is the main entry point
/// for hosts to interact with Essspace's core functionality.
#[derive(Clone)]
pub struct DomainServices {
    /// Note operations.
    notes: notes::NoteService,
}

impl DomainServices {
    /// Create new domain services over an open store.
    pub fn new(store: Arc<NoteStore>, summarizer: SummarizationService) -> Self {
        info!("Initializing domain services");

        let notes = notes::NoteService::new(store, summarizer);

        Self { notes }
    }

    /// Get the note service.
    pub fn notes(&self) -> &notes::NoteService {
        &self.notes
    }

    /// Get the underlying store.
    pub fn store(&self) -> &Arc<NoteStore> {
        self.notes.store()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use essspace_summarize::{MockSummarizer, StaticConnectivity};

    #[tokio::test]
    async fn test_domain_services_creation() {
        let store = Arc::new(NoteStore::open_in_memory().unwrap());
        let summarizer = SummarizationService::with_cloud(
            Arc::new(MockSummarizer::with_summary("cloud")),
            Arc::new(StaticConnectivity::offline()),
        );
        let services = DomainServices::new(store.clone(), summarizer);

        assert!(Arc::ptr_eq(services.store(), &store));
        assert_eq!(services.notes().count_notes().await.unwrap(), 0);
    }
}
