//! Wires configuration, storage and services together for the commands.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use essspace_capture::TesseractRecognizer;
use essspace_config::{
    EssspaceConfig, LoadedConfig, OcrConfig, ResolvedSecret, SummarizerConfig, SummaryMode,
};
use essspace_domain::{DomainServices, NoteService};
use essspace_store::NoteStore;
use essspace_summarize::{
    CloudSummarizer, CloudSummarizerConfig, SummarizationService, SummarizerPreference, TcpProbe,
};
use tracing::{debug, warn};

use crate::commands::Context;

/// Discover and merge the config layers, logging any warnings.
pub fn load_config(ctx: &Context) -> Result<LoadedConfig> {
    let loaded = essspace_config::load_config_with_options(None, ctx.config_dir.as_deref())?;
    for warning in &loaded.warnings {
        warn!("{}", warning);
    }
    Ok(loaded)
}

/// The user config file the commands read and `config init` writes.
pub fn user_config_path(ctx: &Context) -> Option<PathBuf> {
    essspace_config::user_config_path(ctx.config_dir.as_deref())
}

/// An opened note database plus the services and settings around it.
pub struct App {
    pub config: EssspaceConfig,
    pub db_path: PathBuf,
    services: DomainServices,
}

impl App {
    /// Load the config and open the note database.
    pub fn open(ctx: &Context) -> Result<Self> {
        let config = load_config(ctx)?.config;
        config.validate()?;

        let db_path = ctx
            .db_path
            .clone()
            .unwrap_or_else(|| config.storage().effective_database_path());
        let store = NoteStore::open(&db_path)
            .with_context(|| format!("failed to open note database {}", db_path.display()))?;
        debug!(path = %db_path.display(), "Opened note database");

        let summarizer = summarization_service(&config.summarizer())?;
        let services = DomainServices::new(Arc::new(store), summarizer);

        Ok(Self {
            config,
            db_path,
            services,
        })
    }

    pub fn notes(&self) -> &NoteService {
        self.services.notes()
    }

    /// OCR engine built from the `[ocr]` section.
    pub fn recognizer(&self) -> TesseractRecognizer {
        recognizer(&self.config.ocr())
    }

    /// Preferred summarizer from the `[summarizer]` section.
    pub fn preference(&self) -> SummarizerPreference {
        preference_for(self.config.summarizer().mode)
    }

    /// API key from the environment or the config file.
    pub fn api_key(&self) -> Option<ResolvedSecret> {
        essspace_config::resolve_api_key(self.config.summarizer().api_key.as_deref())
    }
}

pub fn recognizer(config: &OcrConfig) -> TesseractRecognizer {
    TesseractRecognizer::new(&config.command)
        .with_language(&config.language)
        .with_timeout(Duration::from_secs(config.timeout_secs))
}

pub fn preference_for(mode: SummaryMode) -> SummarizerPreference {
    match mode {
        SummaryMode::Auto => SummarizerPreference::Auto,
        SummaryMode::OnDevice => SummarizerPreference::OnDevice,
        SummaryMode::Cloud => SummarizerPreference::Cloud,
    }
}

fn summarization_service(config: &SummarizerConfig) -> Result<SummarizationService> {
    let cloud = CloudSummarizer::new(
        CloudSummarizerConfig::new()
            .with_base_url(&config.base_url)
            .with_model(&config.model)
            .with_timeout(Duration::from_secs(config.timeout_secs)),
    )?;
    let probe = TcpProbe::new(
        config.probe_address.clone(),
        Duration::from_millis(config.probe_timeout_ms),
    );
    Ok(SummarizationService::with_cloud(
        Arc::new(cloud),
        Arc::new(probe),
    ))
}
