//! Daily meme collection: pull random memes until enough unique ones are in
//! hand or the attempt budget runs out, then hand them to a store.

use crate::{
    config::CollectorConfig,
    domain::{CollectionStore, MemeSource},
    errors::AppError,
    models::MemeRecord,
    source::HttpMemeSource,
    storage::JsonFileStore,
};
use chrono::Utc;
use std::{collections::HashSet, path::PathBuf};
use tracing::{self, info, warn};

pub struct MemeCollector<S> {
    source: S,
    target_count: usize,
    max_attempts: usize,
}

impl<S: MemeSource> MemeCollector<S> {
    /// The attempt ceiling is fixed at three requests per wanted meme.
    pub fn new(source: S, target_count: usize) -> Self {
        Self {
            source,
            target_count,
            max_attempts: target_count * 3,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Fetches until `target_count` unique memes are collected or `max_attempts`
    /// requests have been made. Failed requests and duplicates still use up an attempt.
    pub async fn collect(&self) -> Vec<MemeRecord> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut memes: Vec<MemeRecord> = Vec::new();
        let mut attempts = 0;

        while memes.len() < self.target_count && attempts < self.max_attempts {
            attempts += 1;

            let meme = match self.source.fetch().await {
                Ok(meme) => meme,
                Err(e) => {
                    tracing::error!(attempt = attempts, "Error fetching meme: {}", e);
                    continue;
                }
            };

            match MemeRecord::from_api(meme, Utc::now()) {
                Some(record) if !seen.contains(&record.url) => {
                    seen.insert(record.url.clone());
                    memes.push(record);
                    info!("Fetched unique meme {}/{}", memes.len(), self.target_count);
                }
                Some(record) => {
                    tracing::debug!(url = %record.url, "Duplicate url");
                    info!("Skipped duplicate meme");
                }
                None => warn!(attempt = attempts, "Skipped meme without url"),
            }
        }

        if memes.len() < self.target_count {
            warn!(
                attempts,
                collected = memes.len(),
                "Attempt limit reached before collecting {} memes",
                self.target_count
            );
        }
        memes
    }
}

/// Collects today's memes and saves them. Returns the written file, or
/// `None` when nothing was collected and therefore nothing was saved.
pub async fn collect_and_save<S, C>(collector: &MemeCollector<S>, store: &C) -> Result<Option<PathBuf>, AppError>
where
    S: MemeSource,
    C: CollectionStore,
{
    let memes = collector.collect().await;
    if memes.is_empty() {
        info!("No memes fetched today.");
        return Ok(None);
    }

    let path = store.save(&memes)?;
    info!(path = %path.display(), "Saved {} memes for today.", memes.len());
    Ok(Some(path))
}

/// Entry point of the `fetch_memes` binary.
pub async fn run(config: &CollectorConfig) -> Result<Option<PathBuf>, AppError> {
    let source = HttpMemeSource::new(config.api_url.clone(), config.request_timeout).map_err(AppError::SourceInit)?;
    let collector = MemeCollector::new(source, config.target_count);
    let store = JsonFileStore::new(&config.save_path);
    collect_and_save(&collector, &store).await
}
