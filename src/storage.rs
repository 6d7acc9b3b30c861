use crate::{domain::CollectionStore, errors::StorageError, models::MemeRecord};
use chrono::{Local, NaiveDate};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing;

/// Writes each day's collection to `<save_path>/<YYYY-MM-DD>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    save_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(save_path: impl Into<PathBuf>) -> Self {
        Self { save_path: save_path.into() }
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    /// File that holds the collection for `date`.
    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.save_path.join(format!("{}.json", date.format("%Y-%m-%d")))
    }

    /// Writes `records` as the collection for `date`, overwriting any earlier file.
    pub fn save_for_date(&self, records: &[MemeRecord], date: NaiveDate) -> Result<PathBuf, StorageError> {
        fs::create_dir_all(&self.save_path).map_err(|source| StorageError::Io {
            path: self.save_path.clone(),
            source,
        })?;

        let path = self.path_for(date);
        let json = serde_json::to_string_pretty(records)?; // Two-space indent
        // fs::write truncates, so a rerun on the same day replaces the file
        fs::write(&path, json).map_err(|source| StorageError::Io { path: path.clone(), source })?;

        tracing::debug!(path = %path.display(), count = records.len(), "Collection written");
        Ok(path)
    }
}

impl CollectionStore for JsonFileStore {
    /// Saves under today's local date.
    fn save(&self, records: &[MemeRecord]) -> Result<PathBuf, StorageError> {
        self.save_for_date(records, Local::now().date_naive())
    }
}
