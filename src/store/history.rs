use std::path::PathBuf;

use crate::common::config::Config;
use crate::common::errors::Error;
use crate::model::CleanHistory;

/// Record of completed cleans, newest first.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    entries: Vec<CleanHistory>,
}

impl HistoryStore {
    pub fn open() -> Result<Self, Error> {
        Self::open_at(Config::history_path())
    }

    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let entries = super::load_json(&path)?;
        Ok(Self { path, entries })
    }

    pub fn entries(&self) -> &[CleanHistory] {
        &self.entries
    }

    pub fn add(&mut self, entry: CleanHistory) -> Result<(), Error> {
        self.entries.insert(0, entry);
        self.save()
    }

    pub fn clear_all(&mut self) -> Result<(), Error> {
        self.entries.clear();
        self.save()
    }

    fn save(&self) -> Result<(), Error> {
        super::save_json_atomic(&self.path, &self.entries)
    }
}
