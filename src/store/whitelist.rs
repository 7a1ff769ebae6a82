use std::path::PathBuf;

use uuid::Uuid;

use crate::common::config::Config;
use crate::common::errors::Error;
use crate::model::WhitelistEntry;

/// The user-controlled exclusion list.
///
/// The scan core only reads entries; creation and removal happen here on
/// behalf of the embedding UI. Every mutation is persisted immediately.
#[derive(Debug)]
pub struct WhitelistStore {
    path: PathBuf,
    entries: Vec<WhitelistEntry>,
}

impl WhitelistStore {
    pub fn open() -> Result<Self, Error> {
        Self::open_at(Config::whitelist_path())
    }

    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let entries = super::load_json(&path)?;
        Ok(Self { path, entries })
    }

    pub fn entries(&self) -> &[WhitelistEntry] {
        &self.entries
    }

    /// Add an entry unless its path is already present
    pub fn add(&mut self, entry: WhitelistEntry) -> Result<(), Error> {
        if self.entries.iter().any(|e| e.path == entry.path) {
            return Ok(());
        }
        self.entries.push(entry);
        self.save()
    }

    pub fn remove(&mut self, id: Uuid) -> Result<(), Error> {
        self.entries.retain(|e| e.id != id);
        self.save()
    }

    fn save(&self) -> Result<(), Error> {
        super::save_json_atomic(&self.path, &self.entries)
    }
}
