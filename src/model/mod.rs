//! Core data model shared by discovery, analysis, and cleanup.
//!
//! Everything here is created fresh per scan pass and carries no identity
//! across scans; derived totals are always computed from current item state,
//! never cached.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::format;

/// One file or directory candidate for deletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub path: PathBuf,
    pub size: u64,
    pub is_dir: bool,
    pub selected: bool,
}

impl Item {
    pub fn new(path: PathBuf, size: u64, is_dir: bool) -> Self {
        Self {
            path,
            size,
            is_dir,
            selected: true,
        }
    }

    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Path for display, with the home prefix shown as ~
    pub fn display_path(&self) -> String {
        format::format_path(&self.path)
    }
}

/// The set of items discovered by one module or analyzer
#[derive(Debug, Clone)]
pub struct CategoryResult {
    pub category: String,
    pub icon: String,
    pub items: Vec<Item>,
}

impl CategoryResult {
    pub fn new(category: impl Into<String>, icon: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            category: category.into(),
            icon: icon.into(),
            items,
        }
    }

    /// Byte total of currently selected items
    pub fn selected_size(&self) -> u64 {
        self.items.iter().filter(|i| i.selected).map(|i| i.size).sum()
    }

    pub fn selected_count(&self) -> usize {
        self.items.iter().filter(|i| i.selected).count()
    }
}

/// Immutable snapshot of categories to be acted upon.
///
/// The sole input to the engine's destructive operations: what is deleted
/// matches exactly what the user reviewed.
#[derive(Debug, Clone)]
pub struct Report {
    pub categories: Vec<CategoryResult>,
    pub generated_at: DateTime<Utc>,
}

impl Report {
    pub fn new(categories: Vec<CategoryResult>) -> Self {
        Self {
            categories,
            generated_at: Utc::now(),
        }
    }

    /// Wrap a single analyzer category for the engine
    pub fn single(category: CategoryResult) -> Self {
        Self::new(vec![category])
    }

    pub fn total_size(&self) -> u64 {
        self.categories.iter().map(|c| c.selected_size()).sum()
    }

    pub fn total_files(&self) -> usize {
        self.categories.iter().map(|c| c.selected_count()).sum()
    }
}

/// Record of one soft-deleted item inside a [`Summary`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrashedItem {
    /// A genuine soft-delete that can be undone
    Moved {
        original: PathBuf,
        trashed: PathBuf,
        size: u64,
    },
    /// The item was already physically inside the trash root at scan time;
    /// no OS move occurred and there is nothing to restore
    AlreadyInTrash { path: PathBuf, size: u64 },
}

impl TrashedItem {
    /// The location the item currently occupies in the trash
    pub fn trashed_path(&self) -> &Path {
        match self {
            TrashedItem::Moved { trashed, .. } => trashed,
            TrashedItem::AlreadyInTrash { path, .. } => path,
        }
    }

    pub fn size(&self) -> u64 {
        match self {
            TrashedItem::Moved { size, .. } | TrashedItem::AlreadyInTrash { size, .. } => *size,
        }
    }
}

/// A per-item recoverable error from a clean batch
#[derive(Debug, Clone)]
pub struct ItemError {
    pub path: String,
    pub message: String,
}

/// Result of one engine call; input to restore/confirm
#[derive(Debug, Clone)]
pub struct Summary {
    pub total_cleaned: u64,
    pub files_removed: usize,
    pub errors: Vec<ItemError>,
    pub duration: Duration,
    pub completed_at: DateTime<Utc>,
    pub trashed_items: Vec<TrashedItem>,
}

/// User-controlled exclusion entry; persisted as camelCase JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhitelistEntry {
    pub id: Uuid,
    pub path: String,
    #[serde(default)]
    pub note: String,
    pub added_at: DateTime<Utc>,
}

impl WhitelistEntry {
    pub fn new(path: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            path: path.into(),
            note: note.into(),
            added_at: Utc::now(),
        }
    }
}

/// One completed clean, as recorded in the history store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanHistory {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub total_cleaned: u64,
    pub files_removed: usize,
    pub categories: Vec<CategorySummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub name: String,
    pub size: u64,
    pub count: usize,
}

impl CleanHistory {
    /// Snapshot the selected state of a report alongside its summary
    pub fn from_clean(report: &Report, summary: &Summary) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: summary.completed_at,
            total_cleaned: summary.total_cleaned,
            files_removed: summary.files_removed,
            categories: report
                .categories
                .iter()
                .map(|c| CategorySummary {
                    name: c.category.clone(),
                    size: c.selected_size(),
                    count: c.selected_count(),
                })
                .collect(),
        }
    }
}
