//! The destructive half of the pipeline: soft-delete, restore, confirm,
//! and the non-reversible direct path.
//!
//! Batches run strictly sequentially, one item at a time — trash and
//! filesystem operations on the same directory do not parallelize safely,
//! and the UI contract needs deterministic per-item progress numbering.
//! A single failing item never aborts a batch.

mod trash;

use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::common::format;
use crate::model::{Item, ItemError, Report, Summary, TrashedItem};
use crate::progress::Progress;
use crate::safety::PathSafetyGuard;

/// Executes deletions against an immutable [`Report`] snapshot.
///
/// Stateless across calls; the only held state is the path guard, which is
/// consulted before anything irreversible.
#[derive(Debug, Clone)]
pub struct CleanupEngine {
    guard: PathSafetyGuard,
}

impl CleanupEngine {
    pub fn new(guard: PathSafetyGuard) -> Self {
        Self { guard }
    }

    /// Move every selected item to the trash (reversible).
    ///
    /// Items whose containing directory was already trashed as a unit are
    /// skipped; items that already live inside the trash root are recorded
    /// as [`TrashedItem::AlreadyInTrash`] without any OS move.
    pub fn move_to_trash(&self, report: &Report, progress: &Progress) -> Summary {
        let start = Instant::now();
        let trash_dir = self.guard.trash_dir();

        let mut total_cleaned = 0u64;
        let mut files_removed = 0usize;
        let mut errors = Vec::new();
        let mut trashed_items = Vec::new();
        let mut trashed_dirs: Vec<PathBuf> = Vec::new();

        let selected = selected_items(report);
        let total = selected.len().max(1);

        for (index, item) in selected.iter().enumerate() {
            let display_path = format::format_path_in(&item.path, self.guard.home());
            progress.step((index + 1) as f64 / total as f64, &display_path);

            if covered_by(&trashed_dirs, item) {
                debug!(path = %display_path, "ancestor already trashed, skipping");
                continue;
            }

            // Items already in the trash are counted but not moved again
            let resolved = self.guard.resolve(&item.path);
            if resolved.starts_with(&trash_dir) && resolved != trash_dir {
                trashed_items.push(TrashedItem::AlreadyInTrash {
                    path: item.path.clone(),
                    size: item.size,
                });
                total_cleaned += item.size;
                files_removed += 1;
                if item.is_dir {
                    trashed_dirs.push(item.path.clone());
                }
                continue;
            }

            match trash::trash_item(&trash_dir, &item.path) {
                Ok(trashed) => {
                    trashed_items.push(TrashedItem::Moved {
                        original: item.path.clone(),
                        trashed,
                        size: item.size,
                    });
                    total_cleaned += item.size;
                    files_removed += 1;
                    if item.is_dir {
                        trashed_dirs.push(item.path.clone());
                    }
                }
                Err(e) => {
                    errors.push(ItemError {
                        path: display_path,
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            bytes = total_cleaned,
            files = files_removed,
            errors = errors.len(),
            "move to trash finished"
        );

        Summary {
            total_cleaned,
            files_removed,
            errors,
            duration: start.elapsed(),
            completed_at: Utc::now(),
            trashed_items,
        }
    }

    /// Undo a previous [`move_to_trash`](Self::move_to_trash).
    ///
    /// Best-effort and idempotent: per-item failures (most likely the file
    /// is already gone, or something new occupies the original path) are
    /// swallowed, and the returned count reflects only items actually
    /// moved back. Items that were already in the trash are left there.
    pub fn restore(&self, summary: &Summary) -> usize {
        let mut restored = 0usize;

        for trashed_item in &summary.trashed_items {
            let TrashedItem::Moved {
                original, trashed, ..
            } = trashed_item
            else {
                continue;
            };

            if original.exists() {
                debug!(path = %original.display(), "original path occupied, not restoring");
                continue;
            }

            if let Some(parent) = original.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    warn!(path = %parent.display(), error = %e, "cannot recreate parent");
                    continue;
                }
            }

            match trash::move_path(trashed, original) {
                Ok(()) => restored += 1,
                Err(e) => {
                    warn!(path = %original.display(), error = %e, "restore skipped");
                }
            }
        }

        info!(restored, "restore finished");
        restored
    }

    /// Permanently delete previously trashed items — the only operation
    /// here that makes a deletion unrecoverable.
    ///
    /// Each trashed path is re-validated to still resolve under the live
    /// trash root, guarding against the user having independently emptied
    /// the trash; anything that moved out is skipped without an error.
    pub fn confirm_permanent_delete(&self, summary: &Summary, progress: &Progress) -> usize {
        let trash_dir = self.guard.trash_dir();
        let total = summary.trashed_items.len().max(1);
        let mut deleted = 0usize;

        for (index, trashed_item) in summary.trashed_items.iter().enumerate() {
            let trashed = trashed_item.trashed_path();
            let name = trashed
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            progress.step((index + 1) as f64 / total as f64, &name);

            let resolved = self.guard.resolve(trashed);
            if !resolved.starts_with(&trash_dir) || resolved == trash_dir {
                debug!(path = %trashed.display(), "no longer under trash root, skipping");
                continue;
            }

            match self.guard.remove_item(trashed) {
                Ok(()) => deleted += 1,
                Err(e) => {
                    debug!(path = %trashed.display(), error = %e, "already gone");
                }
            }
        }

        info!(deleted, "permanent delete finished");
        deleted
    }

    /// Permanently delete selected items with no undo window.
    ///
    /// Applies the same ancestor-skip logic as the trash path but removes
    /// through the guard directly; the returned summary has nothing to
    /// restore.
    pub fn delete_items(&self, report: &Report, progress: &Progress) -> Summary {
        let start = Instant::now();

        let mut total_cleaned = 0u64;
        let mut files_removed = 0usize;
        let mut errors = Vec::new();
        let mut deleted_dirs: Vec<PathBuf> = Vec::new();

        let selected = selected_items(report);
        let total = selected.len().max(1);

        for (index, item) in selected.iter().enumerate() {
            let display = format::format_path_in(&item.path, self.guard.home());
            progress.step((index + 1) as f64 / total as f64, &display);

            if covered_by(&deleted_dirs, item) {
                continue;
            }

            match self.guard.remove_item(&item.path) {
                Ok(()) => {
                    total_cleaned += item.size;
                    files_removed += 1;
                    if item.is_dir {
                        deleted_dirs.push(item.path.clone());
                    }
                }
                Err(e) => {
                    errors.push(ItemError {
                        path: display,
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            bytes = total_cleaned,
            files = files_removed,
            errors = errors.len(),
            "direct delete finished"
        );

        Summary {
            total_cleaned,
            files_removed,
            errors,
            duration: start.elapsed(),
            completed_at: Utc::now(),
            trashed_items: Vec::new(),
        }
    }
}

/// Selected items across categories, flattened in review order
fn selected_items(report: &Report) -> Vec<&Item> {
    report
        .categories
        .iter()
        .flat_map(|c| c.items.iter().filter(|i| i.selected))
        .collect()
}

/// Whether a strict ancestor of `item` was already acted on as a unit
fn covered_by(dirs: &[PathBuf], item: &Item) -> bool {
    dirs.iter()
        .any(|dir| item.path.starts_with(dir) && item.path != *dir)
}
