//! Scan orchestration: concurrent module fan-out, whitelist filtering,
//! and cross-category deduplication.

pub mod catalog;

use std::collections::HashSet;
use std::path::PathBuf;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::model::{CategoryResult, WhitelistEntry};
use crate::progress::Progress;
use crate::safety::PathSafetyGuard;

/// A discovery module that failed; the other categories are unaffected.
#[derive(Debug, Clone)]
pub struct ModuleError {
    pub module: String,
    pub message: String,
}

/// Everything one scan pass produced
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub categories: Vec<CategoryResult>,
    pub module_errors: Vec<ModuleError>,
}

/// Runs every discovery module concurrently and merges the results.
///
/// Stateless with respect to prior calls: each scan takes its full input
/// as parameters and returns a self-contained outcome.
#[derive(Debug, Clone)]
pub struct ScanOrchestrator {
    guard: PathSafetyGuard,
}

impl ScanOrchestrator {
    pub fn new(guard: PathSafetyGuard) -> Self {
        Self { guard }
    }

    /// Scan all modules, excluding whitelisted items, and deduplicate
    /// overlapping results so a path is attributed to at most one category.
    ///
    /// A failing module is isolated: it contributes a [`ModuleError`] and
    /// no category, and the remaining categories are returned as usual.
    pub fn scan(&self, whitelist: &[WhitelistEntry], progress: &Progress) -> ScanOutcome {
        let results: Vec<_> = catalog::builtin_modules()
            .par_iter()
            .map(|module| (module, module.scan(&self.guard, progress)))
            .collect();

        let mut categories = Vec::new();
        let mut module_errors = Vec::new();

        for (module, result) in results {
            match result {
                Ok(items) => {
                    let kept: Vec<_> = items
                        .into_iter()
                        .filter(|item| !self.guard.is_whitelisted(&item.path, whitelist))
                        .collect();
                    if !kept.is_empty() {
                        categories.push(CategoryResult::new(module.name, module.icon, kept));
                    }
                }
                Err(e) => {
                    warn!(module = module.name, error = %e, "module scan failed");
                    module_errors.push(ModuleError {
                        module: module.name.to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        let categories = dedup(categories);
        info!(
            categories = categories.len(),
            errors = module_errors.len(),
            "scan complete"
        );

        ScanOutcome {
            categories,
            module_errors,
        }
    }
}

/// Deduplicate categories largest-first.
///
/// Walks categories by descending selected size with a running set of
/// claimed paths; an item is dropped when its exact path or any ancestor
/// directory is already claimed, so a directory's claim absorbs all of its
/// descendants even when a smaller category also scanned inside it.
/// Categories left empty are dropped. The pass is idempotent.
pub fn dedup(mut categories: Vec<CategoryResult>) -> Vec<CategoryResult> {
    categories.sort_by(|a, b| b.selected_size().cmp(&a.selected_size()));

    let mut claimed: HashSet<PathBuf> = HashSet::new();
    let mut out = Vec::new();

    for mut category in categories {
        category.items.retain(|item| {
            let dominated = item
                .path
                .ancestors()
                .any(|ancestor| claimed.contains(ancestor));
            if dominated {
                return false;
            }
            claimed.insert(item.path.clone());
            true
        });

        if !category.items.is_empty() {
            out.push(category);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Item;
    use std::path::Path;

    fn item(path: &str, size: u64) -> Item {
        Item::new(PathBuf::from(path), size, true)
    }

    fn category(name: &str, items: Vec<Item>) -> CategoryResult {
        CategoryResult::new(name, "folder", items)
    }

    #[test]
    fn larger_category_wins_shared_path() {
        let deduped = dedup(vec![
            category("Small", vec![item("/h/Library/Caches/X", 10)]),
            category("Big", vec![item("/h/Library/Caches/X", 500)]),
        ]);

        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].category, "Big");
        assert_eq!(deduped[0].items[0].size, 500);
    }

    #[test]
    fn directory_claim_absorbs_descendants() {
        let deduped = dedup(vec![
            category("Dirs", vec![item("/h/Library/Caches", 1000)]),
            category("Files", vec![item("/h/Library/Caches/app/blob", 10)]),
        ]);

        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].category, "Dirs");
    }

    #[test]
    fn unrelated_paths_survive() {
        let deduped = dedup(vec![
            category("A", vec![item("/h/Library/Caches/one", 100)]),
            category("B", vec![item("/h/Library/Logs/two", 50)]),
        ]);

        assert_eq!(deduped.len(), 2);
    }

    #[test]
    fn dedup_is_idempotent() {
        let once = dedup(vec![
            category("A", vec![item("/h/a", 100), item("/h/a/b", 10)]),
            category("B", vec![item("/h/a/c", 20), item("/h/d", 5)]),
        ]);
        let sizes: Vec<Vec<u64>> = once
            .iter()
            .map(|c| c.items.iter().map(|i| i.size).collect())
            .collect();

        let twice = dedup(once.clone());
        let sizes_again: Vec<Vec<u64>> = twice
            .iter()
            .map(|c| c.items.iter().map(|i| i.size).collect())
            .collect();

        assert_eq!(sizes, sizes_again);
    }

    #[test]
    fn emptied_categories_are_dropped() {
        let deduped = dedup(vec![
            category("Winner", vec![item("/h/x", 100)]),
            category("Loser", vec![item("/h/x/child", 1)]),
        ]);

        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].category, "Winner");
    }

    #[test]
    fn orchestrator_respects_whitelist() {
        let tmp = tempfile::TempDir::new().unwrap();
        let home = tmp.path().canonicalize().unwrap();
        let caches = home.join("Library/Caches");
        std::fs::create_dir_all(caches.join("keep-me")).unwrap();
        std::fs::write(caches.join("keep-me/data"), vec![0u8; 10]).unwrap();
        std::fs::create_dir_all(caches.join("scrap-me")).unwrap();
        std::fs::write(caches.join("scrap-me/data"), vec![0u8; 10]).unwrap();

        let whitelist = vec![WhitelistEntry::new(
            caches.join("keep-me").display().to_string(),
            "",
        )];

        let orchestrator = ScanOrchestrator::new(PathSafetyGuard::with_home(&home));
        let outcome = orchestrator.scan(&whitelist, &Progress::disabled());

        let all_paths: Vec<&Path> = outcome
            .categories
            .iter()
            .flat_map(|c| c.items.iter().map(|i| i.path.as_path()))
            .collect();

        assert!(all_paths.iter().any(|p| p.ends_with("scrap-me")));
        assert!(!all_paths.iter().any(|p| p.ends_with("keep-me")));
        assert!(outcome.module_errors.is_empty());
    }

    #[test]
    fn clean_system_scans_empty() {
        let tmp = tempfile::TempDir::new().unwrap();
        let home = tmp.path().canonicalize().unwrap();

        let orchestrator = ScanOrchestrator::new(PathSafetyGuard::with_home(&home));
        let outcome = orchestrator.scan(&[], &Progress::disabled());

        assert!(outcome.categories.is_empty());
        assert!(outcome.module_errors.is_empty());
    }
}
