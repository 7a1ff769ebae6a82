//! Build-artifact detector: finds regenerable tool output inside project
//! trees (node_modules, target, Pods, …) so abandoned checkouts can be
//! slimmed without touching source.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use walkdir::WalkDir;

use super::ItemSource;
use crate::model::Item;
use crate::progress::Progress;
use crate::safety::sizing;

/// Directory names that are build output, with a display label
const ARTIFACT_DIRS: &[(&str, &str)] = &[
    ("node_modules", "Node.js"),
    (".next", "Next.js"),
    ("dist", "Build Output"),
    ("build", "Build Output"),
    ("target", "Rust/Maven"),
    (".gradle", "Gradle"),
    ("__pycache__", "Python"),
    (".pytest_cache", "Python Test"),
    (".tox", "Python Tox"),
    ("Pods", "CocoaPods"),
    (".build", "Swift SPM"),
    ("venv", "Python Venv"),
    (".venv", "Python Venv"),
    (".dart_tool", "Flutter/Dart"),
    ("vendor", "Vendor"),
];

/// One reclaimable artifact directory inside a project
#[derive(Debug, Clone)]
pub struct ProjectArtifact {
    /// Name of the containing project directory
    pub project: String,
    pub project_path: PathBuf,
    pub artifact_path: PathBuf,
    pub artifact_type: &'static str,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

impl ItemSource for ProjectArtifact {
    fn item(&self) -> Item {
        Item::new(self.artifact_path.clone(), self.size, true)
    }
}

fn artifact_type(name: &str) -> Option<&'static str> {
    ARTIFACT_DIRS
        .iter()
        .find(|(dir, _)| *dir == name)
        .map(|(_, label)| *label)
}

/// Walk the given roots for artifact directories, sorted by descending
/// size.
///
/// `.git` internals are never entered, and a found artifact is not
/// descended into — nested artifacts belong to the outer one. Artifacts
/// modified within the last `stale_days` days are considered in active
/// use and skipped (`0` disables the age filter).
pub fn scan(roots: &[PathBuf], stale_days: u32, progress: &Progress) -> Vec<ProjectArtifact> {
    let stale_threshold = Duration::from_secs(u64::from(stale_days) * 86_400);
    let mut results = Vec::new();

    for root in roots {
        if !root.exists() {
            continue;
        }

        let mut walker = WalkDir::new(root).follow_links(false).into_iter();
        while let Some(entry) = walker.next() {
            let Ok(entry) = entry else { continue };
            if !entry.file_type().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if name == ".git" {
                walker.skip_current_dir();
                continue;
            }
            let Some(kind) = artifact_type(&name) else {
                continue;
            };
            // Nested artifacts are covered by this one
            walker.skip_current_dir();

            let path = entry.path();
            let modified = std::fs::metadata(path).ok().and_then(|m| m.modified().ok());
            if stale_days > 0 {
                let in_use = modified
                    .and_then(|m| SystemTime::now().duration_since(m).ok())
                    .map(|age| age < stale_threshold)
                    .unwrap_or(false);
                if in_use {
                    continue;
                }
            }

            progress.visited(path);
            let size = sizing::scan_size(path);
            if size == 0 {
                continue;
            }

            results.push(ProjectArtifact {
                project: project_name(path),
                project_path: path.parent().map(Path::to_path_buf).unwrap_or_default(),
                artifact_path: path.to_path_buf(),
                artifact_type: kind,
                size,
                modified,
            });
        }
    }

    results.sort_by(|a, b| b.size.cmp(&a.size));
    results
}

fn project_name(artifact_path: &Path) -> String {
    artifact_path
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
