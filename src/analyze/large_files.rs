//! Large-file analyzer: walks the home tree for files at or above a size
//! threshold and classifies them by extension.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use walkdir::WalkDir;

use super::ItemSource;
use crate::model::Item;
use crate::progress::Progress;
use crate::safety::PathSafetyGuard;

/// Coarse classification of an oversized file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    Video,
    Archive,
    DiskImage,
    Installer,
    VirtualMachine,
    Other,
}

impl FileCategory {
    pub fn categorize(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "mp4" | "mov" | "avi" | "mkv" | "wmv" | "flv" | "webm" | "m4v" => Self::Video,
            "zip" | "tar" | "gz" | "rar" | "7z" | "bz2" | "xz" | "tgz" => Self::Archive,
            "dmg" | "iso" | "img" | "sparseimage" | "sparsebundle" => Self::DiskImage,
            "pkg" | "xip" | "mpkg" => Self::Installer,
            "vmdk" | "vdi" | "qcow2" | "vmwarevm" | "vhd" | "ova" => Self::VirtualMachine,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for FileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Video => write!(f, "Videos"),
            Self::Archive => write!(f, "Archives"),
            Self::DiskImage => write!(f, "Disk Images"),
            Self::Installer => write!(f, "Installers"),
            Self::VirtualMachine => write!(f, "Virtual Machines"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// One oversized file
#[derive(Debug, Clone)]
pub struct LargeFile {
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<SystemTime>,
    pub category: FileCategory,
}

impl ItemSource for LargeFile {
    fn item(&self) -> Item {
        Item::new(self.path.clone(), self.size, false)
    }
}

/// Find files at or above `threshold_bytes` under home, sorted by
/// descending size.
///
/// Hidden directories and the root-level `Library` tree are skipped — the
/// catalog modules already own everything reclaimable in there.
pub fn scan(guard: &PathSafetyGuard, threshold_bytes: u64, progress: &Progress) -> Vec<LargeFile> {
    let home = guard.home();
    let mut results = Vec::new();

    let walker = WalkDir::new(home).follow_links(false).into_iter();
    for entry in walker
        .filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            if name.starts_with('.') {
                return false;
            }
            !(e.depth() == 1 && name == "Library")
        })
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        let size = metadata.len();
        if size < threshold_bytes {
            continue;
        }

        progress.visited(entry.path());
        results.push(LargeFile {
            path: entry.path().to_path_buf(),
            size,
            modified: metadata.modified().ok(),
            category: FileCategory::categorize(entry.path()),
        });
    }

    results.sort_by(|a, b| b.size.cmp(&a.size));
    results
}
