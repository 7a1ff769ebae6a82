//! The discovery catalog: one data-driven scanner fed by declarative
//! tables of well-known, home-relative locations.
//!
//! Adding a vendor or tool is a table row, not a new type. Modules are
//! pure producers — they never delete anything.

use std::path::Path;

use tracing::debug;

use crate::common::errors::Error;
use crate::model::Item;
use crate::progress::Progress;
use crate::safety::{sizing, PathSafetyGuard};

/// How a catalog entry turns into candidate items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMode {
    /// The path itself is one candidate
    Whole,
    /// Each immediate child is a candidate
    Children,
    /// Each immediate child directory is a candidate
    ChildDirs,
}

/// One row of a discovery table
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub label: &'static str,
    pub rel_path: &'static str,
    pub mode: EntryMode,
}

const fn entry(label: &'static str, rel_path: &'static str, mode: EntryMode) -> CatalogEntry {
    CatalogEntry {
        label,
        rel_path,
        mode,
    }
}

/// Discovery strategy for one module
#[derive(Debug, Clone, Copy)]
pub enum Discovery {
    /// Catalog of known home-relative paths
    Table(&'static [CatalogEntry]),
    /// Files directly inside the listed dirs whose extension matches
    FilesByExtension {
        dirs: &'static [&'static str],
        extensions: &'static [&'static str],
    },
    /// The trash root's immediate children, with trash-policy sizing
    Trash,
}

/// A single discovery category: name, icon, and how to find its items
#[derive(Debug, Clone, Copy)]
pub struct DiscoveryModule {
    pub name: &'static str,
    pub icon: &'static str,
    pub discovery: Discovery,
}

// ─── Built-in catalogs ────────────────────────────────────────────────────────

const SYSTEM_CACHE: &[CatalogEntry] = &[
    entry("User Caches", "Library/Caches", EntryMode::Children),
    entry("Dotfile Caches", ".cache", EntryMode::Children),
];

const SYSTEM_LOGS: &[CatalogEntry] = &[
    entry("User Logs", "Library/Logs", EntryMode::Children),
];

const BROWSER_CACHE: &[CatalogEntry] = &[
    entry("Chrome", "Library/Caches/Google/Chrome", EntryMode::Whole),
    entry("Safari", "Library/Caches/com.apple.Safari", EntryMode::Whole),
    entry("Firefox", "Library/Caches/Firefox", EntryMode::Whole),
    entry("Arc", "Library/Caches/company.thebrowser.Browser", EntryMode::Whole),
];

const XCODE: &[CatalogEntry] = &[
    entry("DerivedData", "Library/Developer/Xcode/DerivedData", EntryMode::Children),
    entry("Archives", "Library/Developer/Xcode/Archives", EntryMode::Children),
    entry("iOS Device Logs", "Library/Developer/Xcode/iOS Device Logs", EntryMode::Whole),
    entry("Simulator Caches", "Library/Developer/CoreSimulator/Caches", EntryMode::Whole),
    entry("Xcode Cache", "Library/Caches/com.apple.dt.Xcode", EntryMode::Whole),
    entry("Build Products", "Library/Developer/Xcode/Products", EntryMode::Whole),
    entry("Simulator Logs", "Library/Logs/CoreSimulator", EntryMode::Whole),
];

const HOMEBREW: &[CatalogEntry] = &[
    entry("Homebrew Cache", "Library/Caches/Homebrew", EntryMode::Children),
];

const PACKAGE_MANAGERS: &[CatalogEntry] = &[
    entry("npm", ".npm/_cacache", EntryMode::Whole),
    entry("Yarn", "Library/Caches/Yarn", EntryMode::Whole),
    entry("pnpm", "Library/pnpm/store", EntryMode::Whole),
    entry("bun", ".bun/install/cache", EntryMode::Whole),
    entry("pip", "Library/Caches/pip", EntryMode::Whole),
    entry("Poetry", "Library/Caches/pypoetry", EntryMode::Whole),
    entry("Go Modules", "go/pkg/mod/cache", EntryMode::Whole),
    entry("Cargo", ".cargo/registry/cache", EntryMode::Whole),
    entry("Gradle", ".gradle/caches", EntryMode::Whole),
    entry("CocoaPods", "Library/Caches/CocoaPods", EntryMode::Whole),
    entry("Composer", "Library/Caches/composer", EntryMode::Whole),
    entry("Maven", ".m2/repository", EntryMode::Whole),
    entry("NuGet", ".nuget/packages", EntryMode::Whole),
];

const APP_CACHE: &[CatalogEntry] = &[
    entry("Spotify", "Library/Caches/com.spotify.client", EntryMode::Whole),
    entry("Slack", "Library/Caches/com.tinyspeck.slackmacgap", EntryMode::Whole),
    entry("Slack", "Library/Application Support/Slack/Cache", EntryMode::Whole),
    entry("Discord", "Library/Caches/com.hnc.Discord", EntryMode::Whole),
    entry("Discord", "Library/Application Support/discord/Cache", EntryMode::Whole),
    entry("Telegram", "Library/Caches/ru.keepcoder.Telegram", EntryMode::Whole),
    entry("Microsoft Teams", "Library/Caches/com.microsoft.teams2", EntryMode::Whole),
    entry("Microsoft Teams", "Library/Application Support/Microsoft/Teams/Cache", EntryMode::Whole),
    entry("Steam", "Library/Application Support/Steam/appcache", EntryMode::Whole),
    entry("Steam", "Library/Application Support/Steam/depotcache", EntryMode::Whole),
    entry("Steam", "Library/Application Support/Steam/logs", EntryMode::Whole),
    entry("Adobe", "Library/Caches/Adobe", EntryMode::Whole),
    entry("Adobe", "Library/Application Support/Adobe/Common/Media Cache Files", EntryMode::Whole),
    entry("JetBrains", "Library/Caches/JetBrains", EntryMode::Whole),
    entry("JetBrains", "Library/Logs/JetBrains", EntryMode::Whole),
    entry("VS Code", "Library/Caches/com.microsoft.VSCode", EntryMode::Whole),
    entry("VS Code", "Library/Application Support/Code/logs", EntryMode::Whole),
    entry("VS Code", "Library/Application Support/Code/CachedData", EntryMode::Whole),
    entry("VS Code", "Library/Application Support/Code/CachedExtensions", EntryMode::Whole),
    entry("Obsidian", "Library/Caches/md.obsidian", EntryMode::Whole),
    entry("Obsidian", "Library/Application Support/obsidian/Cache", EntryMode::Whole),
    entry("Zoom", "Library/Caches/us.zoom.xos", EntryMode::Whole),
    entry("WeChat", "Library/Caches/com.tencent.xinWeChat", EntryMode::Whole),
    entry("WhatsApp", "Library/Caches/net.whatsapp.WhatsApp", EntryMode::Whole),
    entry("Figma", "Library/Caches/com.figma.Desktop", EntryMode::Whole),
    entry("Sketch", "Library/Caches/com.bohemiancoding.sketch3", EntryMode::Whole),
    entry("Dropbox", "Library/Dropbox/.dropbox.cache", EntryMode::Whole),
    entry("Dropbox", "Dropbox/.dropbox.cache", EntryMode::Whole),
    entry("Google Drive", "Library/Application Support/Google/DriveFS", EntryMode::Whole),
    entry("Claude", "Library/Caches/com.anthropic.claudefordesktop", EntryMode::Whole),
    entry("Claude", "Library/Logs/Claude", EntryMode::Whole),
    entry("ChatGPT", "Library/Caches/com.openai.chat", EntryMode::Whole),
];

const DEVICE_BACKUPS: &[CatalogEntry] = &[
    entry("iOS Backups", "Library/Application Support/MobileSync/Backup", EntryMode::ChildDirs),
];

const MODULES: &[DiscoveryModule] = &[
    DiscoveryModule {
        name: "System Cache",
        icon: "folder.badge.gearshape",
        discovery: Discovery::Table(SYSTEM_CACHE),
    },
    DiscoveryModule {
        name: "System Logs",
        icon: "doc.text",
        discovery: Discovery::Table(SYSTEM_LOGS),
    },
    DiscoveryModule {
        name: "Browser Cache",
        icon: "globe",
        discovery: Discovery::Table(BROWSER_CACHE),
    },
    DiscoveryModule {
        name: "Xcode",
        icon: "hammer",
        discovery: Discovery::Table(XCODE),
    },
    DiscoveryModule {
        name: "Homebrew",
        icon: "mug",
        discovery: Discovery::Table(HOMEBREW),
    },
    DiscoveryModule {
        name: "Dev Tools Cache",
        icon: "wrench.and.screwdriver",
        discovery: Discovery::Table(PACKAGE_MANAGERS),
    },
    DiscoveryModule {
        name: "App Cache",
        icon: "app.dashed",
        discovery: Discovery::Table(APP_CACHE),
    },
    DiscoveryModule {
        name: "Installers",
        icon: "shippingbox",
        discovery: Discovery::FilesByExtension {
            dirs: &["Downloads", "Desktop"],
            extensions: &["dmg", "pkg", "iso", "xip"],
        },
    },
    DiscoveryModule {
        name: "iOS Backups",
        icon: "iphone",
        discovery: Discovery::Table(DEVICE_BACKUPS),
    },
    DiscoveryModule {
        name: "Trash",
        icon: "trash",
        discovery: Discovery::Trash,
    },
];

/// All built-in discovery modules, in catalog order
pub fn builtin_modules() -> &'static [DiscoveryModule] {
    MODULES
}

// ─── Scanning ─────────────────────────────────────────────────────────────────

impl DiscoveryModule {
    /// Find this category's candidate items, sorted by descending size.
    ///
    /// Only candidates with a nonzero size are emitted; every touched path
    /// is reported to the progress sink first.
    pub fn scan(&self, guard: &PathSafetyGuard, progress: &Progress) -> Result<Vec<Item>, Error> {
        let mut items = match self.discovery {
            Discovery::Table(entries) => self.scan_table(guard.home(), entries, progress)?,
            Discovery::FilesByExtension { dirs, extensions } => {
                self.scan_extensions(guard.home(), dirs, extensions, progress)
            }
            Discovery::Trash => self.scan_trash(guard, progress),
        };

        items.sort_by(|a, b| b.size.cmp(&a.size));
        debug!(module = self.name, count = items.len(), "module scan complete");
        Ok(items)
    }

    fn scan_table(
        &self,
        home: &Path,
        entries: &[CatalogEntry],
        progress: &Progress,
    ) -> Result<Vec<Item>, Error> {
        let mut items = Vec::new();

        for entry in entries {
            let path = home.join(entry.rel_path);
            let Ok(metadata) = std::fs::symlink_metadata(&path) else {
                continue;
            };

            match entry.mode {
                EntryMode::Whole => {
                    progress.visited(&path);
                    let size = sizing::scan_size(&path);
                    if size > 0 {
                        items.push(Item::new(path, size, metadata.is_dir()));
                    }
                }
                EntryMode::Children | EntryMode::ChildDirs => {
                    let dirs_only = entry.mode == EntryMode::ChildDirs;
                    progress.visited(&path);
                    let listing = std::fs::read_dir(&path).map_err(|e| Error::ScanFailure {
                        module: self.name.to_string(),
                        message: format!("cannot list '{}': {}", path.display(), e),
                    })?;

                    for child in listing.filter_map(|c| c.ok()) {
                        let child_path = child.path();
                        if is_hidden(&child_path) {
                            continue;
                        }
                        let is_dir =
                            child.file_type().map(|t| t.is_dir()).unwrap_or(false);
                        if dirs_only && !is_dir {
                            continue;
                        }

                        progress.visited(&child_path);
                        let size = sizing::scan_size(&child_path);
                        if size > 0 {
                            items.push(Item::new(child_path, size, is_dir));
                        }
                    }
                }
            }
        }

        Ok(items)
    }

    fn scan_extensions(
        &self,
        home: &Path,
        dirs: &[&str],
        extensions: &[&str],
        progress: &Progress,
    ) -> Vec<Item> {
        let mut items = Vec::new();

        for dir in dirs {
            let dir_path = home.join(dir);
            let Ok(listing) = std::fs::read_dir(&dir_path) else {
                continue;
            };

            for child in listing.filter_map(|c| c.ok()) {
                let path = child.path();
                if is_hidden(&path) {
                    continue;
                }
                let matches = path
                    .extension()
                    .map(|e| {
                        let ext = e.to_string_lossy().to_lowercase();
                        extensions.contains(&ext.as_str())
                    })
                    .unwrap_or(false);
                if !matches {
                    continue;
                }

                progress.visited(&path);
                let size = child.metadata().map(|m| m.len()).unwrap_or(0);
                if size > 0 {
                    items.push(Item::new(path, size, false));
                }
            }
        }

        items
    }

    /// Trash contents: `.DS_Store` and the trash's own metadata folder are
    /// skipped, and permission errors degrade to an empty result.
    fn scan_trash(&self, guard: &PathSafetyGuard, progress: &Progress) -> Vec<Item> {
        let trash = guard.trash_dir();
        progress.visited(&trash);

        let listing = match std::fs::read_dir(&trash) {
            Ok(listing) => listing,
            Err(e) => {
                debug!(error = %e, "trash not listable, returning empty");
                return Vec::new();
            }
        };

        let mut items = Vec::new();
        for child in listing.filter_map(|c| c.ok()) {
            let path = child.path();
            let name = child.file_name();
            if name == ".DS_Store" || name == ".Trashes" {
                continue;
            }

            progress.visited(&path);
            let is_dir = child.file_type().map(|t| t.is_dir()).unwrap_or(false);
            let size = sizing::trash_size(&path);
            if size > 0 {
                items.push(Item::new(path, size, is_dir));
            }
        }

        items
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (tempfile::TempDir, std::path::PathBuf, PathSafetyGuard) {
        let tmp = tempfile::TempDir::new().unwrap();
        let home = tmp.path().canonicalize().unwrap();
        let guard = PathSafetyGuard::with_home(&home);
        (tmp, home, guard)
    }

    fn module_named(name: &str) -> &'static DiscoveryModule {
        builtin_modules().iter().find(|m| m.name == name).unwrap()
    }

    #[test]
    fn ten_builtin_modules() {
        assert_eq!(builtin_modules().len(), 10);
    }

    #[test]
    fn children_mode_lists_cache_subdirs() {
        let (_tmp, home, guard) = fixture();
        let caches = home.join("Library/Caches");
        std::fs::create_dir_all(caches.join("com.example.one")).unwrap();
        std::fs::write(caches.join("com.example.one/blob"), vec![0u8; 10]).unwrap();
        std::fs::create_dir_all(caches.join("com.example.empty")).unwrap();

        let items = module_named("System Cache")
            .scan(&guard, &Progress::disabled())
            .unwrap();

        assert_eq!(items.len(), 1, "empty children are suppressed");
        assert!(items[0].path.ends_with("com.example.one"));
        assert!(items[0].is_dir);
    }

    #[test]
    fn whole_mode_emits_existing_paths_only() {
        let (_tmp, home, guard) = fixture();
        let yarn = home.join("Library/Caches/Yarn");
        std::fs::create_dir_all(&yarn).unwrap();
        std::fs::write(yarn.join("pkg.tgz"), vec![0u8; 64]).unwrap();

        let items = module_named("Dev Tools Cache")
            .scan(&guard, &Progress::disabled())
            .unwrap();

        assert_eq!(items.len(), 1);
        assert!(items[0].path.ends_with("Library/Caches/Yarn"));
    }

    #[test]
    fn results_sorted_by_descending_size() {
        let (_tmp, home, guard) = fixture();
        let caches = home.join("Library/Caches");
        std::fs::create_dir_all(caches.join("small")).unwrap();
        std::fs::write(caches.join("small/f"), vec![0u8; 512]).unwrap();
        std::fs::create_dir_all(caches.join("big")).unwrap();
        std::fs::write(caches.join("big/f"), vec![0u8; 1024 * 1024]).unwrap();

        let items = module_named("System Cache")
            .scan(&guard, &Progress::disabled())
            .unwrap();

        assert_eq!(items.len(), 2);
        assert!(items[0].path.ends_with("big"));
        assert!(items[0].size >= items[1].size);
    }

    #[test]
    fn installer_module_filters_extensions() {
        let (_tmp, home, guard) = fixture();
        let downloads = home.join("Downloads");
        std::fs::create_dir_all(&downloads).unwrap();
        std::fs::write(downloads.join("tool.dmg"), vec![0u8; 10]).unwrap();
        std::fs::write(downloads.join("notes.txt"), vec![0u8; 10]).unwrap();
        std::fs::write(downloads.join("UPPER.PKG"), vec![0u8; 10]).unwrap();

        let mut items = module_named("Installers")
            .scan(&guard, &Progress::disabled())
            .unwrap();
        items.sort_by(|a, b| a.path.cmp(&b.path));

        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| !i.is_dir));
    }

    #[test]
    fn trash_module_filters_metadata_names() {
        let (_tmp, home, guard) = fixture();
        let trash = home.join(".Trash");
        std::fs::create_dir_all(&trash).unwrap();
        std::fs::write(trash.join(".DS_Store"), vec![0u8; 10]).unwrap();
        std::fs::write(trash.join("old-report.pdf"), vec![0u8; 10]).unwrap();
        std::fs::write(trash.join(".hidden-but-real"), vec![0u8; 10]).unwrap();

        let items = module_named("Trash")
            .scan(&guard, &Progress::disabled())
            .unwrap();

        let names: Vec<String> = items.iter().map(|i| i.name()).collect();
        assert!(names.contains(&"old-report.pdf".to_string()));
        assert!(names.contains(&".hidden-but-real".to_string()));
        assert!(!names.contains(&".DS_Store".to_string()));
    }

    #[test]
    fn missing_trash_degrades_to_empty() {
        let (_tmp, _home, guard) = fixture();
        let items = module_named("Trash")
            .scan(&guard, &Progress::disabled())
            .unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn backups_module_ignores_loose_files() {
        let (_tmp, home, guard) = fixture();
        let backups = home.join("Library/Application Support/MobileSync/Backup");
        std::fs::create_dir_all(backups.join("device-a")).unwrap();
        std::fs::write(backups.join("device-a/manifest.db"), vec![0u8; 32]).unwrap();
        std::fs::write(backups.join("stray.plist"), vec![0u8; 32]).unwrap();

        let items = module_named("iOS Backups")
            .scan(&guard, &Progress::disabled())
            .unwrap();

        assert_eq!(items.len(), 1);
        assert!(items[0].path.ends_with("device-a"));
    }
}
