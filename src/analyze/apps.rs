//! Idle-application detector: `.app` bundles that have not been used for
//! a configurable window, with their associated support data.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::debug;

use super::ItemSource;
use crate::model::Item;
use crate::progress::Progress;
use crate::safety::{sizing, PathSafetyGuard};

/// Where an application keeps data outside its bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociatedKind {
    AppSupport,
    Caches,
    Preferences,
}

impl std::fmt::Display for AssociatedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AppSupport => write!(f, "Application Support"),
            Self::Caches => write!(f, "Caches"),
            Self::Preferences => write!(f, "Preferences"),
        }
    }
}

/// A path owned by an application outside its bundle
#[derive(Debug, Clone)]
pub struct AssociatedPath {
    pub path: PathBuf,
    pub size: u64,
    pub kind: AssociatedKind,
}

/// An installed application considered idle
#[derive(Debug, Clone)]
pub struct AppInfo {
    pub name: String,
    pub bundle_id: String,
    pub version: Option<String>,
    pub path: PathBuf,
    pub size: u64,
    pub last_used: Option<SystemTime>,
    pub associated: Vec<AssociatedPath>,
}

impl AppInfo {
    pub fn associated_size(&self) -> u64 {
        self.associated.iter().map(|a| a.size).sum()
    }

    pub fn total_size(&self) -> u64 {
        self.size + self.associated_size()
    }

    pub fn days_since_last_used(&self) -> Option<u64> {
        let last_used = self.last_used?;
        SystemTime::now()
            .duration_since(last_used)
            .ok()
            .map(|d| d.as_secs() / 86_400)
    }
}

impl ItemSource for AppInfo {
    fn item(&self) -> Item {
        Item::new(self.path.clone(), self.size, true)
    }
}

/// Find applications unused for longer than `idle_days`.
///
/// Looks in `/Applications` and `~/Applications`; Apple's own bundles are
/// skipped, and apps with no usage record at all are included. Results
/// sorted by descending total size.
pub fn scan(guard: &PathSafetyGuard, idle_days: u32, progress: &Progress) -> Vec<AppInfo> {
    let threshold = Duration::from_secs(u64::from(idle_days) * 86_400);
    let mut results = Vec::new();

    let roots = [
        PathBuf::from("/Applications"),
        guard.home().join("Applications"),
    ];

    for root in &roots {
        let Ok(listing) = std::fs::read_dir(root) else {
            continue;
        };

        for child in listing.filter_map(|c| c.ok()) {
            let bundle = child.path();
            if bundle.extension().and_then(|e| e.to_str()) != Some("app") {
                continue;
            }
            progress.visited(&bundle);

            let Some(app) = inspect_bundle(guard, &bundle) else {
                continue;
            };
            if app.bundle_id.starts_with("com.apple.") {
                continue;
            }

            // Recently used apps are not candidates; never-opened ones are
            if let Some(last_used) = app.last_used {
                let idle = SystemTime::now()
                    .duration_since(last_used)
                    .map(|age| age >= threshold)
                    .unwrap_or(false);
                if !idle {
                    continue;
                }
            }

            results.push(app);
        }
    }

    results.sort_by(|a, b| b.total_size().cmp(&a.total_size()));
    results
}

fn inspect_bundle(guard: &PathSafetyGuard, bundle: &Path) -> Option<AppInfo> {
    let name = bundle.file_stem()?.to_string_lossy().into_owned();

    let info_plist = bundle.join("Contents/Info.plist");
    let (bundle_id, version) = read_bundle_info(&info_plist)?;

    let size = sizing::scan_size(bundle);
    let last_used = last_used_date(bundle);
    let associated = associated_paths(guard.home(), &name, &bundle_id);

    Some(AppInfo {
        name,
        bundle_id,
        version,
        path: bundle.to_path_buf(),
        size,
        last_used,
        associated,
    })
}

/// Bundle identifier and marketing version from Info.plist
fn read_bundle_info(path: &Path) -> Option<(String, Option<String>)> {
    let value = match plist::Value::from_file(path) {
        Ok(v) => v,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "unreadable Info.plist");
            return None;
        }
    };
    let dict = value.as_dictionary()?;

    let bundle_id = dict
        .get("CFBundleIdentifier")
        .and_then(|v| v.as_string())
        .map(str::to_owned)?;
    let version = dict
        .get("CFBundleShortVersionString")
        .and_then(|v| v.as_string())
        .map(str::to_owned);

    Some((bundle_id, version))
}

/// Best available stand-in for a launch-services usage date
fn last_used_date(bundle: &Path) -> Option<SystemTime> {
    let metadata = std::fs::metadata(bundle).ok()?;
    metadata.accessed().or_else(|_| metadata.modified()).ok()
}

fn associated_paths(home: &Path, name: &str, bundle_id: &str) -> Vec<AssociatedPath> {
    let mut paths = Vec::new();

    let app_support = home.join("Library/Application Support").join(name);
    if app_support.exists() {
        paths.push(AssociatedPath {
            size: sizing::scan_size(&app_support),
            path: app_support,
            kind: AssociatedKind::AppSupport,
        });
    }

    let caches = home.join("Library/Caches").join(bundle_id);
    if caches.exists() {
        paths.push(AssociatedPath {
            size: sizing::scan_size(&caches),
            path: caches,
            kind: AssociatedKind::Caches,
        });
    }

    let prefs = home
        .join("Library/Preferences")
        .join(format!("{bundle_id}.plist"));
    if prefs.exists() {
        paths.push(AssociatedPath {
            size: sizing::scan_size(&prefs),
            path: prefs,
            kind: AssociatedKind::Preferences,
        });
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    const INFO_PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>CFBundleIdentifier</key>
    <string>{BUNDLE_ID}</string>
    <key>CFBundleShortVersionString</key>
    <string>2.1</string>
</dict>
</plist>
"#;

    fn make_bundle(dir: &Path, name: &str, bundle_id: &str) -> PathBuf {
        let bundle = dir.join(format!("{name}.app"));
        std::fs::create_dir_all(bundle.join("Contents/MacOS")).unwrap();
        std::fs::write(
            bundle.join("Contents/Info.plist"),
            INFO_PLIST.replace("{BUNDLE_ID}", bundle_id),
        )
        .unwrap();
        std::fs::write(bundle.join("Contents/MacOS/bin"), vec![0u8; 128]).unwrap();
        bundle
    }

    #[test]
    fn reads_bundle_metadata() {
        let tmp = tempfile::TempDir::new().unwrap();
        let home = tmp.path().canonicalize().unwrap();
        let guard = PathSafetyGuard::with_home(&home);
        let bundle = make_bundle(&home.join("Applications"), "Sketchpad", "com.example.sketchpad");

        let app = inspect_bundle(&guard, &bundle).unwrap();
        assert_eq!(app.name, "Sketchpad");
        assert_eq!(app.bundle_id, "com.example.sketchpad");
        assert_eq!(app.version.as_deref(), Some("2.1"));
        assert!(app.size > 0);
    }

    #[test]
    fn collects_associated_paths() {
        let tmp = tempfile::TempDir::new().unwrap();
        let home = tmp.path().canonicalize().unwrap();
        let guard = PathSafetyGuard::with_home(&home);

        let bundle = make_bundle(&home.join("Applications"), "Sketchpad", "com.example.sketchpad");
        let caches = home.join("Library/Caches/com.example.sketchpad");
        std::fs::create_dir_all(&caches).unwrap();
        std::fs::write(caches.join("tile"), vec![0u8; 64]).unwrap();

        let app = inspect_bundle(&guard, &bundle).unwrap();
        assert_eq!(app.associated.len(), 1);
        assert_eq!(app.associated[0].kind, AssociatedKind::Caches);
        assert!(app.total_size() >= app.size);
    }

    #[test]
    fn apple_bundles_are_skipped() {
        let tmp = tempfile::TempDir::new().unwrap();
        let home = tmp.path().canonicalize().unwrap();
        let guard = PathSafetyGuard::with_home(&home);
        make_bundle(&home.join("Applications"), "Safari", "com.apple.Safari");

        // Zero threshold makes every non-Apple app idle, so only the
        // Apple filter can explain an empty result.
        let found = scan(&guard, 0, &Progress::disabled());
        assert!(found.iter().all(|a| !a.bundle_id.starts_with("com.apple.")));
    }

    #[test]
    fn zero_threshold_includes_fresh_apps() {
        let tmp = tempfile::TempDir::new().unwrap();
        let home = tmp.path().canonicalize().unwrap();
        let guard = PathSafetyGuard::with_home(&home);
        make_bundle(&home.join("Applications"), "Sketchpad", "com.example.sketchpad");

        let found = scan(&guard, 0, &Progress::disabled());
        assert!(found.iter().any(|a| a.name == "Sketchpad"));
    }

    #[test]
    fn bundles_without_plist_are_ignored() {
        let tmp = tempfile::TempDir::new().unwrap();
        let home = tmp.path().canonicalize().unwrap();
        let guard = PathSafetyGuard::with_home(&home);
        std::fs::create_dir_all(home.join("Applications/Broken.app/Contents")).unwrap();

        let found = scan(&guard, 0, &Progress::disabled());
        assert!(found.iter().all(|a| a.name != "Broken"));
    }
}
