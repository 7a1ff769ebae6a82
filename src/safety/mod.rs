//! Path eligibility checks and the single chokepoint for irreversible
//! deletion.

pub mod sizing;

use std::path::{Component, Path, PathBuf};

use tracing::warn;

use crate::common::errors::Error;
use crate::model::WhitelistEntry;

/// Top-level user folders that are never eligible for programmatic
/// deletion, regardless of how a module or whitelist entry is configured.
const PROTECTED_HOME_DIRS: &[&str] = &[
    "Desktop",
    "Documents",
    "Downloads",
    "Pictures",
    "Movies",
    "Music",
];

/// Validates that paths are eligible for destructive operations.
///
/// The guard is rooted at a resolved home directory; everything it permits
/// is a strict descendant of that root. Construct with [`PathSafetyGuard::new`]
/// for the real user home, or [`PathSafetyGuard::with_home`] when embedding
/// against an explicit root.
#[derive(Debug, Clone)]
pub struct PathSafetyGuard {
    home: PathBuf,
}

impl PathSafetyGuard {
    pub fn new() -> Result<Self, Error> {
        let home = dirs::home_dir().ok_or(Error::NoHome)?;
        Ok(Self::with_home(home))
    }

    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        let home: PathBuf = home.into();
        let home = home.canonicalize().unwrap_or(home);
        Self { home }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// The live trash root for this home
    pub fn trash_dir(&self) -> PathBuf {
        self.resolve(&self.home.join(".Trash"))
    }

    /// Resolve symlinks where possible, falling back to lexical
    /// normalization for paths that do not (yet) exist.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| normalize(path))
    }

    /// Whether a path is eligible for destructive operation: a strict
    /// descendant of home that is not one of the protected folders.
    pub fn is_path_safe(&self, path: &Path) -> bool {
        let resolved = self.resolve(path);

        if resolved == self.home || !resolved.starts_with(&self.home) {
            return false;
        }

        !PROTECTED_HOME_DIRS
            .iter()
            .any(|dir| resolved == self.home.join(dir))
    }

    /// Whether the resolved path equals or is nested under any entry
    pub fn is_whitelisted(&self, path: &Path, entries: &[WhitelistEntry]) -> bool {
        let resolved = self.resolve(path);
        entries.iter().any(|entry| {
            let normalized = self.resolve(&self.expand(&entry.path));
            resolved.starts_with(&normalized)
        })
    }

    /// Expand a leading `~` in a whitelist entry against this guard's home
    fn expand(&self, raw: &str) -> PathBuf {
        if let Some(rest) = raw.strip_prefix("~/") {
            self.home.join(rest)
        } else if raw == "~" {
            self.home.clone()
        } else {
            PathBuf::from(raw)
        }
    }

    /// Permanently remove a file or directory.
    ///
    /// The single function permitted to perform an irreversible delete;
    /// it re-checks [`is_path_safe`](Self::is_path_safe) immediately before
    /// acting and fails closed rather than deleting.
    pub fn remove_item(&self, path: &Path) -> Result<(), Error> {
        if !self.is_path_safe(path) {
            warn!(path = %path.display(), "refusing to remove unsafe path");
            return Err(Error::UnsafePath(path.to_path_buf()));
        }

        let metadata =
            std::fs::symlink_metadata(path).map_err(|e| Error::io(path, e))?;
        if metadata.is_dir() {
            std::fs::remove_dir_all(path).map_err(|e| Error::io(path, e))
        } else {
            std::fs::remove_file(path).map_err(|e| Error::io(path, e))
        }
    }
}

/// Lexical normalization: resolves `.` and `..` without touching the
/// filesystem. Used for paths that cannot be canonicalized.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // The tempdir handle must outlive each test; `home` is the canonical
    // form so lexical fallbacks line up with canonicalized paths.
    fn guard() -> (tempfile::TempDir, PathBuf, PathSafetyGuard) {
        let tmp = tempfile::TempDir::new().unwrap();
        let home = tmp.path().canonicalize().unwrap();
        let guard = PathSafetyGuard::with_home(&home);
        (tmp, home, guard)
    }

    #[test]
    fn home_itself_is_unsafe() {
        let (_tmp, home, guard) = guard();
        assert!(!guard.is_path_safe(&home));
    }

    #[test]
    fn protected_folders_are_unsafe() {
        let (_tmp, home, guard) = guard();
        for dir in PROTECTED_HOME_DIRS {
            assert!(!guard.is_path_safe(&home.join(dir)), "{dir} must be protected");
        }
    }

    #[test]
    fn contents_of_protected_folders_are_eligible() {
        let (_tmp, home, guard) = guard();
        assert!(guard.is_path_safe(&home.join("Downloads/installer.dmg")));
    }

    #[test]
    fn paths_outside_home_are_unsafe() {
        let (_tmp, _home, guard) = guard();
        assert!(!guard.is_path_safe(Path::new("/tmp/free-for-all")));
        assert!(!guard.is_path_safe(Path::new("/usr/bin/ls")));
    }

    #[test]
    fn dotdot_cannot_escape_home() {
        let (_tmp, home, guard) = guard();
        let sneaky = home.join("Library/../../etc/passwd");
        assert!(!guard.is_path_safe(&sneaky));
    }

    #[test]
    fn cache_paths_are_safe() {
        let (_tmp, home, guard) = guard();
        assert!(guard.is_path_safe(&home.join("Library/Caches/com.example.app")));
        assert!(guard.is_path_safe(&home.join(".Trash/old")));
    }

    #[test]
    fn remove_item_fails_closed() {
        let (_tmp, home, guard) = guard();
        let err = guard.remove_item(&home).unwrap_err();
        assert!(matches!(err, Error::UnsafePath(_)));

        let err = guard.remove_item(Path::new("/tmp/other")).unwrap_err();
        assert!(matches!(err, Error::UnsafePath(_)));
    }

    #[test]
    fn remove_item_deletes_safe_paths() {
        let (_tmp, home, guard) = guard();
        let victim = home.join("Library/Caches/junk");
        std::fs::create_dir_all(&victim).unwrap();
        std::fs::write(victim.join("a.tmp"), b"x").unwrap();

        guard.remove_item(&victim).unwrap();
        assert!(!victim.exists());
    }

    #[test]
    fn whitelist_matches_nested_paths() {
        let (_tmp, home, guard) = guard();
        let entries = vec![WhitelistEntry::new(
            home.join("Library/Caches/keep").display().to_string(),
            "",
        )];

        assert!(guard.is_whitelisted(&home.join("Library/Caches/keep"), &entries));
        assert!(guard.is_whitelisted(&home.join("Library/Caches/keep/sub/file"), &entries));
        assert!(!guard.is_whitelisted(&home.join("Library/Caches/keeper"), &entries));
        assert!(!guard.is_whitelisted(&home.join("Library/Caches/other"), &entries));
    }

    #[test]
    fn whitelist_expands_tilde() {
        let (_tmp, home, guard) = guard();
        let entries = vec![WhitelistEntry::new("~/Library/Caches/keep", "")];
        assert!(guard.is_whitelisted(&home.join("Library/Caches/keep/x"), &entries));
    }
}
