//! Size computation under the two counting policies.
//!
//! General scan estimation counts allocated space of visible files only;
//! trash sizing counts apparent size including hidden files, since user
//! trash routinely contains dotfiles that matter for accurate
//! space-to-be-freed reporting. Neither policy follows symlinks.

use std::path::Path;

use walkdir::WalkDir;

/// Size of a file or directory for scan estimation: visible files only,
/// allocated space.
pub fn scan_size(path: &Path) -> u64 {
    let Ok(metadata) = std::fs::symlink_metadata(path) else {
        return 0;
    };
    if !metadata.is_dir() {
        return metadata.len();
    }

    WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.metadata().map(|m| allocated(&m)).unwrap_or(0))
        .sum()
}

/// Size of a trash entry: apparent size, hidden files included.
pub fn trash_size(path: &Path) -> u64 {
    let Ok(metadata) = std::fs::symlink_metadata(path) else {
        return 0;
    };
    if !metadata.is_dir() {
        return metadata.len();
    }

    WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.metadata().map(|m| m.len()).unwrap_or(0))
        .sum()
}

/// Physical disk usage, so sparse files are not overcounted
#[cfg(unix)]
fn allocated(metadata: &std::fs::Metadata) -> u64 {
    use std::os::unix::fs::MetadataExt;
    metadata.blocks() * 512
}

#[cfg(not(unix))]
fn allocated(metadata: &std::fs::Metadata) -> u64 {
    metadata.len()
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_is_zero() {
        assert_eq!(scan_size(Path::new("/nonexistent/x")), 0);
        assert_eq!(trash_size(Path::new("/nonexistent/x")), 0);
    }

    #[test]
    fn scan_policy_skips_hidden() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join(".DS_Store"), vec![0u8; 100]).unwrap();
        std::fs::create_dir(dir.path().join(".hidden")).unwrap();
        std::fs::write(dir.path().join(".hidden/inner"), vec![0u8; 100]).unwrap();

        assert_eq!(scan_size(dir.path()), 0);
    }

    #[test]
    fn trash_policy_counts_hidden_apparent_bytes() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join(".DS_Store"), vec![0u8; 100]).unwrap();
        std::fs::write(dir.path().join("visible"), vec![0u8; 50]).unwrap();

        assert_eq!(trash_size(dir.path()), 150);
    }

    #[test]
    fn scan_policy_counts_visible_files() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("data"), vec![0u8; 4096]).unwrap();

        // Allocated size is at least one block for non-empty files
        assert!(scan_size(dir.path()) > 0);
    }

    #[test]
    fn plain_file_uses_apparent_size() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("lone");
        std::fs::write(&file, vec![0u8; 321]).unwrap();

        assert_eq!(scan_size(&file), 321);
        assert_eq!(trash_size(&file), 321);
    }
}
