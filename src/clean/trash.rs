//! The soft-delete primitive: move a path into the trash root, renaming
//! on collision, and report the location actually assigned.

use std::io;
use std::path::{Path, PathBuf};

/// Move `path` into `trash_dir` and return the final location.
///
/// The destination keeps the original name when free; otherwise a ` 2`,
/// ` 3`, … suffix is inserted before the extension, mirroring what the
/// system trash does on collision.
pub(crate) fn trash_item(trash_dir: &Path, path: &Path) -> io::Result<PathBuf> {
    std::fs::create_dir_all(trash_dir)?;

    let name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("path has no file name: {}", path.display()),
        )
    })?;

    let dest = free_slot(trash_dir, Path::new(name))?;
    move_path(path, &dest)?;
    Ok(dest)
}

/// First collision-free destination for `name` inside `dir`
fn free_slot(dir: &Path, name: &Path) -> io::Result<PathBuf> {
    let plain = dir.join(name);
    if !plain.exists() {
        return Ok(plain);
    }

    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = name.extension().map(|e| e.to_string_lossy().into_owned());

    for n in 2u32.. {
        let candidate = match &ext {
            Some(ext) => dir.join(format!("{stem} {n}.{ext}")),
            None => dir.join(format!("{stem} {n}")),
        };
        if !candidate.exists() {
            return Ok(candidate);
        }
    }
    unreachable!()
}

/// Move a file or directory, falling back to copy-then-remove when a
/// rename crosses filesystems.
pub(crate) fn move_path(src: &Path, dst: &Path) -> io::Result<()> {
    if std::fs::rename(src, dst).is_ok() {
        return Ok(());
    }

    let metadata = std::fs::symlink_metadata(src)?;
    if metadata.is_dir() {
        copy_dir_recursive(src, dst)?;
        std::fs::remove_dir_all(src)?;
    } else {
        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(src, dst)?;
        std::fs::remove_file(src)?;
    }

    Ok(())
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> io::Result<()> {
    std::fs::create_dir_all(dst)?;

    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }

    Ok(())
}
