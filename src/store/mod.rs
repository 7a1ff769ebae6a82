//! Whitelist and history persistence.
//!
//! Both stores are JSON arrays written atomically (temp file + rename)
//! with owner-only permissions, in the same per-user data directory as
//! the engine config.

pub mod history;
pub mod whitelist;

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::common::errors::Error;

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, Error> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let contents = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&contents).map_err(|e| Error::store(path, e))
}

fn save_json_atomic<T: Serialize>(path: &Path, entries: &[T]) -> Result<(), Error> {
    let dir = path.parent().ok_or_else(|| {
        Error::store(path, "store path has no parent directory")
    })?;
    create_private_dir(dir)?;

    let json = serde_json::to_string_pretty(entries).map_err(|e| Error::store(path, e))?;

    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).map_err(|e| Error::io(&tmp, e))?;
    restrict_permissions(&tmp)?;
    std::fs::rename(&tmp, path).map_err(|e| Error::io(path, e))
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> Result<(), Error> {
    use std::os::unix::fs::DirBuilderExt;
    if dir.exists() {
        return Ok(());
    }
    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(dir)
        .map_err(|e| Error::io(dir, e))
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> Result<(), Error> {
    std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), Error> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| Error::io(path, e))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), Error> {
    Ok(())
}
