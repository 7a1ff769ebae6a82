use std::path::Path;
use std::time::Duration;

use bytesize::ByteSize;

/// Format bytes into a human-readable size string
pub fn format_size(bytes: u64) -> String {
    ByteSize(bytes).to_string_as(true)
}

/// Format a path for display, replacing the home prefix with ~
pub fn format_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

/// Same as [`format_path`] but against an explicit home root
pub fn format_path_in(path: &Path, home: &Path) -> String {
    if let Ok(stripped) = path.strip_prefix(home) {
        return format!("~/{}", stripped.display());
    }
    path.display().to_string()
}

/// Format a duration in human-readable form
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{}m {:.0}s", mins, remaining)
    }
}
