use colored::*;
use std::path::Path;

use crate::pipeline::Stage;

/// Format file count with appropriate plural
pub fn format_count(count: usize) -> String {
    if count == 1 {
        "1 file".to_string()
    } else {
        format!("{} files", count)
    }
}

/// Format a path for display: relative to `base` when inside it,
/// otherwise with the home directory replaced by ~
pub fn format_path(path: &Path, base: &Path) -> String {
    if let Ok(stripped) = path.strip_prefix(base) {
        if !stripped.as_os_str().is_empty() {
            return stripped.display().to_string();
        }
    }
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

/// Format duration in human-readable form
pub fn format_duration(secs: f64) -> String {
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

/// Colorize a pipeline stage
pub fn format_stage(stage: Stage) -> ColoredString {
    match stage {
        Stage::Done => stage.to_string().green(),
        Stage::Idle => stage.to_string().dimmed(),
        _ => stage.to_string().yellow(),
    }
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}
