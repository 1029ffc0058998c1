//! Small helpers shared by the CLI printers.

use owo_colors::OwoColorize;
use std::path::Path;

/// Whether colored output is allowed (`NO_COLOR` unset and not JSON).
pub fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

pub fn error_prefix() -> String {
    if use_colors("human") {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn note_prefix() -> String {
    if use_colors("human") {
        "note:".yellow().bold().to_string()
    } else {
        "note:".to_string()
    }
}

pub fn info_prefix() -> String {
    if use_colors("human") {
        "info:".blue().bold().to_string()
    } else {
        "info:".to_string()
    }
}

/// Display `path` relative to the working directory when possible.
pub fn rel_to_wd(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|wd| pathdiff::diff_paths(path, wd))
        .filter(|p| !p.as_os_str().is_empty() && !p.starts_with(".."))
        .unwrap_or_else(|| path.to_path_buf())
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_use_colors_never_for_json() {
        assert!(!use_colors("json"));
    }

    #[test]
    fn test_rel_to_wd() {
        let wd = std::env::current_dir().unwrap();
        assert_eq!(rel_to_wd(&wd.join("results/index.html")), "results/index.html");
        assert_eq!(rel_to_wd(Path::new("/")), "/");
    }
}
