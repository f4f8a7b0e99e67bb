//! Supporting helpers: colored stderr prefixes, path display, file URIs.

use owo_colors::OwoColorize;
use std::path::Path;

/// Whether colored prefixes should be emitted (honors `NO_COLOR`).
pub fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

pub fn error_prefix() -> String {
    if colors_enabled() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn note_prefix() -> String {
    if colors_enabled() {
        "note:".yellow().bold().to_string()
    } else {
        "note:".to_string()
    }
}

pub fn info_prefix() -> String {
    if colors_enabled() {
        "info:".blue().bold().to_string()
    } else {
        "info:".to_string()
    }
}

/// Render a path relative to the working directory when possible.
pub fn rel_to_wd(p: &Path) -> String {
    let cwd = std::env::current_dir().unwrap_or_default();
    pathdiff::diff_paths(p, &cwd)
        .unwrap_or_else(|| p.to_path_buf())
        .to_string_lossy()
        .to_string()
}

/// Convert a host path into a `file://`-scheme URI.
///
/// Backslashes become forward slashes, Windows drive paths gain the
/// `file:///` triple-slash form, and the two characters that would break
/// the URI (`%`, space) are percent-encoded. Bare relative paths are
/// prefixed the same way so the report never carries a schemeless path.
pub fn file_uri(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    let escaped = normalized.replace('%', "%25").replace(' ', "%20");
    if let Some(rest) = escaped.strip_prefix("//") {
        // UNC share: \\server\share -> file://server/share
        return format!("file://{}", rest);
    }
    if escaped.starts_with('/') {
        return format!("file://{}", escaped);
    }
    format!("file:///{}", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_uri_windows_drive() {
        assert_eq!(file_uri(r"C:\p\f.sql"), "file:///C:/p/f.sql");
    }

    #[test]
    fn test_file_uri_unix_absolute() {
        assert_eq!(file_uri("/srv/db/proc.sql"), "file:///srv/db/proc.sql");
    }

    #[test]
    fn test_file_uri_escapes_spaces() {
        assert_eq!(
            file_uri(r"C:\My Projects\f.sql"),
            "file:///C:/My%20Projects/f.sql"
        );
    }

    #[test]
    fn test_file_uri_unc_share() {
        assert_eq!(file_uri(r"\\srv\share\f.sql"), "file://srv/share/f.sql");
    }
}
