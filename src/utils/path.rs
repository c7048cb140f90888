//! Filesystem path helpers.

use std::path::{Path, PathBuf};

/// File extensions treated as HTML documents.
pub const HTML_EXTENSIONS: [&str; 2] = ["html", "htm"];

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first, then falls back to joining relative paths
/// onto the current directory.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Resolve a CLI path: cwd-relative if it exists, else relative to `fallback_dir`.
///
/// Always returns an absolute path.
#[inline]
pub fn resolve_path(path: &Path, fallback_dir: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }

    if path.exists() {
        return normalize_path(path);
    }

    normalize_path(&fallback_dir.join(path))
}

/// Check the extension against [`HTML_EXTENSIONS`] (case-insensitive).
#[inline]
pub fn is_html_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| HTML_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

/// Where an input file lands inside `output_dir`.
///
/// Files under `input_root` keep their relative layout; anything else keeps
/// only its file name.
pub fn output_path_for(file: &Path, input_root: &Path, output_dir: &Path) -> PathBuf {
    match file.strip_prefix(input_root) {
        Ok(rel) if !rel.as_os_str().is_empty() => output_dir.join(rel),
        _ => output_dir.join(file.file_name().unwrap_or(file.as_os_str())),
    }
}

/// Display a path relative to `root` when possible.
pub fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_relative() {
        let normalized = normalize_path(Path::new("relative/path/file.html"));
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_resolve_path_fallback() {
        let resolved = resolve_path(Path::new("nonexistent/page.html"), Path::new("/fallback"));
        assert_eq!(resolved, PathBuf::from("/fallback/nonexistent/page.html"));

        let resolved = resolve_path(Path::new("/abs/page.html"), Path::new("/fallback"));
        assert_eq!(resolved, PathBuf::from("/abs/page.html"));
    }

    #[test]
    fn test_is_html_file() {
        assert!(is_html_file(Path::new("public/index.html")));
        assert!(is_html_file(Path::new("legacy/PAGE.HTM")));
        assert!(!is_html_file(Path::new("public/report.pdf")));
        assert!(!is_html_file(Path::new("public/html")));
    }

    #[test]
    fn test_output_path_for_nested() {
        assert_eq!(
            output_path_for(
                Path::new("/site/public/posts/a/index.html"),
                Path::new("/site/public"),
                Path::new("/site/dist"),
            ),
            PathBuf::from("/site/dist/posts/a/index.html")
        );
    }

    #[test]
    fn test_output_path_for_outside_root() {
        assert_eq!(
            output_path_for(
                Path::new("/tmp/page.html"),
                Path::new("/site/public"),
                Path::new("/site/dist"),
            ),
            PathBuf::from("/site/dist/page.html")
        );
    }

    #[test]
    fn test_display_relative() {
        assert_eq!(
            display_relative(Path::new("/site/public/a.html"), Path::new("/site")),
            "public/a.html"
        );
        assert_eq!(
            display_relative(Path::new("/other/a.html"), Path::new("/site")),
            "/other/a.html"
        );
    }
}
